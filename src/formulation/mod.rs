//! 배합(포뮬레이션) 계산 모듈 모음.
//! 원료 행 목록과 전역 설정을 받아 AM%, 배치 중량, 원가, 병 수량을 계산한다.

pub mod csv_export;
pub mod engine;
pub mod ingredient;
pub mod presets;
pub mod settings;

pub use engine::*;
pub use ingredient::*;
pub use presets::Preset;
pub use settings::*;
