//! 배합 계산 로직을 라이브러리로 분리하여 CLI와 테스트가 같은 엔진을 쓰게 한다.

pub mod app;
pub mod config;
pub mod formulation;
pub mod i18n;
pub mod recipe;
pub mod report;
pub mod ui_cli;
