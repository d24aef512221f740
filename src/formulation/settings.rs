use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 최종 제품 밀도 허용 범위(kg/L).
pub const MIN_DENSITY_KG_PER_L: f64 = 0.8;
pub const MAX_DENSITY_KG_PER_L: f64 = 1.2;
/// 배치 크기 최솟값(선택 단위 기준).
pub const MIN_BATCH_SIZE: f64 = 0.1;
/// 병 용량 최솟값(mL).
pub const MIN_BOTTLE_SIZE_ML: u32 = 50;

/// 배치 크기 입력 단위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BatchUnit {
    /// 최종 부피(L). 밀도로 kg 환산한다.
    Liters,
    /// 최종 질량(kg)
    Kilograms,
}

/// 배합 계산 전역 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub final_density_kg_per_l: f64,
    pub batch_unit: BatchUnit,
    pub batch_size: f64,
    pub bottle_size_ml: u32,
    /// 충전/유실 손실 허용치(%)
    pub bottle_loss_percent: f64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            final_density_kg_per_l: 1.0,
            batch_unit: BatchUnit::Liters,
            batch_size: 20.0,
            bottle_size_ml: 500,
            bottle_loss_percent: 1.0,
        }
    }
}

/// 전역 설정 검증 오류. 0 나눗셈 등 퇴화 결과를 막기 위한 입력 경계 검사다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("density {0} kg/L is outside 0.8..=1.2")]
    DensityOutOfRange(f64),
    #[error("batch size {0} is below the minimum of 0.1")]
    BatchSizeTooSmall(f64),
    #[error("bottle size {0} mL is below the minimum of 50 mL")]
    BottleSizeTooSmall(u32),
    #[error("loss allowance {0}% must be zero or positive")]
    NegativeLoss(f64),
}

impl GlobalSettings {
    /// 입력 범위를 확인한다. NaN/무한대는 범위 밖으로 본다.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let density = self.final_density_kg_per_l;
        if !(MIN_DENSITY_KG_PER_L..=MAX_DENSITY_KG_PER_L).contains(&density) {
            return Err(SettingsError::DensityOutOfRange(density));
        }
        if !self.batch_size.is_finite() || self.batch_size < MIN_BATCH_SIZE {
            return Err(SettingsError::BatchSizeTooSmall(self.batch_size));
        }
        if self.bottle_size_ml < MIN_BOTTLE_SIZE_ML {
            return Err(SettingsError::BottleSizeTooSmall(self.bottle_size_ml));
        }
        if !self.bottle_loss_percent.is_finite() || self.bottle_loss_percent < 0.0 {
            return Err(SettingsError::NegativeLoss(self.bottle_loss_percent));
        }
        Ok(())
    }
}
