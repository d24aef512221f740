//! 주방세제 기본 배합 프리셋. 단가는 모두 0으로 두고 사용자가 채운다.

use serde::{Deserialize, Serialize};

use super::ingredient::IngredientRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// A. Economy (Standard)
    Economy,
    /// B. Medium Foam + Thick (Recommended)
    #[default]
    MediumFoamThick,
    /// C. Premium High Foam
    PremiumHighFoam,
    /// D. Low-chemical / Sensitive
    LowChemical,
}

impl Preset {
    /// 메뉴 표시 순서(권장 프리셋 우선).
    pub const ALL: [Preset; 4] = [
        Preset::MediumFoamThick,
        Preset::PremiumHighFoam,
        Preset::Economy,
        Preset::LowChemical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Preset::Economy => "A. Economy (Standard)",
            Preset::MediumFoamThick => "B. Medium Foam + Thick (Recommended)",
            Preset::PremiumHighFoam => "C. Premium High Foam",
            Preset::LowChemical => "D. Low-chemical / Sensitive",
        }
    }

    /// 프리셋 원료 목록을 새로 만든다.
    pub fn rows(&self) -> Vec<IngredientRow> {
        let spec: &[(&str, f64, f64)] = match self {
            Preset::PremiumHighFoam => &[
                ("SLES (70% active)", 14.0, 0.70),
                ("SLS (Needles/Powder, 95% active)", 3.0, 0.95),
                ("CAPB (30% active)", 5.0, 0.30),
                ("NaCl (Salt for viscosity)", 2.0, 0.0),
                ("Citric Acid (pH adjust)", 0.20, 0.0),
                ("Preservative", 0.30, 0.0),
                ("Fragrance (Lemon/Lime)", 0.50, 0.0),
                ("Dye (Color)", 0.01, 0.0),
                ("Water (QS to 100%)", 74.99, 0.0),
            ],
            Preset::Economy => &[
                ("SLES (70% active)", 10.0, 0.70),
                ("CAPB (30% active)", 3.0, 0.30),
                ("NaCl (Salt for viscosity)", 2.0, 0.0),
                ("Citric Acid (pH adjust)", 0.20, 0.0),
                ("Preservative", 0.20, 0.0),
                ("Fragrance", 0.30, 0.0),
                ("Dye", 0.01, 0.0),
                ("Water (QS to 100%)", 84.29, 0.0),
            ],
            Preset::LowChemical => &[
                ("SLES (70% active)", 6.0, 0.70),
                ("CAPB (30% active)", 4.0, 0.30),
                ("APG (50% active)", 4.0, 0.50),
                ("NaCl (Salt for viscosity)", 1.5, 0.0),
                ("Citric Acid (pH adjust)", 0.20, 0.0),
                ("Preservative", 0.30, 0.0),
                ("Fragrance", 0.30, 0.0),
                ("Dye", 0.01, 0.0),
                ("Water (QS to 100%)", 83.69, 0.0),
            ],
            Preset::MediumFoamThick => &[
                ("SLES (70% active)", 12.0, 0.70),
                ("SLS (Needles/Powder, 95% active)", 2.0, 0.95),
                ("CAPB (30% active)", 4.0, 0.30),
                ("NaCl (Salt for viscosity)", 2.0, 0.0),
                ("Citric Acid (pH adjust)", 0.20, 0.0),
                ("Preservative", 0.30, 0.0),
                ("Fragrance (Lemon/Lime)", 0.50, 0.0),
                ("Dye (Color)", 0.01, 0.0),
                ("Water (QS to 100%)", 78.99, 0.0),
            ],
        };
        spec.iter()
            .map(|&(name, percent, active_frac)| IngredientRow::new(name, percent, active_frac, 0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::engine::total_percent;

    #[test]
    fn every_preset_sums_to_hundred() {
        for preset in Preset::ALL {
            let total = total_percent(&preset.rows());
            assert!((total - 100.0).abs() < 1e-9, "{} sums to {total}", preset.label());
        }
    }

    #[test]
    fn every_preset_ends_with_water() {
        for preset in Preset::ALL {
            let rows = preset.rows();
            assert!(rows.last().is_some_and(|r| r.is_water()), "{}", preset.label());
        }
    }
}
