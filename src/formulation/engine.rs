//! 배합 계산 엔진. 상태를 갖지 않는 순수 함수들로 구성한다.
//! 입력 스냅샷 → 물 QS 보정 → AM% → 배치 질량 → 배치표 → 포장 추정 순으로 흐른다.

use tracing::debug;

use super::ingredient::IngredientRow;
use super::settings::{BatchUnit, GlobalSettings, SettingsError};

/// 합계 100% 판정 허용 오차(%p).
pub const TOTAL_TOLERANCE_PERCENT: f64 = 0.01;

/// 한 번의 계산에 쓰이는 불변 입력.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulationInput {
    pub rows: Vec<IngredientRow>,
    pub settings: GlobalSettings,
}

/// 배치표 한 행. 값은 반올림 전 원값이다.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub ingredient: String,
    pub percent: f64,
    pub kg: f64,
    pub g: f64,
    pub cost_per_kg: f64,
    pub cost: f64,
}

/// 표시/CSV용으로 반올림된 배치표 행.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub ingredient: String,
    /// 소수 4자리
    pub percent: f64,
    /// 소수 4자리
    pub kg: f64,
    /// 소수 1자리
    pub g: f64,
    /// 소수 4자리
    pub cost_per_kg: f64,
    /// 소수 4자리
    pub cost: f64,
}

impl BatchRow {
    pub fn display(&self) -> DisplayRow {
        DisplayRow {
            ingredient: self.ingredient.clone(),
            percent: round_to(self.percent, 4),
            kg: round_to(self.kg, 4),
            g: round_to(self.g, 1),
            cost_per_kg: round_to(self.cost_per_kg, 4),
            cost: round_to(self.cost, 4),
        }
    }
}

/// 포장(병) 추정 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackagingEstimate {
    pub usable_mass_kg: f64,
    pub usable_liters: f64,
    pub bottle_count: u64,
}

/// 계산 중 발견된 비차단 경고.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulationWarning {
    /// 합계가 100%에서 허용 오차 이상 벗어남
    TotalOutOfTolerance {
        total_percent: f64,
        balance_applied: bool,
    },
}

/// 전체 계산 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulationReport {
    /// QS 보정이 반영된 원료 목록
    pub rows: Vec<IngredientRow>,
    pub total_percent: f64,
    pub active_matter_percent: f64,
    pub batch_mass_kg: f64,
    pub batch: Vec<BatchRow>,
    /// 반올림 전 행별 원가의 합
    pub total_cost: f64,
    pub packaging: PackagingEstimate,
    pub warnings: Vec<FormulationWarning>,
}

/// 소수 `decimals` 자리로 반올림한다. 정확히 절반인 값은 짝수 쪽으로 보낸다.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// QS 대상 행인지 판정하는 규칙을 고른다.
/// `balance` 플래그가 하나라도 있으면 플래그만 보고, 없으면 이름 규칙을 쓴다.
fn balance_predicate(rows: &[IngredientRow]) -> fn(&IngredientRow) -> bool {
    fn flagged(row: &IngredientRow) -> bool {
        row.balance
    }
    if rows.iter().any(flagged) {
        flagged as fn(&IngredientRow) -> bool
    } else {
        IngredientRow::is_water as fn(&IngredientRow) -> bool
    }
}

/// QS 보정이 적용될 행이 있는지 확인한다.
pub fn has_balance_row(rows: &[IngredientRow]) -> bool {
    let is_balance = balance_predicate(rows);
    rows.iter().any(is_balance)
}

/// 물(QS) 행의 %를 `max(0, 100 - 나머지 합)`으로 덮어쓴다.
/// QS 행이 여럿이면 각 행에 같은 값을 그대로 넣는다(분배하지 않음).
pub fn normalize_water(rows: &[IngredientRow]) -> Vec<IngredientRow> {
    let is_balance = balance_predicate(rows);
    if !rows.iter().any(is_balance) {
        return rows.to_vec();
    }
    let others: f64 = rows
        .iter()
        .filter(|r| !is_balance(r))
        .map(|r| r.percent)
        .sum();
    let qs = (100.0 - others).max(0.0);
    debug!(non_water_total = others, qs_percent = qs, "applying QS fill");
    rows.iter()
        .map(|r| {
            if is_balance(r) {
                IngredientRow {
                    percent: qs,
                    ..r.clone()
                }
            } else {
                r.clone()
            }
        })
        .collect()
}

/// % 합계.
pub fn total_percent(rows: &[IngredientRow]) -> f64 {
    rows.iter().map(|r| r.percent).sum()
}

/// AM% = Σ(percent × active_frac). percent가 이미 % 단위이므로 추가 환산은 없다.
pub fn compute_active_matter(rows: &[IngredientRow]) -> f64 {
    rows.iter().map(|r| r.percent * r.active_frac).sum()
}

/// 배치 질량(kg). 부피 입력이면 밀도를 곱한다.
pub fn compute_batch_mass(settings: &GlobalSettings) -> f64 {
    match settings.batch_unit {
        BatchUnit::Liters => settings.batch_size * settings.final_density_kg_per_l,
        BatchUnit::Kilograms => settings.batch_size,
    }
}

/// 원료별 kg/g/원가를 계산한다.
pub fn compute_batch_table(rows: &[IngredientRow], mass_kg: f64) -> Vec<BatchRow> {
    rows.iter()
        .map(|r| {
            let kg = mass_kg * r.percent / 100.0;
            BatchRow {
                ingredient: r.name.clone(),
                percent: r.percent,
                kg,
                g: kg * 1000.0,
                cost_per_kg: r.cost_per_kg,
                cost: kg * r.cost_per_kg,
            }
        })
        .collect()
}

/// 손실을 제외한 가용 부피와 병 수량을 계산한다. 병 수는 버림하며 음수는 0으로 본다.
pub fn compute_packaging(
    mass_kg: f64,
    loss_percent: f64,
    density_kg_per_l: f64,
    bottle_size_ml: u32,
) -> PackagingEstimate {
    let usable_mass_kg = mass_kg * (1.0 - loss_percent / 100.0);
    let usable_liters = usable_mass_kg / density_kg_per_l;
    let bottles = (usable_liters * 1000.0 / f64::from(bottle_size_ml)).floor();
    let bottle_count = if bottles.is_finite() && bottles > 0.0 {
        bottles as u64
    } else {
        0
    };
    PackagingEstimate {
        usable_mass_kg,
        usable_liters,
        bottle_count,
    }
}

/// 입력 스냅샷 전체를 계산한다. 설정이 범위를 벗어나면 아무것도 계산하지 않는다.
pub fn evaluate(input: &FormulationInput) -> Result<FormulationReport, SettingsError> {
    let settings = &input.settings;
    settings.validate()?;

    let balance_applied = has_balance_row(&input.rows);
    let rows = normalize_water(&input.rows);
    let total = total_percent(&rows);

    let mut warnings = Vec::new();
    if (total - 100.0).abs() > TOTAL_TOLERANCE_PERCENT {
        warnings.push(FormulationWarning::TotalOutOfTolerance {
            total_percent: total,
            balance_applied,
        });
    }

    let active_matter_percent = compute_active_matter(&rows);
    let batch_mass_kg = compute_batch_mass(settings);
    let batch = compute_batch_table(&rows, batch_mass_kg);
    let total_cost = batch.iter().map(|b| b.cost).sum();
    let packaging = compute_packaging(
        batch_mass_kg,
        settings.bottle_loss_percent,
        settings.final_density_kg_per_l,
        settings.bottle_size_ml,
    );
    debug!(
        rows = rows.len(),
        total,
        active_matter_percent,
        batch_mass_kg,
        bottles = packaging.bottle_count,
        "formulation evaluated"
    );

    Ok(FormulationReport {
        rows,
        total_percent: total,
        active_matter_percent,
        batch_mass_kg,
        batch,
        total_cost,
        packaging,
        warnings,
    })
}
