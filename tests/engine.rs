//! 배합 엔진 회귀 테스트. QS 보정, AM%, 배치표, 포장 추정을 확인한다.
use formulation_calculator::formulation::{
    compute_active_matter, compute_batch_mass, compute_batch_table, compute_packaging, evaluate,
    has_balance_row, normalize_water, round_to, total_percent, BatchRow, BatchUnit,
    FormulationInput, FormulationWarning, GlobalSettings, IngredientRow, Preset, SettingsError,
};
use pretty_assertions::assert_eq;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.9} got {actual:.9} (diff {diff:.3e}, tol {tol})"
    );
}

fn row(name: &str, percent: f64, active_frac: f64) -> IngredientRow {
    IngredientRow::new(name, percent, active_frac, 0.0)
}

fn kg_settings(batch_size: f64) -> GlobalSettings {
    GlobalSettings {
        batch_unit: BatchUnit::Kilograms,
        batch_size,
        ..GlobalSettings::default()
    }
}

#[test]
fn sles_water_worked_example() {
    let rows = vec![row("SLES", 12.0, 0.70), row("Water", 0.0, 0.0)];
    let normalized = normalize_water(&rows);
    assert_close("water %", normalized[1].percent, 88.0, 1e-9);
    assert_close("AM%", compute_active_matter(&normalized), 8.4, 1e-9);

    let table = compute_batch_table(&normalized, 20.0);
    assert_close("SLES kg", table[0].kg, 2.4, 1e-9);
    assert_close("Water kg", table[1].kg, 17.6, 1e-9);
    assert_close("SLES g", table[0].g, 2400.0, 1e-6);
}

#[test]
fn water_fill_reaches_hundred() {
    for preset in Preset::ALL {
        let mut rows = preset.rows();
        // 사용자가 물 외 원료를 바꿔도 합계는 100으로 맞춰진다.
        rows[0].percent += 3.5;
        let normalized = normalize_water(&rows);
        assert_close(preset.label(), total_percent(&normalized), 100.0, 1e-6);
    }
}

#[test]
fn water_clamps_to_zero_when_others_exceed_hundred() {
    let rows = vec![row("A", 70.0, 0.0), row("B", 40.0, 0.0), row("Water", 20.0, 0.0)];
    let normalized = normalize_water(&rows);
    assert_eq!(normalized[2].percent, 0.0);
    assert_close("total", total_percent(&normalized), 110.0, 1e-9);
}

#[test]
fn every_water_row_receives_full_qs_amount() {
    let rows = vec![
        row("Fragrance", 10.0, 0.0),
        row("Water (QS)", 0.0, 0.0),
        row("DI WATER", 5.0, 0.0),
    ];
    let normalized = normalize_water(&rows);
    assert_close("first water", normalized[1].percent, 90.0, 1e-9);
    assert_close("second water", normalized[2].percent, 90.0, 1e-9);
    assert_eq!(normalized[0], rows[0]);
}

#[test]
fn no_water_row_passes_through() {
    let rows = vec![row("SLES", 12.0, 0.7), row("CAPB", 4.0, 0.3)];
    assert!(!has_balance_row(&rows));
    assert_eq!(normalize_water(&rows), rows);
    assert!(normalize_water(&[]).is_empty());
}

#[test]
fn balance_flag_replaces_name_matching() {
    let rows = vec![
        row("Glycerin", 0.0, 0.0).as_balance(),
        row("Water", 50.0, 0.0),
        row("SLES", 10.0, 0.7),
    ];
    assert!(has_balance_row(&rows));
    let normalized = normalize_water(&rows);
    assert_close("flagged row", normalized[0].percent, 40.0, 1e-9);
    assert_eq!(normalized[1].percent, 50.0);
    assert_close("total", total_percent(&normalized), 100.0, 1e-9);
}

#[test]
fn active_matter_scales_linearly() {
    let rows = Preset::PremiumHighFoam.rows();
    let base = compute_active_matter(&rows);
    let c = 0.37;
    let scaled: Vec<IngredientRow> = rows
        .iter()
        .map(|r| IngredientRow {
            active_frac: r.active_frac * c,
            ..r.clone()
        })
        .collect();
    assert_close("scaled AM", compute_active_matter(&scaled), base * c, 1e-9);
}

#[test]
fn batch_mass_follows_unit() {
    let mut s = GlobalSettings {
        final_density_kg_per_l: 1.03,
        batch_size: 20.0,
        ..GlobalSettings::default()
    };
    assert_close("liters", compute_batch_mass(&s), 20.6, 1e-9);
    s.batch_unit = BatchUnit::Kilograms;
    assert_eq!(compute_batch_mass(&s), 20.0);
}

#[test]
fn batch_kg_sums_to_batch_mass() {
    let rows = normalize_water(&Preset::MediumFoamThick.rows());
    let table = compute_batch_table(&rows, 37.5);
    let sum: f64 = table.iter().map(|b| b.kg).sum();
    assert_close("kg sum", sum, 37.5, 1e-9);
}

#[test]
fn packaging_worked_example() {
    let p = compute_packaging(20.0, 1.0, 1.0, 500);
    assert_close("usable kg", p.usable_mass_kg, 19.8, 1e-9);
    assert_close("usable L", p.usable_liters, 19.8, 1e-9);
    assert_eq!(p.bottle_count, 39);
}

#[test]
fn packaging_without_loss_is_mass_over_density() {
    let p = compute_packaging(20.0, 0.0, 1.05, 500);
    assert_eq!(p.usable_liters, 20.0 / 1.05);
}

#[test]
fn packaging_total_loss_yields_zero_bottles() {
    assert_eq!(compute_packaging(20.0, 100.0, 1.0, 500).bottle_count, 0);
    let p = compute_packaging(20.0, 150.0, 1.0, 500);
    assert!(p.usable_liters < 0.0);
    assert_eq!(p.bottle_count, 0);
}

#[test]
fn display_rounding_per_column() {
    let b = BatchRow {
        ingredient: "SLES".into(),
        percent: 12.345_678,
        kg: 1.234_567,
        g: 1_234.567,
        cost_per_kg: 2.718_281,
        cost: 3.355_936,
    };
    let d = b.display();
    assert_eq!(d.percent, 12.3457);
    assert_eq!(d.kg, 1.2346);
    assert_eq!(d.g, 1234.6);
    assert_eq!(d.cost_per_kg, 2.7183);
    assert_eq!(d.cost, 3.3559);
    assert_eq!(round_to(-0.25, 1), -0.2);
}

#[test]
fn display_rounding_sends_ties_to_even() {
    let b = BatchRow {
        ingredient: "Dye".into(),
        percent: 0.031_25,
        kg: 0.000_25,
        g: 0.25,
        cost_per_kg: 1.000_05,
        cost: 0.000_75,
    };
    let d = b.display();
    assert_eq!(d.percent, 0.0312);
    assert_eq!(d.g, 0.2);
    assert_eq!(round_to(0.75, 1), 0.8);
    assert_eq!(round_to(2.5, 0), 2.0);
    assert_eq!(round_to(3.5, 0), 4.0);
}

#[test]
fn total_cost_uses_unrounded_rows() {
    let rows = vec![
        IngredientRow::new("A", 50.0, 0.0, 0.000_03),
        IngredientRow::new("B", 50.0, 0.0, 0.000_03),
    ];
    let report = evaluate(&FormulationInput {
        rows,
        settings: kg_settings(1.0),
    })
    .expect("valid input");
    assert!(report.batch.iter().all(|b| b.display().cost == 0.0));
    assert_close("total cost", report.total_cost, 0.000_03, 1e-12);
}

#[test]
fn evaluate_full_pipeline() {
    let report = evaluate(&FormulationInput {
        rows: vec![row("SLES", 12.0, 0.70), row("Water", 0.0, 0.0)],
        settings: GlobalSettings::default(),
    })
    .expect("valid input");
    assert_close("total", report.total_percent, 100.0, 1e-9);
    assert_close("AM%", report.active_matter_percent, 8.4, 1e-9);
    assert_close("mass", report.batch_mass_kg, 20.0, 1e-12);
    assert_eq!(report.packaging.bottle_count, 39);
    assert!(report.warnings.is_empty());
}

#[test]
fn evaluate_warns_without_water() {
    let report = evaluate(&FormulationInput {
        rows: vec![row("SLES", 12.0, 0.70), row("Glycerin", 80.0, 0.0)],
        settings: GlobalSettings::default(),
    })
    .expect("valid input");
    assert_eq!(
        report.warnings,
        vec![FormulationWarning::TotalOutOfTolerance {
            total_percent: 92.0,
            balance_applied: false,
        }]
    );
    // 경고가 있어도 계산은 진행된다.
    assert_close("SLES kg", report.batch[0].kg, 2.4, 1e-9);
}

#[test]
fn evaluate_warns_when_water_cannot_balance() {
    let report = evaluate(&FormulationInput {
        rows: vec![row("A", 70.0, 0.0), row("B", 40.0, 0.0), row("Water", 0.0, 0.0)],
        settings: GlobalSettings::default(),
    })
    .expect("valid input");
    assert!(matches!(
        report.warnings.as_slice(),
        [FormulationWarning::TotalOutOfTolerance {
            balance_applied: true,
            ..
        }]
    ));
}

#[test]
fn evaluate_tolerates_small_deviation() {
    let report = evaluate(&FormulationInput {
        rows: vec![row("A", 60.0, 0.0), row("B", 40.005, 0.0)],
        settings: GlobalSettings::default(),
    })
    .expect("valid input");
    assert!(report.warnings.is_empty());
}

#[test]
fn evaluate_empty_list() {
    let report = evaluate(&FormulationInput {
        rows: Vec::new(),
        settings: GlobalSettings::default(),
    })
    .expect("valid input");
    assert!(report.batch.is_empty());
    assert_eq!(report.total_cost, 0.0);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn evaluate_rejects_out_of_range_settings() {
    let settings = GlobalSettings {
        final_density_kg_per_l: 0.0,
        ..GlobalSettings::default()
    };
    let err = evaluate(&FormulationInput {
        rows: Preset::Economy.rows(),
        settings,
    })
    .unwrap_err();
    assert_eq!(err, SettingsError::DensityOutOfRange(0.0));
}
