//! `calc`/`presets` 명령 수준의 통합 테스트.
use formulation_calculator::app::{self, AppError, CalcOptions};
use formulation_calculator::config::Config;
use formulation_calculator::formulation::csv_export::parse_csv;
use formulation_calculator::formulation::{BatchUnit, Preset};
use formulation_calculator::i18n::Translator;

#[test]
fn calc_economy_prints_summary() {
    let tr = Translator::new("en");
    let opts = CalcOptions {
        preset: Some(Preset::Economy),
        ..CalcOptions::default()
    };
    let text = app::calc(&Config::default(), &opts, &tr).expect("calc");
    assert!(text.contains("Active Matter (AM%): 7.90%"), "{text}");
    assert!(text.contains("Batch mass: 20.000 kg"), "{text}");
    assert!(
        text.contains("Usable volume ≈ 19.80 L after losses → 39 bottles of 500 mL"),
        "{text}"
    );
    assert!(!text.contains("should be 100%"), "{text}");
}

#[test]
fn calc_overrides_settings_and_writes_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = dir.path().join("out.csv");
    let tr = Translator::new("en");
    let opts = CalcOptions {
        preset: Some(Preset::MediumFoamThick),
        unit: Some(BatchUnit::Kilograms),
        batch_size: Some(100.0),
        bottle_ml: Some(1000),
        loss: Some(0.0),
        csv: Some(csv.clone()),
        ..CalcOptions::default()
    };
    let text = app::calc(&Config::default(), &opts, &tr).expect("calc");
    assert!(text.contains("100 bottles of 1000 mL"), "{text}");

    let rows = parse_csv(&std::fs::read_to_string(&csv).expect("csv written")).expect("parse");
    assert_eq!(rows.len(), Preset::MediumFoamThick.rows().len());
    assert_eq!(rows[0].kg, 12.0);
}

#[test]
fn calc_reads_recipe_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let recipe = dir.path().join("recipe.toml");
    std::fs::write(
        &recipe,
        "[[ingredients]]\nname = \"SLES\"\npercent = 12\nactive_frac = 0.7\n\n[[ingredients]]\nname = \"Water\"\n",
    )
    .expect("write recipe");
    let opts = CalcOptions {
        recipe: Some(recipe),
        ..CalcOptions::default()
    };
    let text = app::calc(&Config::default(), &opts, &Translator::new("en")).expect("calc");
    assert!(text.contains("Active Matter (AM%): 8.40%"), "{text}");
    assert!(text.contains("Total: 100.00%"), "{text}");
}

#[test]
fn calc_reports_total_warning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let recipe = dir.path().join("recipe.toml");
    std::fs::write(&recipe, "[[ingredients]]\nname = \"SLES\"\npercent = 12\n").expect("write");
    let opts = CalcOptions {
        recipe: Some(recipe),
        ..CalcOptions::default()
    };
    let text = app::calc(&Config::default(), &opts, &Translator::new("en")).expect("calc");
    assert!(text.contains("Total = 12.00% (should be 100%)"), "{text}");
    assert!(!text.contains("clamped"), "{text}");
}

#[test]
fn calc_rejects_out_of_range_density() {
    let opts = CalcOptions {
        density: Some(2.0),
        ..CalcOptions::default()
    };
    let err = app::calc(&Config::default(), &opts, &Translator::new("en")).unwrap_err();
    assert!(matches!(err, AppError::Settings(_)), "{err}");
}

#[test]
fn preset_listing_names_every_preset() {
    let text = app::list_presets();
    for preset in Preset::ALL {
        assert!(text.contains(preset.label()));
    }
    assert!(text.contains("[medium-foam-thick]"));
}

#[test]
fn calc_explains_clamped_water_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let recipe = dir.path().join("recipe.toml");
    std::fs::write(
        &recipe,
        "[[ingredients]]\nname = \"A\"\npercent = 70\n\n[[ingredients]]\nname = \"B\"\npercent = 40\n\n[[ingredients]]\nname = \"Water\"\n",
    )
    .expect("write recipe");
    let opts = CalcOptions {
        recipe: Some(recipe),
        ..CalcOptions::default()
    };
    let text = app::calc(&Config::default(), &opts, &Translator::new("en")).expect("calc");
    assert!(text.contains("Total = 110.00% (should be 100%)"), "{text}");
    assert!(text.contains("Water (QS) row was clamped to 0%"), "{text}");
}
