//! 배치표 CSV 내보내기 및 재입력 테스트.
use formulation_calculator::formulation::csv_export::{
    parse_csv, to_csv, write_csv, ExportError, CSV_HEADER,
};
use formulation_calculator::formulation::{
    evaluate, DisplayRow, FormulationInput, GlobalSettings, IngredientRow, Preset,
};
use pretty_assertions::assert_eq;

fn preset_report(preset: Preset) -> Vec<formulation_calculator::formulation::BatchRow> {
    let input = FormulationInput {
        rows: preset.rows(),
        settings: GlobalSettings::default(),
    };
    evaluate(&input).expect("valid input").batch
}

#[test]
fn header_comes_first() {
    let csv = to_csv(&preset_report(Preset::Economy));
    let first = csv.lines().next().expect("header line");
    assert_eq!(
        first,
        "Ingredient,%,kg (this batch),g (this batch),Cost per kg,Cost (this batch)"
    );
    assert_eq!(first.split(',').count(), CSV_HEADER.len());
}

#[test]
fn names_with_commas_are_quoted() {
    let csv = to_csv(&preset_report(Preset::MediumFoamThick));
    assert!(
        csv.lines()
            .any(|l| l == "\"SLS (Needles/Powder, 95% active)\",2.0,0.4,400.0,0.0,0.0"),
        "{csv}"
    );
    assert!(csv.lines().any(|l| l == "SLES (70% active),12.0,2.4,2400.0,0.0,0.0"), "{csv}");
}

#[test]
fn export_round_trips_rendered_values() {
    for preset in Preset::ALL {
        let batch = preset_report(preset);
        let expected: Vec<DisplayRow> = batch.iter().map(|b| b.display()).collect();
        let parsed = parse_csv(&to_csv(&batch)).expect("parse exported CSV");
        assert_eq!(parsed, expected);
    }
}

#[test]
fn round_trip_with_costs_and_odd_names() {
    let rows = vec![
        IngredientRow::new("Perfume \"Lemon\", extra", 0.73, 0.0, 12.345_67),
        IngredientRow::new("SLES", 11.111, 0.7, 1.85),
        IngredientRow::new("Water", 0.0, 0.0, 0.002),
    ];
    let input = FormulationInput {
        rows,
        settings: GlobalSettings {
            batch_size: 13.7,
            ..GlobalSettings::default()
        },
    };
    let batch = evaluate(&input).expect("valid input").batch;
    let parsed = parse_csv(&to_csv(&batch)).expect("parse exported CSV");
    assert_eq!(parsed[0].ingredient, "Perfume \"Lemon\", extra");
    assert_eq!(
        parsed,
        batch.iter().map(|b| b.display()).collect::<Vec<_>>()
    );
}

#[test]
fn write_csv_produces_utf8_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("batch.csv");
    let batch = preset_report(Preset::LowChemical);
    write_csv(&path, &batch).expect("write CSV");

    let content = std::fs::read_to_string(&path).expect("read CSV back");
    assert_eq!(content, to_csv(&batch));
    assert_eq!(parse_csv(&content).expect("parse").len(), batch.len());
}

#[test]
fn parse_rejects_malformed_input() {
    assert!(matches!(parse_csv(""), Err(ExportError::MissingHeader)));
    assert!(matches!(
        parse_csv("name,percent\n"),
        Err(ExportError::BadHeader(_))
    ));

    let header = CSV_HEADER.join(",");
    assert!(matches!(
        parse_csv(&format!("{header}\nWater,1.0,2.0\n")),
        Err(ExportError::ColumnCount { line: 2, found: 3 })
    ));
    match parse_csv(&format!("{header}\nWater,abc,1.0,1.0,0.0,0.0\n")) {
        Err(ExportError::BadNumber { line, value }) => {
            assert_eq!(line, 2);
            assert_eq!(value, "abc");
        }
        other => panic!("expected BadNumber, got {other:?}"),
    }
}
