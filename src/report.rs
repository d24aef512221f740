//! 계산 결과를 터미널용 텍스트로 정리한다.

use std::fmt;

use crate::formulation::csv_export::CSV_HEADER;
use crate::formulation::{FormulationReport, FormulationWarning, GlobalSettings};
use crate::i18n::{keys, Translator};

/// 경고 한 건을 사용자 문장으로 바꾼다.
pub fn warning_message(warning: &FormulationWarning, tr: &Translator) -> String {
    match warning {
        FormulationWarning::TotalOutOfTolerance {
            total_percent,
            balance_applied,
        } => {
            // QS 행이 있는데도 벗어났다면 나머지 합이 이미 100%를 넘어 0으로 잘린 경우다.
            let key = if *balance_applied {
                keys::REPORT_WARNING_QS_CLAMPED
            } else {
                keys::REPORT_WARNING_TOTAL
            };
            tr.tf(key, &[("total", format!("{total_percent:.2}"))])
        }
    }
}

/// 배치표, 요약 수치, 포장 추정, 경고를 한 덩어리 문자열로 만든다.
pub fn render(report: &FormulationReport, settings: &GlobalSettings, tr: &Translator) -> String {
    ReportView {
        report,
        settings,
        tr,
    }
    .to_string()
}

struct ReportView<'a> {
    report: &'a FormulationReport,
    settings: &'a GlobalSettings,
    tr: &'a Translator,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (report, tr) = (self.report, self.tr);
        let name_width = report
            .batch
            .iter()
            .map(|b| b.ingredient.chars().count())
            .chain(std::iter::once(CSV_HEADER[0].len()))
            .max()
            .unwrap_or(0);

        writeln!(f, "{}", tr.t(keys::REPORT_BATCH_HEADING))?;
        writeln!(
            f,
            "{:<name_width$} {:>10} {:>16} {:>16} {:>12} {:>18}",
            CSV_HEADER[0], CSV_HEADER[1], CSV_HEADER[2], CSV_HEADER[3], CSV_HEADER[4], CSV_HEADER[5]
        )?;
        writeln!(f, "{}", "-".repeat(name_width + 77))?;
        for row in &report.batch {
            let d = row.display();
            writeln!(
                f,
                "{:<name_width$} {:>10.4} {:>16.4} {:>16.1} {:>12.4} {:>18.4}",
                d.ingredient, d.percent, d.kg, d.g, d.cost_per_kg, d.cost
            )?;
        }
        writeln!(f)?;

        writeln!(f, "{}: {:.2}%", tr.t(keys::REPORT_TOTAL), report.total_percent)?;
        writeln!(
            f,
            "{}: {:.2}%",
            tr.t(keys::REPORT_ACTIVE_MATTER),
            report.active_matter_percent
        )?;
        writeln!(
            f,
            "{}: {:.3} kg  |  {}: {:.2}",
            tr.t(keys::REPORT_BATCH_MASS),
            report.batch_mass_kg,
            tr.t(keys::REPORT_TOTAL_COST),
            report.total_cost
        )?;
        writeln!(f)?;

        writeln!(f, "{}", tr.t(keys::REPORT_PACKAGING_HEADING))?;
        writeln!(
            f,
            "{}",
            tr.tf(
                keys::REPORT_USABLE_VOLUME,
                &[
                    ("liters", format!("{:.2}", report.packaging.usable_liters)),
                    ("bottles", report.packaging.bottle_count.to_string()),
                    ("bottle_ml", self.settings.bottle_size_ml.to_string()),
                ],
            )
        )?;

        for warning in &report.warnings {
            writeln!(f, "! {}", warning_message(warning, tr))?;
        }
        Ok(())
    }
}
