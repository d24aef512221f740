//! 배치표 CSV 내보내기/다시 읽기.
//! 헤더 한 줄 + 행별 한 줄, 쉼표 구분, UTF-8, 줄바꿈은 `\n`이다.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::engine::{BatchRow, DisplayRow};

pub const CSV_HEADER: [&str; 6] = [
    "Ingredient",
    "%",
    "kg (this batch)",
    "g (this batch)",
    "Cost per kg",
    "Cost (this batch)",
];

pub const DEFAULT_CSV_FILE_NAME: &str = "dishwashing_batch_breakdown.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV is empty, header row missing")]
    MissingHeader,
    #[error("unexpected CSV header: {0}")]
    BadHeader(String),
    #[error("line {line}: expected 6 columns, found {found}")]
    ColumnCount { line: usize, found: usize },
    #[error("line {line}: '{value}' is not a number")]
    BadNumber { line: usize, value: String },
}

/// 배치표를 CSV 문자열로 만든다. 값은 표시 규칙대로 반올림한다.
pub fn to_csv(rows: &[BatchRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));
    for row in rows {
        let d = row.display();
        push_record(
            &mut out,
            [
                d.ingredient,
                format_number(d.percent),
                format_number(d.kg),
                format_number(d.g),
                format_number(d.cost_per_kg),
                format_number(d.cost),
            ],
        );
    }
    out
}

/// CSV 파일로 저장한다.
pub fn write_csv(path: &Path, rows: &[BatchRow]) -> Result<(), ExportError> {
    fs::write(path, to_csv(rows).as_bytes())?;
    info!(path = %path.display(), rows = rows.len(), "batch CSV written");
    Ok(())
}

/// 내보낸 CSV를 다시 읽어 반올림된 행으로 복원한다.
pub fn parse_csv(src: &str) -> Result<Vec<DisplayRow>, ExportError> {
    let mut records = split_records(src).into_iter().enumerate();
    let (_, header) = records.next().ok_or(ExportError::MissingHeader)?;
    if header.iter().map(String::as_str).ne(CSV_HEADER) {
        return Err(ExportError::BadHeader(header.join(",")));
    }

    let mut rows = Vec::new();
    for (idx, fields) in records {
        let line = idx + 1;
        if fields.len() != CSV_HEADER.len() {
            return Err(ExportError::ColumnCount {
                line,
                found: fields.len(),
            });
        }
        let num = |i: usize| -> Result<f64, ExportError> {
            fields[i].trim().parse::<f64>().map_err(|_| ExportError::BadNumber {
                line,
                value: fields[i].clone(),
            })
        };
        rows.push(DisplayRow {
            ingredient: fields[0].clone(),
            percent: num(1)?,
            kg: num(2)?,
            g: num(3)?,
            cost_per_kg: num(4)?,
            cost: num(5)?,
        });
    }
    Ok(rows)
}

/// 정수값도 `88.0`처럼 소수점을 남기는 최단 표현으로 출력한다.
fn format_number(v: f64) -> String {
    format!("{v:?}")
}

fn push_record<I>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = String>,
{
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&field);
        }
    }
    out.push('\n');
}

/// 따옴표 규칙을 지키며 레코드 단위로 나눈다. 빈 줄은 건너뛴다.
fn split_records(src: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push(std::mem::take(&mut fields));
                } else {
                    fields.clear();
                }
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }
    records
}
