use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::app::{self, AppError};
use crate::config::Config;
use crate::formulation::csv_export;
use crate::formulation::settings::{
    MAX_DENSITY_KG_PER_L, MIN_BATCH_SIZE, MIN_BOTTLE_SIZE_ML, MIN_DENSITY_KG_PER_L,
};
use crate::formulation::{
    coerce_f64, normalize_water, BatchUnit, FormulationInput, GlobalSettings, IngredientRow,
    Preset,
};
use crate::i18n::{self, keys, Translator};
use crate::recipe;
use crate::report;

/// 배합표 저장 기본 파일명.
pub const DEFAULT_RECIPE_FILE_NAME: &str = "recipe.toml";

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Preset,
    Ingredients,
    Settings,
    Report,
    Export,
    Notes,
    Language,
    Save,
    SaveRecipe,
    Exit,
}

/// 대화식 편집 중인 원료 목록과 전역 설정. 계산 때마다 불변 입력으로 복사해 넘긴다.
#[derive(Debug, Clone)]
pub struct Session {
    pub rows: Vec<IngredientRow>,
    pub settings: GlobalSettings,
    pub preset: Preset,
}

impl Session {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            rows: cfg.preset.rows(),
            settings: cfg.settings.clone(),
            preset: cfg.preset,
        }
    }

    pub fn input(&self) -> FormulationInput {
        FormulationInput {
            rows: self.rows.clone(),
            settings: self.settings.clone(),
        }
    }

    /// 편집 중인 원료 목록을 TOML 배합표로 저장한다. QS 보정 전 입력값 그대로 쓴다.
    pub fn save_recipe(&self, path: &Path) -> Result<(), AppError> {
        recipe::save_recipe(path, &self.rows)?;
        Ok(())
    }

    /// 현재 프리셋/전역 설정을 설정 파일 값으로 반영한다.
    pub fn store_into(&self, cfg: &mut Config) {
        cfg.preset = self.preset;
        cfg.settings = self.settings.clone();
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    for key in [
        keys::MAIN_MENU_PRESET,
        keys::MAIN_MENU_INGREDIENTS,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_REPORT,
        keys::MAIN_MENU_EXPORT,
        keys::MAIN_MENU_NOTES,
        keys::MAIN_MENU_LANGUAGE,
        keys::MAIN_MENU_SAVE,
        keys::MAIN_MENU_SAVE_RECIPE,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Preset),
            "2" => return Ok(MenuChoice::Ingredients),
            "3" => return Ok(MenuChoice::Settings),
            "4" => return Ok(MenuChoice::Report),
            "5" => return Ok(MenuChoice::Export),
            "6" => return Ok(MenuChoice::Notes),
            "7" => return Ok(MenuChoice::Language),
            "8" => return Ok(MenuChoice::Save),
            "9" => return Ok(MenuChoice::SaveRecipe),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 프리셋을 골라 원료 목록을 교체한다.
pub fn handle_preset(tr: &Translator, session: &mut Session) -> Result<(), AppError> {
    println!("{}", tr.t(keys::PRESET_HEADING));
    for (i, preset) in Preset::ALL.iter().enumerate() {
        println!("{}) {}", i + 1, preset.label());
    }
    let sel = read_line(tr.t(keys::PRESET_PROMPT))?;
    let chosen = sel
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| Preset::ALL.get(i).copied());
    match chosen {
        Some(preset) => {
            session.preset = preset;
            session.rows = preset.rows();
            println!("{} {}", tr.t(keys::PRESET_LOADED), preset.label());
        }
        None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
    }
    Ok(())
}

/// 원료 표를 보여주고 행 편집/추가/삭제를 처리한다.
pub fn handle_ingredients(tr: &Translator, session: &mut Session) -> Result<(), AppError> {
    println!("{}", tr.t(keys::INGREDIENTS_HEADING));
    println!("{}", tr.t(keys::INGREDIENTS_NOTE_QS));
    loop {
        print_rows(&session.rows);
        println!("{}", tr.t(keys::INGREDIENTS_OPTIONS));
        let sel = read_line(tr.t(keys::PROMPT_SELECT))?;
        match sel.trim() {
            "" => return Ok(()),
            "e" | "E" => match read_row_index(tr, session.rows.len())? {
                Some(idx) => {
                    println!("{}", tr.t(keys::PROMPT_KEEP_HINT));
                    let edited = read_row(tr, &session.rows[idx])?;
                    session.rows[idx] = edited;
                }
                None => println!("{}", tr.t(keys::ROW_NOT_FOUND)),
            },
            "a" | "A" => {
                println!("{}", tr.t(keys::PROMPT_KEEP_HINT));
                let row = read_row(tr, &IngredientRow::new("", 0.0, 0.0, 0.0))?;
                session.rows.push(row);
                println!("{}", tr.t(keys::ROW_ADDED));
            }
            "d" | "D" => match read_row_index(tr, session.rows.len())? {
                Some(idx) => {
                    session.rows.remove(idx);
                    println!("{}", tr.t(keys::ROW_REMOVED));
                }
                None => println!("{}", tr.t(keys::ROW_NOT_FOUND)),
            },
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 전역 설정(밀도, 배치, 병)을 편집한다. 범위를 벗어나면 다시 묻는다.
pub fn handle_settings(tr: &Translator, session: &mut Session) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{}", tr.t(keys::PROMPT_KEEP_HINT));
    let s = &mut session.settings;
    s.final_density_kg_per_l = read_f64_in(tr, keys::PROMPT_DENSITY, s.final_density_kg_per_l, |v| {
        (MIN_DENSITY_KG_PER_L..=MAX_DENSITY_KG_PER_L).contains(&v)
    })?;
    let unit_label = match s.batch_unit {
        BatchUnit::Liters => "1",
        BatchUnit::Kilograms => "2",
    };
    s.batch_unit = loop {
        let sel = read_line(&format!("{}[{unit_label}] ", tr.t(keys::PROMPT_BATCH_UNIT)))?;
        match sel.trim() {
            "" => break s.batch_unit,
            "1" => break BatchUnit::Liters,
            "2" => break BatchUnit::Kilograms,
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    };
    s.batch_size = read_f64_in(tr, keys::PROMPT_BATCH_SIZE, s.batch_size, |v| v >= MIN_BATCH_SIZE)?;
    let bottle = read_f64_in(tr, keys::PROMPT_BOTTLE_SIZE, f64::from(s.bottle_size_ml), |v| {
        v >= f64::from(MIN_BOTTLE_SIZE_ML) && v <= f64::from(u32::MAX) && v.fract() == 0.0
    })?;
    s.bottle_size_ml = bottle as u32;
    s.bottle_loss_percent =
        read_f64_in(tr, keys::PROMPT_BOTTLE_LOSS, s.bottle_loss_percent, |v| v >= 0.0)?;
    println!("{}", tr.t(keys::SETTINGS_COST_NOTE));
    Ok(())
}

/// 현재 입력으로 계산해 결과를 출력한다.
pub fn show_report(tr: &Translator, session: &Session) -> Result<(), AppError> {
    let input = session.input();
    let result = app::evaluate_logged(&input, tr)?;
    println!();
    print!("{}", report::render(&result, &input.settings, tr));
    Ok(())
}

/// 배치표 CSV를 저장한다.
pub fn handle_export(tr: &Translator, session: &Session, cfg: &Config) -> Result<(), AppError> {
    let prompt = tr.tf(
        keys::EXPORT_PROMPT_PATH,
        &[("default", cfg.csv_file_name.clone())],
    );
    let answer = read_line(&prompt)?;
    let path = match answer.trim() {
        "" => PathBuf::from(&cfg.csv_file_name),
        other => PathBuf::from(other),
    };
    let result = app::evaluate_logged(&session.input(), tr)?;
    csv_export::write_csv(&path, &result.batch)?;
    println!("{} {}", tr.t(keys::EXPORT_DONE), path.display());
    Ok(())
}

/// 편집 중인 원료 목록을 배합표 파일로 저장한다.
pub fn handle_save_recipe(tr: &Translator, session: &Session) -> Result<(), AppError> {
    let prompt = tr.tf(
        keys::RECIPE_PROMPT_PATH,
        &[("default", DEFAULT_RECIPE_FILE_NAME.to_string())],
    );
    let answer = read_line(&prompt)?;
    let path = match answer.trim() {
        "" => PathBuf::from(DEFAULT_RECIPE_FILE_NAME),
        other => PathBuf::from(other),
    };
    session.save_recipe(&path)?;
    println!("{} {}", tr.t(keys::RECIPE_SAVED), path.display());
    Ok(())
}

pub fn show_notes(tr: &Translator) {
    println!("{}", tr.t(keys::NOTES_HEADING));
    println!("{}", tr.t(keys::NOTES_BODY));
}

/// 언어를 바꾸고 새 번역기를 돌려준다.
pub fn handle_language(tr: &Translator, cfg: &mut Config) -> Result<Translator, AppError> {
    let answer = read_line(tr.t(keys::LANGUAGE_PROMPT))?;
    let code = i18n::resolve_language(answer.trim(), Some(tr.language_code()));
    cfg.language = Some(code.clone());
    let next = Translator::new_with_pack(&code, cfg.language_pack_dir.as_deref());
    println!("{} {}", next.t(keys::LANGUAGE_SET), next.language_code());
    Ok(next)
}

fn print_rows(rows: &[IngredientRow]) {
    let shown = normalize_water(rows);
    println!(
        "{:>3}  {:<36} {:>9} {:>8} {:>12}",
        "#", "Ingredient (Raw Material)", "% (w/w)", "Active", "Cost per kg"
    );
    for (i, (row, raw)) in shown.iter().zip(rows).enumerate() {
        let marker = if row.percent != raw.percent { "*" } else { " " };
        println!(
            "{:>3}{marker} {:<36} {:>9.2} {:>8.2} {:>12.2}",
            i + 1,
            row.name,
            row.percent,
            row.active_frac,
            row.cost_per_kg
        );
    }
}

fn read_row_index(tr: &Translator, len: usize) -> Result<Option<usize>, AppError> {
    let sel = read_line(tr.t(keys::PROMPT_ROW_INDEX))?;
    Ok(sel
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|&i| i < len))
}

/// 한 행을 입력받는다. 빈 입력은 기존 값을 유지하고, 숫자가 아닌 값은 0으로 본다.
fn read_row(tr: &Translator, current: &IngredientRow) -> Result<IngredientRow, AppError> {
    let name = read_line(&format!("{}[{}] ", tr.t(keys::PROMPT_NAME), current.name))?;
    let cell = |key: &str, value: f64| -> Result<f64, AppError> {
        let s = read_line(&format!("{}[{value}] ", tr.t(key)))?;
        Ok(if s.trim().is_empty() {
            value
        } else {
            coerce_f64(&s)
        })
    };
    let percent = cell(keys::PROMPT_PERCENT, current.percent)?;
    let active_frac = cell(keys::PROMPT_ACTIVE_FRAC, current.active_frac)?;
    let cost_per_kg = cell(keys::PROMPT_COST_PER_KG, current.cost_per_kg)?;
    Ok(IngredientRow {
        name: match name.trim() {
            "" => current.name.clone(),
            other => other.to_string(),
        },
        percent,
        active_frac,
        cost_per_kg,
        balance: current.balance,
    })
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed",
        )));
    }
    Ok(buf)
}

/// 범위 조건을 만족할 때까지 숫자를 묻는다. 빈 입력은 현재 값을 유지한다.
fn read_f64_in<F>(tr: &Translator, key: &str, current: f64, valid: F) -> Result<f64, AppError>
where
    F: Fn(f64) -> bool,
{
    loop {
        let s = read_line(&format!("{}[{current}] ", tr.t(key)))?;
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(current);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && valid(v) => return Ok(v),
            _ => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
