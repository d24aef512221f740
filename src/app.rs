use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::formulation::csv_export::{self, ExportError};
use crate::formulation::{
    evaluate, BatchUnit, FormulationInput, FormulationReport, Preset, SettingsError,
};
use crate::i18n::{self, Translator};
use crate::recipe::{self, RecipeError};
use crate::report;
use crate::ui_cli::{self, MenuChoice, Session};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일/터미널 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// 전역 설정 범위 오류
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    /// CSV 내보내기 오류
    #[error("CSV export error: {0}")]
    Export(#[from] ExportError),
    /// 배합표 파일 오류
    #[error("recipe error: {0}")]
    Recipe(#[from] RecipeError),
}

/// 비대화식 계산 옵션. 지정하지 않은 값은 설정 파일 값을 따른다.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CalcOptions {
    /// Preset formulation to start from
    #[arg(short, long, value_enum)]
    pub preset: Option<Preset>,
    /// TOML recipe file with [[ingredients]] rows (overrides --preset)
    #[arg(short, long)]
    pub recipe: Option<PathBuf>,
    /// Final product density in kg/L (0.8-1.2)
    #[arg(long)]
    pub density: Option<f64>,
    /// Batch input unit
    #[arg(long, value_enum)]
    pub unit: Option<BatchUnit>,
    /// Batch size in the selected unit
    #[arg(short, long)]
    pub batch_size: Option<f64>,
    /// Bottle size in mL
    #[arg(long)]
    pub bottle_ml: Option<u32>,
    /// Production loss allowance in percent
    #[arg(long)]
    pub loss: Option<f64>,
    /// Write the batch breakdown CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// 설정과 옵션을 합쳐 계산 입력 스냅샷을 만든다.
pub fn build_input(config: &Config, opts: &CalcOptions) -> Result<FormulationInput, AppError> {
    let rows = match &opts.recipe {
        Some(path) => recipe::load_recipe(path)?,
        None => opts.preset.unwrap_or(config.preset).rows(),
    };
    let mut settings = config.settings.clone();
    if let Some(v) = opts.density {
        settings.final_density_kg_per_l = v;
    }
    if let Some(v) = opts.unit {
        settings.batch_unit = v;
    }
    if let Some(v) = opts.batch_size {
        settings.batch_size = v;
    }
    if let Some(v) = opts.bottle_ml {
        settings.bottle_size_ml = v;
    }
    if let Some(v) = opts.loss {
        settings.bottle_loss_percent = v;
    }
    Ok(FormulationInput { rows, settings })
}

/// 입력을 계산하고 경고를 로그로 남긴다.
pub fn evaluate_logged(
    input: &FormulationInput,
    tr: &Translator,
) -> Result<FormulationReport, AppError> {
    let result = evaluate(input)?;
    for w in &result.warnings {
        warn!("{}", report::warning_message(w, tr));
    }
    Ok(result)
}

/// `calc` 명령: 계산 결과 텍스트를 돌려주고, 요청 시 CSV를 쓴다.
pub fn calc(config: &Config, opts: &CalcOptions, tr: &Translator) -> Result<String, AppError> {
    let input = build_input(config, opts)?;
    let result = evaluate_logged(&input, tr)?;
    let mut text = report::render(&result, &input.settings, tr);
    if let Some(path) = &opts.csv {
        csv_export::write_csv(path, &result.batch)?;
        text.push_str(&format!("{} {}\n", tr.t(i18n::keys::EXPORT_DONE), path.display()));
    }
    Ok(text)
}

/// `presets` 명령: 프리셋과 원료 구성을 나열한다.
pub fn list_presets() -> String {
    let mut out = String::new();
    for preset in Preset::ALL {
        let value = clap::ValueEnum::to_possible_value(&preset)
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        out.push_str(&format!("{} [{}]\n", preset.label(), value));
        for row in preset.rows() {
            out.push_str(&format!(
                "  {:<34} {:>6.2}%  active {:.2}\n",
                row.name, row.percent, row.active_frac
            ));
        }
    }
    out
}

/// 대화식 메뉴 루프를 실행한다.
pub fn run_interactive(config: &mut Config, tr: &mut Translator) -> Result<(), AppError> {
    let mut session = Session::from_config(config);
    println!("{}", tr.t(i18n::keys::APP_TITLE));
    println!("{}", tr.t(i18n::keys::APP_CAPTION));
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Preset => ui_cli::handle_preset(tr, &mut session)?,
            MenuChoice::Ingredients => ui_cli::handle_ingredients(tr, &mut session)?,
            MenuChoice::Settings => ui_cli::handle_settings(tr, &mut session)?,
            MenuChoice::Report => ui_cli::show_report(tr, &session)?,
            MenuChoice::Export => ui_cli::handle_export(tr, &session, config)?,
            MenuChoice::Notes => ui_cli::show_notes(tr),
            MenuChoice::Language => {
                *tr = ui_cli::handle_language(tr, config)?;
            }
            MenuChoice::Save => {
                session.store_into(config);
                config.save()?;
                info!(path = %config.path().display(), "settings saved");
                println!("{} {}", tr.t(i18n::keys::SETTINGS_SAVED), config.path().display());
            }
            MenuChoice::SaveRecipe => ui_cli::handle_save_recipe(tr, &session)?,
            MenuChoice::Exit => {
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}
