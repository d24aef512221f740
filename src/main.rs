use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formulation_calculator::app::{self, AppError, CalcOptions};
use formulation_calculator::config::{self, DEFAULT_CONFIG_FILE};
use formulation_calculator::i18n::{self, Translator};
use formulation_calculator::ui_cli;

#[derive(Parser)]
#[command(name = "formulation_calculator")]
#[command(about = "Dishwashing liquid formulation calculator: QS water, AM%, batch weights, cost, bottles")]
struct Cli {
    /// Path to the TOML config file (created with defaults if missing)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Language: en, my or auto
    #[arg(long, default_value = "auto")]
    lang: String,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formulation and print the batch breakdown
    Calc(CalcOptions),
    /// List the built-in preset formulations
    Presets,
    /// Practical formulation notes
    Notes,
    /// Menu-driven form (default)
    Interactive,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 요청된 명령을 실행한다.
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = try_run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// `--verbose` 또는 RUST_LOG가 있을 때만 stderr 로깅을 켠다.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        Some(EnvFilter::new("formulation_calculator=debug"))
    } else {
        EnvFilter::try_from_default_env().ok()
    };
    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_default(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, cfg.language.as_deref());
    let mut tr = Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Calc(opts) => print!("{}", app::calc(&cfg, &opts, &tr)?),
        Commands::Presets => print!("{}", app::list_presets()),
        Commands::Notes => ui_cli::show_notes(&tr),
        Commands::Interactive => app::run_interactive(&mut cfg, &mut tr)?,
    }
    Ok(())
}
