use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::formulation::csv_export::DEFAULT_CSV_FILE_NAME;
use crate::formulation::{GlobalSettings, Preset};

/// 기본 설정 파일 이름.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(en/my/auto). None이면 시스템 로케일을 따른다.
    pub language: Option<String>,
    /// 사용자 언어팩(TOML) 디렉터리
    pub language_pack_dir: Option<String>,
    /// 시작 시 불러올 프리셋
    pub preset: Preset,
    /// CSV 내보내기 기본 파일명
    pub csv_file_name: String,
    /// 전역 계산 설정 기본값
    pub settings: GlobalSettings,
    #[serde(skip)]
    path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            language_pack_dir: None,
            preset: Preset::default(),
            csv_file_name: DEFAULT_CSV_FILE_NAME.to_string(),
            settings: GlobalSettings::default(),
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Serde(#[from] toml::de::Error),
    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "config loaded");
        cfg
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        info!(path = %path.display(), "default config written");
        cfg
    };
    cfg.path = path.to_path_buf();
    Ok(cfg)
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 로드했던 경로에 설정을 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        save_config(self, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
