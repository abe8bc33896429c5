use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use log::LevelFilter;
use serde::Deserialize;

use crate::datetime::Clock;

/// 設定ファイルを置くディレクトリ名。
const APP_DIR: &str = "perfusion-charge";
/// 設定ファイル名。
const CONFIG_FILE: &str = "config.json";

/// 日時を置く基準年の決め方。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceYear {
    /// システム時刻の年を利用する。
    #[default]
    System,
    /// 指定された年を利用する。
    Fixed(i32),
}

impl ReferenceYear {
    /// 基準年を決定する。
    pub fn resolve<C: Clock>(&self, clock: &C) -> i32 {
        match self {
            ReferenceYear::System => clock.today().year(),
            ReferenceYear::Fixed(year) => *year,
        }
    }
}

/// アプリケーションの設定。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reference_year: ReferenceYear,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_year: ReferenceYear::System,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 設定を読み込む。
    ///
    /// パスが指定された場合はそのファイルを読み込む。
    /// 指定されない場合は`~/.config/perfusion-charge/config.json`を読み込み、存在しなければデフォルト値を返す。
    ///
    /// # Arguments
    ///
    /// * `path` - 設定ファイルのパス
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = default_config_path()?;
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }

    /// ログレベルを返す。
    pub fn log_level(&self) -> Result<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .with_context(|| format!("Invalid log level: {}", self.log_level))
    }
}

/// デフォルトの設定ファイルのパスを返す。
fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Failed to get config directory")?;

    Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
}
