mod file_config;

pub use file_config::FileConfig;

use crate::source::ReorderPolicy;
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PATH: &str = "sparkify.db";
pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub song_data: Option<PathBuf>,
    pub log_data: Option<PathBuf>,
    pub reorder_policy: ReorderPolicy,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub reorder_policy: ReorderPolicy,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let song_data = file
            .song_data
            .map(PathBuf::from)
            .or_else(|| cli.song_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SONG_DATA));
        validate_data_dir("song_data", &song_data)?;

        let log_data = file
            .log_data
            .map(PathBuf::from)
            .or_else(|| cli.log_data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DATA));
        validate_data_dir("log_data", &log_data)?;

        let reorder_policy = match file.reorder_policy {
            Some(s) => parse_reorder_policy(&s)
                .ok_or_else(|| anyhow!("Invalid reorder_policy in config file: {}", s))?,
            None => cli.reorder_policy,
        };

        Ok(Self {
            db_path,
            song_data,
            log_data,
            reorder_policy,
        })
    }
}

fn validate_data_dir(name: &str, path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("{} directory does not exist: {:?}", name, path);
    }
    if !path.is_dir() {
        bail!("{} is not a directory: {:?}", name, path);
    }
    Ok(())
}

/// Parses a reorder policy string.
/// Uses clap's ValueEnum trait for parsing.
fn parse_reorder_policy(s: &str) -> Option<ReorderPolicy> {
    ReorderPolicy::from_str(s, true).ok()
}
