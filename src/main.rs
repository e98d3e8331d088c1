use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_LOG_DATA, DEFAULT_SONG_DATA,
};
use sparkify_etl::pipeline;
use sparkify_etl::ReorderPolicy;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song metadata and listening logs into the Sparkify warehouse")]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, env = "SPARKIFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the SQLite warehouse database. Tables must already exist.
    #[clap(long, env = "SPARKIFY_DB")]
    pub db_path: Option<PathBuf>,

    /// Root directory of the song metadata files.
    #[clap(long, env = "SPARKIFY_SONG_DATA", default_value = DEFAULT_SONG_DATA)]
    pub song_data: PathBuf,

    /// Root directory of the event log files.
    #[clap(long, env = "SPARKIFY_LOG_DATA", default_value = DEFAULT_LOG_DATA)]
    pub log_data: PathBuf,

    /// How to order log files that start at the same timestamp.
    #[clap(
        long,
        env = "SPARKIFY_REORDER_POLICY",
        value_enum,
        default_value_t = ReorderPolicy::KeepAll
    )]
    pub reorder_policy: ReorderPolicy,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config = CliConfig {
        db_path: cli_args.db_path,
        song_data: Some(cli_args.song_data),
        log_data: Some(cli_args.log_data),
        reorder_policy: cli_args.reorder_policy,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let summary = pipeline::run(&config)
        .with_context(|| format!("Load into {:?} aborted", config.db_path))?;

    info!(
        "Done: {} song files and {} log files loaded.",
        summary.songs.files_processed, summary.logs.files_processed
    );
    Ok(())
}
