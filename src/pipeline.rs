//! Load orchestration.
//!
//! Discovers the data files of a dataset, puts log files in replay order,
//! then runs the dataset's transformer on each file inside its own
//! transaction. The first failure aborts the rest of the batch; files
//! committed before it stay loaded, and a rerun leaves the dimension tables
//! unchanged because every dimension write is an upsert.

use crate::config::AppConfig;
use crate::error::Result;
use crate::source::{find_files, reorder_log_files, ReorderPolicy, DATA_FILE_EXTENSION};
use crate::transform::{process_log_file, process_song_file, FileStats, FileTransformer};
use crate::warehouse::Warehouse;
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// One song (and its artist) per file.
    Songs,
    /// User activity logs, many events per file.
    Logs,
}

impl Dataset {
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Songs => "song data",
            Dataset::Logs => "log data",
        }
    }

    pub fn transformer(self) -> FileTransformer {
        match self {
            Dataset::Songs => process_song_file,
            Dataset::Logs => process_log_file,
        }
    }

    /// Only logs carry mutable user state, so only they need replay order.
    pub fn needs_reorder(self) -> bool {
        matches!(self, Dataset::Logs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Data files discovered under the root.
    pub files_found: usize,
    /// Files left after reordering; fewer than found when duplicates collapse.
    pub files_scheduled: usize,
    pub files_processed: usize,
    pub totals: FileStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub songs: LoadSummary,
    pub logs: LoadSummary,
    pub table_counts: Vec<(&'static str, i64)>,
}

/// Run `transform` over every data file under `root`, committing after each
/// file. When `reorder` is set, files are first sorted into replay order.
pub fn process_data(
    conn: &mut Connection,
    root: &Path,
    reorder: Option<ReorderPolicy>,
    transform: FileTransformer,
) -> Result<LoadSummary> {
    let mut files = find_files(root, DATA_FILE_EXTENSION)?;
    let files_found = files.len();
    info!("{} files found in {}", files_found, root.display());

    if let Some(policy) = reorder {
        files = reorder_log_files(files, policy)?;
    }
    let num_files = files.len();
    if num_files < files_found {
        info!("{} of them scheduled for loading", num_files);
    }

    let mut summary = LoadSummary {
        files_found,
        files_scheduled: num_files,
        ..Default::default()
    };

    for (i, path) in files.iter().enumerate() {
        let tx = conn.transaction()?;
        let stats = transform(&tx, path).inspect_err(|e| {
            error!("Failed to load {}: {}", path.display(), e);
        })?;
        tx.commit()?;

        debug!("{}: {:?}", path.display(), stats);
        summary.files_processed += 1;
        summary.totals += stats;
        info!("{}/{} files processed.", i + 1, num_files);
    }

    Ok(summary)
}

/// Load one dataset into the warehouse.
pub fn load_dataset(
    warehouse: &mut Warehouse,
    root: &Path,
    dataset: Dataset,
    policy: ReorderPolicy,
) -> Result<LoadSummary> {
    info!("Loading {} from {}...", dataset.name(), root.display());
    let reorder = dataset.needs_reorder().then_some(policy);
    process_data(
        warehouse.connection_mut(),
        root,
        reorder,
        dataset.transformer(),
    )
}

/// Load song data, then log data, using a single warehouse connection for
/// the whole run.
pub fn run(config: &AppConfig) -> Result<RunSummary> {
    info!("Opening warehouse at {:?}...", config.db_path);
    let mut warehouse = Warehouse::open(&config.db_path)?;

    let songs = load_dataset(
        &mut warehouse,
        &config.song_data,
        Dataset::Songs,
        config.reorder_policy,
    )?;
    log_summary(Dataset::Songs, &songs);

    let logs = load_dataset(
        &mut warehouse,
        &config.log_data,
        Dataset::Logs,
        config.reorder_policy,
    )?;
    log_summary(Dataset::Logs, &logs);

    let table_counts = warehouse.table_counts()?;
    info!("Warehouse contains:");
    for (table, count) in &table_counts {
        info!("  {} {}", count, table);
    }

    warehouse.close()?;
    Ok(RunSummary {
        songs,
        logs,
        table_counts,
    })
}

fn log_summary(dataset: Dataset, summary: &LoadSummary) {
    let totals = &summary.totals;
    match dataset {
        Dataset::Songs => info!(
            "Loaded {} files of {}: {} new songs, {} new artists",
            summary.files_processed,
            dataset.name(),
            totals.songs,
            totals.artists
        ),
        Dataset::Logs => info!(
            "Loaded {} files of {}: {} songplays ({} without a matching song), {} new time rows, {} user writes, {} other events skipped",
            summary.files_processed,
            dataset.name(),
            totals.songplays,
            totals.unmatched_songplays,
            totals.time_rows,
            totals.user_writes,
            totals.skipped_events
        ),
    }
}
