//! Replay ordering for event log files.
//!
//! User levels are written last-write-wins, so log files must be loaded in
//! the order of the events they contain. Each file is keyed by the smallest
//! `ts` among all of its records, whatever the page.

use super::records::read_records;
use crate::error::{EtlError, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What to do with log files that share the same minimum timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReorderPolicy {
    /// Keep every file; ties are broken by path.
    #[default]
    KeepAll,
    /// Keep one file per minimum timestamp, the last one encountered.
    CollapseDuplicates,
}

#[derive(Deserialize)]
struct Timestamped {
    ts: i64,
}

/// Smallest event timestamp (epoch ms) in a log file.
pub fn min_timestamp(path: &Path) -> Result<i64> {
    read_records::<Timestamped>(path)?
        .iter()
        .map(|r| r.record.ts)
        .min()
        .ok_or_else(|| EtlError::EmptyFile(path.to_path_buf()))
}

/// Order log files ascending by their minimum event timestamp.
pub fn reorder_log_files(files: Vec<PathBuf>, policy: ReorderPolicy) -> Result<Vec<PathBuf>> {
    let mut keyed = Vec::with_capacity(files.len());
    for path in files {
        let ts = min_timestamp(&path)?;
        debug!("{} starts at {}", path.display(), ts);
        keyed.push((ts, path));
    }

    match policy {
        ReorderPolicy::KeepAll => {
            keyed.sort();
            for pair in keyed.windows(2) {
                if pair[0].0 == pair[1].0 {
                    debug!(
                        "{} and {} share minimum timestamp {}, ordering by path",
                        pair[0].1.display(),
                        pair[1].1.display(),
                        pair[0].0
                    );
                }
            }
            Ok(keyed.into_iter().map(|(_, path)| path).collect())
        }
        ReorderPolicy::CollapseDuplicates => {
            let mut by_ts: BTreeMap<i64, PathBuf> = BTreeMap::new();
            for (ts, path) in keyed {
                if let Some(dropped) = by_ts.insert(ts, path) {
                    warn!(
                        "Dropping {} from the load: another file shares minimum timestamp {}",
                        dropped.display(),
                        ts
                    );
                }
            }
            Ok(by_ts.into_values().collect())
        }
    }
}
