//! Per-file transformers.
//!
//! A transformer reads one data file, turns its records into warehouse rows
//! and writes them through the given connection. It never commits: the
//! caller owns the transaction boundary.

mod events;
mod song;
mod time;

pub use events::process_log_file;
pub use song::process_song_file;
pub use time::time_row;

use crate::error::Result;
use rusqlite::Connection;
use std::ops::AddAssign;
use std::path::Path;

/// Signature shared by all file transformers.
pub type FileTransformer = fn(&Connection, &Path) -> Result<FileStats>;

/// What a transformer wrote for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Songs newly inserted.
    pub songs: usize,
    /// Artists newly inserted.
    pub artists: usize,
    /// Time rows newly inserted.
    pub time_rows: usize,
    /// User rows inserted or updated.
    pub user_writes: usize,
    pub songplays: usize,
    /// Songplays with no matching song/artist.
    pub unmatched_songplays: usize,
    /// Log events that were not song plays.
    pub skipped_events: usize,
}

impl AddAssign for FileStats {
    fn add_assign(&mut self, other: Self) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.time_rows += other.time_rows;
        self.user_writes += other.user_writes;
        self.songplays += other.songplays;
        self.unmatched_songplays += other.unmatched_songplays;
        self.skipped_events += other.skipped_events;
    }
}
