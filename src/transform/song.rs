use super::FileStats;
use crate::error::{EtlError, Result};
use crate::source::{read_records, SongRecord};
use crate::warehouse::Warehouse;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Load the song and its artist from a single-song file.
pub fn process_song_file(conn: &Connection, path: &Path) -> Result<FileStats> {
    let mut records = read_records::<SongRecord>(path)?.into_iter();
    let song = records
        .next()
        .ok_or_else(|| EtlError::EmptyFile(path.to_path_buf()))?
        .record;
    if records.next().is_some() {
        debug!(
            "{} holds more than one song, loading only the first",
            path.display()
        );
    }

    let mut stats = FileStats::default();
    if Warehouse::insert_song(conn, &song.song_row())? {
        stats.songs += 1;
    }
    if Warehouse::insert_artist(conn, &song.artist_row())? {
        stats.artists += 1;
    }
    Ok(stats)
}
