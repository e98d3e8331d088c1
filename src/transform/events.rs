use super::{time_row, FileStats};
use crate::error::{EtlError, Result};
use crate::source::{read_records, LogEvent, Numbered, PlayEvent};
use crate::warehouse::{SongplayRow, Warehouse};
use rusqlite::Connection;
use std::path::Path;

/// Load the song plays of an event log file.
///
/// Writes one time row per distinct start time, one user write per play in
/// timestamp order (so the latest level wins), and one songplay per play in
/// file order. Any invalid record fails the whole file.
pub fn process_log_file(conn: &Connection, path: &Path) -> Result<FileStats> {
    let events = read_records::<LogEvent>(path)?;
    let total_events = events.len();

    let plays = events
        .into_iter()
        .filter(|event| event.record.is_song_play())
        .map(|event| {
            let line = event.line;
            event
                .record
                .into_play()
                .map(|record| Numbered { line, record })
                .map_err(|field| EtlError::MissingField {
                    path: path.to_path_buf(),
                    line,
                    field,
                })
        })
        .collect::<Result<Vec<Numbered<PlayEvent>>>>()?;

    let mut stats = FileStats {
        skipped_events: total_events - plays.len(),
        ..Default::default()
    };

    let times = plays
        .iter()
        .map(|play| {
            time_row(play.record.ts).ok_or_else(|| EtlError::TimestampOutOfRange {
                path: path.to_path_buf(),
                line: play.line,
                ts: play.record.ts,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for time in &times {
        if Warehouse::insert_time(conn, time)? {
            stats.time_rows += 1;
        }
    }

    let mut chronological: Vec<&PlayEvent> = plays.iter().map(|p| &p.record).collect();
    chronological.sort_by_key(|play| play.ts);
    for play in chronological {
        if Warehouse::upsert_user(conn, &play.user_row())? {
            stats.user_writes += 1;
        }
    }

    for Numbered { record: play, .. } in plays {
        let found = Warehouse::find_song_artist(
            conn,
            play.song.as_deref(),
            play.artist.as_deref(),
            play.length,
        )?;
        if found.is_none() {
            stats.unmatched_songplays += 1;
        }
        let (song_id, artist_id) = match found {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => (None, None),
        };

        let songplay = SongplayRow {
            start_time: play.ts,
            user_id: play.user_id,
            level: play.level,
            song_id,
            artist_id,
            session_id: play.session_id,
            location: play.location,
            user_agent: play.user_agent,
        };
        if Warehouse::insert_songplay(conn, &songplay)? {
            stats.songplays += 1;
        }
    }

    Ok(stats)
}
