//! Raw JSON records and their typed decoding.
//!
//! Data files hold one JSON object per line. Song files hold a single song
//! record; log files hold one record per user action.

use crate::error::{EtlError, Result};
use crate::warehouse::{ArtistRow, SongRow, UserRow};
use serde::{de, Deserialize, Deserializer};
use std::fs;
use std::path::Path;

/// Page value of log events that represent a song being played.
pub const NEXT_SONG_PAGE: &str = "NextSong";

/// A decoded record together with its 1-based line number in the source file.
#[derive(Debug, Clone)]
pub struct Numbered<T> {
    pub line: usize,
    pub record: T,
}

/// Decode every non-blank line of a newline-delimited JSON file.
pub fn read_records<T>(path: &Path) -> Result<Vec<Numbered<T>>>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path).map_err(|e| EtlError::io(path, e))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map(|record| Numbered {
                    line: index + 1,
                    record,
                })
                .map_err(|source| EtlError::Json {
                    path: path.to_path_buf(),
                    line: index + 1,
                    source,
                })
        })
        .collect()
}

// =============================================================================
// Song files
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

impl SongRecord {
    pub fn song_row(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        }
    }

    pub fn artist_row(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

// =============================================================================
// Log files
// =============================================================================

/// One user action from an event log.
///
/// Fields read by the loader must be present in every record, although most
/// may be `null` (e.g. `song` on a page view). Profile fields may be absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub ts: i64,
    pub page: String,
    #[serde(deserialize_with = "user_id")]
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub song: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub artist: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub length: Option<f64>,
    pub session_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub location: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub user_agent: Option<String>,
}

/// A `NextSong` event with the user fields required to load it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    pub ts: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl LogEvent {
    pub fn is_song_play(&self) -> bool {
        self.page == NEXT_SONG_PAGE
    }

    /// Validate a song play event, returning the name of the first missing
    /// field on failure.
    pub fn into_play(self) -> std::result::Result<PlayEvent, &'static str> {
        Ok(PlayEvent {
            ts: self.ts,
            user_id: self.user_id.ok_or("userId")?,
            first_name: self.first_name.ok_or("firstName")?,
            last_name: self.last_name.ok_or("lastName")?,
            gender: self.gender,
            level: self.level,
            song: self.song,
            artist: self.artist,
            length: self.length,
            session_id: self.session_id,
            location: self.location,
            user_agent: self.user_agent,
        })
    }
}

impl PlayEvent {
    pub fn user_row(&self) -> UserRow {
        UserRow {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }
}

/// Required-but-nullable field: unlike a plain `Option`, absence is an error.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(i64),
    Text(String),
}

/// Logs carry user ids as numbers or numeric strings; logged-out actions
/// have an empty string.
fn user_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawUserId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawUserId::Number(id)) => Ok(Some(id)),
        Some(RawUserId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawUserId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid userId {:?}", text))),
    }
}
