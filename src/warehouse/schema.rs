//! SQLite schema definitions for the Sparkify star schema.
//!
//! One fact table (`songplays`) and four dimension tables. Song and artist
//! references on songplays are plain values, not foreign keys, since they are
//! NULL whenever an event could not be matched to a known song.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

// =============================================================================
// Fact Table
// =============================================================================

const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", &SqlType::Integer, non_null = true), // epoch ms
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text),
        sqlite_column!("song_id", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("session_id", &SqlType::Integer),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[],
};

// =============================================================================
// Dimension Tables
// =============================================================================

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("first_name", &SqlType::Text, non_null = true),
        sqlite_column!("last_name", &SqlType::Text, non_null = true),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text), // 'free' or 'paid', last write wins
    ],
    indices: &[],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Real, check = Some("duration >= 0")),
    ],
    indices: &[("idx_songs_title", "title")],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
};

const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!(
            "start_time",
            &SqlType::Integer,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("hour", &SqlType::Integer),
        sqlite_column!("day", &SqlType::Integer),
        sqlite_column!("week_of_year", &SqlType::Integer),
        sqlite_column!("month", &SqlType::Integer),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("weekday", &SqlType::Integer), // Monday = 0
    ],
    indices: &[],
};

pub const WAREHOUSE_SCHEMA: VersionedSchema = VersionedSchema {
    version: 1,
    tables: &[
        SONGPLAYS_TABLE,
        USERS_TABLE,
        SONGS_TABLE,
        ARTISTS_TABLE,
        TIME_TABLE,
    ],
};

/// Names of all warehouse tables, fact table first.
pub fn table_names() -> impl Iterator<Item = &'static str> {
    WAREHOUSE_SCHEMA.tables.iter().map(|t| t.name)
}
