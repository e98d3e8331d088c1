//! Test fixture creation for data trees and the warehouse database
#![allow(dead_code)]

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{json, Value};
use sparkify_etl::config::{AppConfig, CliConfig};
use sparkify_etl::{ReorderPolicy, Warehouse};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SONG_DURATION: f64 = 218.93179;

/// A temporary `song_data/` + `log_data/` tree next to a provisioned,
/// empty warehouse database.
pub struct TestData {
    pub dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("song_data")).unwrap();
        fs::create_dir_all(dir.path().join("log_data")).unwrap();
        let data = TestData { dir };
        Warehouse::provision(data.db_path()).unwrap().close().unwrap();
        data
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("sparkify.db")
    }

    pub fn song_root(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_root(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn config(&self) -> AppConfig {
        self.config_with_policy(ReorderPolicy::KeepAll)
    }

    pub fn config_with_policy(&self, reorder_policy: ReorderPolicy) -> AppConfig {
        let cli = CliConfig {
            db_path: Some(self.db_path()),
            song_data: Some(self.song_root()),
            log_data: Some(self.log_root()),
            reorder_policy,
        };
        AppConfig::resolve(&cli, None).unwrap()
    }

    pub fn write_song(&self, relative: &str, record: &Value) -> PathBuf {
        write_lines(&self.song_root().join(relative), std::slice::from_ref(record))
    }

    pub fn write_log(&self, relative: &str, events: &[Value]) -> PathBuf {
        write_lines(&self.log_root().join(relative), events)
    }

    pub fn conn(&self) -> Connection {
        Connection::open(self.db_path()).unwrap()
    }

    /// Every row of `table`, sorted by all columns.
    pub fn dump_table(&self, table: &str) -> Vec<Vec<SqlValue>> {
        let conn = self.conn();
        let column_count = conn
            .prepare(&format!("SELECT * FROM {}", table))
            .unwrap()
            .column_count();
        let order_by: Vec<String> = (1..=column_count).map(|i| i.to_string()).collect();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT * FROM {} ORDER BY {}",
                table,
                order_by.join(", ")
            ))
            .unwrap();
        stmt.query_map([], |row| {
            (0..column_count)
                .map(|i| row.get::<_, SqlValue>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap()
    }

    pub fn count(&self, table: &str) -> i64 {
        self.conn()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap()
    }

    /// Level of a user, `None` if the user was never written.
    pub fn user_level(&self, user_id: i64) -> Option<String> {
        self.conn()
            .query_row(
                "SELECT level FROM users WHERE user_id = ?1",
                params![user_id],
                |r| r.get::<_, Option<String>>(0),
            )
            .optional()
            .unwrap()
            .flatten()
    }

    /// (start_time, user_id, song_id, artist_id) of every songplay, in
    /// insertion order.
    pub fn songplays(&self) -> Vec<(i64, i64, Option<String>, Option<String>)> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT start_time, user_id, song_id, artist_id
                 FROM songplays ORDER BY songplay_id",
            )
            .unwrap();
        stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap()
    }
}

fn write_lines(path: &Path, records: &[Value]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    fs::write(path, lines.join("\n")).unwrap();
    path.to_path_buf()
}

/// A song file record.
pub fn song(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 0,
    })
}

/// A `NextSong` log event.
pub fn play(
    ts: i64,
    user_id: i64,
    level: &str,
    title: &str,
    artist: &str,
    length: f64,
) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Test",
        "gender": "F",
        "itemInSession": 0,
        "lastName": format!("User{}", user_id),
        "length": length,
        "level": level,
        "location": "San Jose-Sunnyvale-Santa Clara, CA",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540266185796.0,
        "sessionId": 100 + user_id,
        "song": title,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (Windows NT 6.1; WOW64)",
        "userId": user_id.to_string(),
    })
}

/// A non-playing log event, e.g. "Home" or "Logout".
pub fn page_view(ts: i64, user_id: Option<i64>, page: &str) -> Value {
    json!({
        "artist": null,
        "auth": if user_id.is_some() { "Logged In" } else { "Logged Out" },
        "firstName": user_id.map(|_| "Test"),
        "gender": user_id.map(|_| "F"),
        "itemInSession": 0,
        "lastName": user_id.map(|id| format!("User{}", id)),
        "length": null,
        "level": "free",
        "location": null,
        "method": "GET",
        "page": page,
        "registration": null,
        "sessionId": 1,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": null,
        "userId": user_id.map(|id| id.to_string()).unwrap_or_default(),
    })
}
