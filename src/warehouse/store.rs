//! SQLite-backed warehouse.
//!
//! This module provides the `Warehouse`, which owns the single connection used
//! for a whole run, plus the row-level writes and the song/artist lookup the
//! transformers issue against it.

use super::rows::*;
use super::schema::{table_names, WAREHOUSE_SCHEMA};
use super::statements::Statement;
use crate::error::{EtlError, Result};
use crate::sqlite_persistence::VersionedSchema;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    /// Open an already provisioned warehouse for loading.
    ///
    /// Fails if the database file does not exist or cannot be opened, or if
    /// any of the star schema tables is missing or does not match the
    /// expected layout. Never creates the database file.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Self::open_connection(db_path.as_ref(), OpenFlags::empty())?;
        Self::from_connection(conn)
    }

    /// Wrap an existing connection, validating its schema.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        WAREHOUSE_SCHEMA
            .validate(&conn)
            .map_err(|e| EtlError::Schema(format!("{:#}", e)))?;

        let stamped = VersionedSchema::stamped_version(&conn)
            .map_err(|e| EtlError::Schema(format!("{:#}", e)))?;
        match stamped {
            Some(version) if version != WAREHOUSE_SCHEMA.version => warn!(
                "Warehouse schema version is {}, expected {}",
                version, WAREHOUSE_SCHEMA.version
            ),
            None => debug!("Warehouse schema has no version stamp"),
            _ => {}
        }

        Ok(Warehouse { conn })
    }

    /// Drop and recreate all warehouse tables, returning the opened warehouse.
    pub fn provision<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Self::open_connection(db_path.as_ref(), OpenFlags::SQLITE_OPEN_CREATE)?;
        Self::reset_schema(&conn)?;
        Self::from_connection(conn)
    }

    /// Drop and recreate all warehouse tables on the given connection.
    pub fn reset_schema(conn: &Connection) -> Result<()> {
        info!("Dropping warehouse tables...");
        WAREHOUSE_SCHEMA
            .drop(conn)
            .map_err(|e| EtlError::Schema(format!("{:#}", e)))?;
        info!(
            "Creating warehouse schema at version {}",
            WAREHOUSE_SCHEMA.version
        );
        WAREHOUSE_SCHEMA
            .create(conn)
            .map_err(|e| EtlError::Schema(format!("{:#}", e)))?;
        Ok(())
    }

    fn open_connection(db_path: &Path, extra_flags: OpenFlags) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | extra_flags,
        )?;
        Ok(conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Mutable access, needed to open per-file transactions.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn count_rows(&self, table: &str) -> Result<i64> {
        if !table_names().any(|name| name == table) {
            return Err(EtlError::Schema(format!("Unknown table {}", table)));
        }
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(count)
    }

    /// Row counts for every warehouse table, fact table first.
    pub fn table_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        table_names()
            .map(|name| Ok((name, self.count_rows(name)?)))
            .collect()
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| EtlError::Database(e))
    }

    // =========================================================================
    // Row writes
    //
    // These take a plain `&Connection` so they run unchanged inside a
    // `rusqlite::Transaction`. Each returns whether the row changed the table.
    // =========================================================================

    pub fn insert_song(conn: &Connection, song: &SongRow) -> Result<bool> {
        let mut stmt = conn.prepare_cached(Statement::InsertSong.sql())?;
        let changed = stmt.execute(params![
            song.song_id,
            song.title,
            song.artist_id,
            song.year,
            song.duration
        ])?;
        Ok(changed > 0)
    }

    pub fn insert_artist(conn: &Connection, artist: &ArtistRow) -> Result<bool> {
        let mut stmt = conn.prepare_cached(Statement::InsertArtist.sql())?;
        let changed = stmt.execute(params![
            artist.artist_id,
            artist.name,
            artist.location,
            artist.latitude,
            artist.longitude
        ])?;
        Ok(changed > 0)
    }

    /// Insert a user, or overwrite only its level if the user already exists.
    pub fn upsert_user(conn: &Connection, user: &UserRow) -> Result<bool> {
        let mut stmt = conn.prepare_cached(Statement::UpsertUser.sql())?;
        let changed = stmt.execute(params![
            user.user_id,
            user.first_name,
            user.last_name,
            user.gender,
            user.level
        ])?;
        Ok(changed > 0)
    }

    pub fn insert_time(conn: &Connection, time: &TimeRow) -> Result<bool> {
        let mut stmt = conn.prepare_cached(Statement::InsertTime.sql())?;
        let changed = stmt.execute(params![
            time.start_time,
            time.hour,
            time.day,
            time.week_of_year,
            time.month,
            time.year,
            time.weekday
        ])?;
        Ok(changed > 0)
    }

    pub fn insert_songplay(conn: &Connection, songplay: &SongplayRow) -> Result<bool> {
        let mut stmt = conn.prepare_cached(Statement::InsertSongplay.sql())?;
        let changed = stmt.execute(params![
            songplay.start_time,
            songplay.user_id,
            songplay.level,
            songplay.song_id,
            songplay.artist_id,
            songplay.session_id,
            songplay.location,
            songplay.user_agent
        ])?;
        Ok(changed > 0)
    }

    /// Find the song and artist matching a played track's title, artist name
    /// and duration.
    pub fn find_song_artist(
        conn: &Connection,
        title: Option<&str>,
        artist_name: Option<&str>,
        duration: Option<f64>,
    ) -> Result<Option<SongArtistMatch>> {
        let mut stmt = conn.prepare_cached(Statement::FindSongArtist.sql())?;
        match stmt.query_row(params![title, artist_name, duration], |r| {
            Ok(SongArtistMatch {
                song_id: r.get(0)?,
                artist_id: r.get(1)?,
            })
        }) {
            Ok(found) => Ok(Some(found)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
