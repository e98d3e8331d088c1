//! Parameterized DML used by the loader.
//!
//! Every statement the pipeline runs against the warehouse is listed here,
//! keyed by the operation it performs. Execution goes through rusqlite's
//! prepared statement cache, so each template is compiled once per connection.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statement {
    InsertSong,
    InsertArtist,
    UpsertUser,
    InsertTime,
    InsertSongplay,
    FindSongArtist,
}

impl Statement {
    pub const ALL: [Statement; 6] = [
        Statement::InsertSong,
        Statement::InsertArtist,
        Statement::UpsertUser,
        Statement::InsertTime,
        Statement::InsertSongplay,
        Statement::FindSongArtist,
    ];

    pub fn sql(self) -> &'static str {
        match self {
            Statement::InsertSong => {
                "INSERT INTO songs (song_id, title, artist_id, year, duration)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT DO NOTHING"
            }
            Statement::InsertArtist => {
                "INSERT INTO artists (artist_id, name, location, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT DO NOTHING"
            }
            Statement::UpsertUser => {
                "INSERT INTO users (user_id, first_name, last_name, gender, level)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (user_id) DO UPDATE SET level = excluded.level"
            }
            Statement::InsertTime => {
                "INSERT INTO time (start_time, hour, day, week_of_year, month, year, weekday)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT DO NOTHING"
            }
            Statement::InsertSongplay => {
                "INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT DO NOTHING"
            }
            Statement::FindSongArtist => {
                "SELECT s.song_id, a.artist_id
                 FROM songs s
                 JOIN artists a ON s.artist_id = a.artist_id
                 WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3"
            }
        }
    }
}
