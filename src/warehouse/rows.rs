//! Typed rows, one struct per warehouse table.

#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Calendar decomposition of a play's start time, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: i64,
    pub hour: u32,
    pub day: u32,
    pub week_of_year: u32,
    pub month: u32,
    pub year: i32,
    /// Monday = 0 ... Sunday = 6
    pub weekday: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongplayRow {
    pub start_time: i64,
    pub user_id: i64,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

/// Keys of a song and its artist, as found by the dimension lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongArtistMatch {
    pub song_id: String,
    pub artist_id: String,
}
