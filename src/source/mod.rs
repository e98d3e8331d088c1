mod discovery;
mod records;
mod reorder;

pub use discovery::{find_files, DATA_FILE_EXTENSION};
pub use records::{read_records, LogEvent, Numbered, PlayEvent, SongRecord, NEXT_SONG_PAGE};
pub use reorder::{min_timestamp, reorder_log_files, ReorderPolicy};
