//! Common test infrastructure
//!
//! Builds song/log data trees and a provisioned warehouse inside a temporary
//! directory, and reads table contents back for assertions.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{play, TestData};
//!
//! #[test]
//! fn test_single_play() {
//!     let data = TestData::new();
//!     data.write_log("2018/11/a.json", &[play(100, 7, "free", "Song", "Artist", 1.0)]);
//!     sparkify_etl::run(&data.config()).unwrap();
//! }
//! ```

mod fixtures;

pub use fixtures::*;
