//! Sparkify ETL Library
//!
//! Loads song metadata and listening event logs (newline-delimited JSON)
//! into a SQLite star schema: `songplays` facts plus `users`, `songs`,
//! `artists` and `time` dimensions.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod sqlite_persistence;
pub mod transform;
pub mod warehouse;

pub use error::EtlError;
pub use pipeline::{load_dataset, process_data, run, Dataset, LoadSummary, RunSummary};
pub use source::ReorderPolicy;
pub use warehouse::Warehouse;
