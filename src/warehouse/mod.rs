mod rows;
mod schema;
mod statements;
mod store;

pub use rows::*;
pub use schema::{table_names, WAREHOUSE_SCHEMA};
pub use statements::Statement;
pub use store::Warehouse;
