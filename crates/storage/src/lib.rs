//! `ClickHouse` persistence for fetched event logs.
//!
//! Split into a writer (DDL and inserts) and a reader (resume point and log
//! queries), sharing the row models and table schema.

pub mod models;
pub mod reader;
pub mod schema;
pub mod writer;

pub use models::{LogRow, LogRowError, ProgressRow, adapt_logs};
pub use reader::ClickhouseReader;
pub use writer::ClickhouseWriter;
