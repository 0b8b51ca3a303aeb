//! Schema definitions for `ClickHouse` tables.

/// Table schema definition.
#[derive(Debug)]
pub struct TableSchema {
    /// Table name.
    pub name: &'static str,
    /// Column definitions.
    pub columns: &'static str,
    /// Table engine.
    pub engine: &'static str,
    /// Sorting key.
    pub order_by: &'static str,
}

/// Names of all tables.
pub const TABLES: &[&str] = &["logs"];

/// Schema definitions for tables.
///
/// `logs` uses `ReplacingMergeTree` over the natural key so re-inserting a
/// window after a restart collapses to the same rows instead of duplicating
/// them.
pub const TABLE_SCHEMAS: &[TableSchema] = &[TableSchema {
    name: "logs",
    columns: "address FixedString(20),
             topics Array(FixedString(32)),
             data String,
             block_number UInt64,
             tx_hash FixedString(32),
             tx_index UInt64,
             log_index UInt64,
             inserted_at DateTime64(3) DEFAULT now64()",
    engine: "ReplacingMergeTree(inserted_at)",
    order_by: "address, block_number, log_index",
}];
