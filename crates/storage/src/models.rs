//! Row models for the `logs` table.

use alloy::rpc::types::Log;
use clickhouse::Row;
use serde::{Deserialize, Serialize};

/// One emitted event log, keyed by `(address, block_number, log_index)`.
///
/// `(tx_hash, log_index)` identifies the same log from the transaction side
/// and is carried for query convenience.
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogRow {
    /// Emitting contract address.
    pub address: [u8; 20],
    /// Indexed topics, in order. Zero to four entries.
    pub topics: Vec<[u8; 32]>,
    /// Non-indexed payload, `0x`-prefixed hex.
    pub data: String,
    /// Block containing the log.
    pub block_number: u64,
    /// Transaction emitting the log.
    pub tx_hash: [u8; 32],
    /// Position of the transaction within its block.
    pub tx_index: u64,
    /// Position of the log within its block.
    pub log_index: u64,
}

/// Resume cursor: the highest persisted position for one contract.
#[derive(Debug, Clone, Copy, Row, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressRow {
    /// Highest block with a persisted log.
    pub block_number: u64,
    /// Highest log index within that block.
    pub log_index: u64,
}

/// A log that cannot be persisted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LogRowError {
    /// The log is from a pending block and has no stable position yet.
    #[error("pending log is missing its {0}")]
    Pending(&'static str),
}

impl TryFrom<&Log> for LogRow {
    type Error = LogRowError;

    fn try_from(log: &Log) -> Result<Self, Self::Error> {
        let block_number = log.block_number.ok_or(LogRowError::Pending("block number"))?;
        let tx_hash = log.transaction_hash.ok_or(LogRowError::Pending("transaction hash"))?;
        let tx_index = log.transaction_index.ok_or(LogRowError::Pending("transaction index"))?;
        let log_index = log.log_index.ok_or(LogRowError::Pending("log index"))?;

        Ok(Self {
            address: log.inner.address.into_array(),
            topics: log.inner.data.topics().iter().map(|t| t.0).collect(),
            data: format!("0x{}", hex::encode(&log.inner.data.data)),
            block_number,
            tx_hash: tx_hash.0,
            tx_index,
            log_index,
        })
    }
}

/// Converts a fetched batch into rows, rejecting the whole batch if any log
/// is pending.
pub fn adapt_logs(logs: &[Log]) -> Result<Vec<LogRow>, LogRowError> {
    logs.iter().map(LogRow::try_from).collect()
}
