//! `ClickHouse` reader: resume cursor and log queries.

use alloy::primitives::{Address, B256};
use clickhouse::{Client, sql::Identifier};
use derive_more::Debug;
use eyre::Result;
use url::Url;

use crate::models::{LogRow, ProgressRow};

/// `ClickHouse` reader client.
#[derive(Clone, Debug)]
pub struct ClickhouseReader {
    /// Base client
    #[debug(skip)]
    base: Client,
    /// Database name
    db_name: String,
}

impl ClickhouseReader {
    /// Create a new `ClickHouse` reader client.
    pub fn new(url: Url, db_name: String, username: String, password: String) -> Self {
        let client = Client::default()
            .with_url(url)
            .with_database(db_name.clone())
            .with_user(username)
            .with_password(password);

        Self { base: client, db_name }
    }

    /// The highest persisted `(block_number, log_index)` for a contract, or
    /// `None` if nothing was persisted yet.
    pub async fn max_progress(&self, address: Address) -> Result<Option<ProgressRow>> {
        let sql = "SELECT block_number, log_index FROM ?.logs \
                   WHERE address = unhex(?) \
                   ORDER BY block_number DESC, log_index DESC \
                   LIMIT 1";
        let row = self
            .base
            .query(sql)
            .bind(Identifier(&self.db_name))
            .bind(hex::encode(address))
            .fetch_optional::<ProgressRow>()
            .await?;
        Ok(row)
    }

    /// Persisted logs for a contract, newest first, optionally filtered by
    /// event signature (`topic0`).
    ///
    /// `page_size == 0` disables pagination and returns everything; otherwise
    /// `page` selects a zero-based page of `page_size` rows.
    pub async fn select_logs(
        &self,
        address: Address,
        topic0: Option<B256>,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<LogRow>> {
        let mut sql = String::from(
            "SELECT address, topics, data, block_number, tx_hash, tx_index, log_index \
             FROM ?.logs WHERE address = unhex(?)",
        );
        if topic0.is_some() {
            sql.push_str(" AND topics[1] = unhex(?)");
        }
        sql.push_str(" ORDER BY block_number DESC, log_index DESC");
        if page_size > 0 {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        let mut query =
            self.base.query(&sql).bind(Identifier(&self.db_name)).bind(hex::encode(address));
        if let Some(topic) = topic0 {
            query = query.bind(hex::encode(topic));
        }
        if page_size > 0 {
            query = query.bind(page_size).bind(page * page_size);
        }

        let rows = query.fetch_all::<LogRow>().await?;
        Ok(rows)
    }
}
