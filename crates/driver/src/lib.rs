//! Logscope driver: resumable backfill of one contract's event logs.
//!
//! Ties the fetcher, the storage layer and the explorer client together.
//! The driver resolves where a backfill should (re)start, then alternates
//! fetch and insert until the chain has nothing more to serve or shutdown is
//! requested.

use alloy::{primitives::Address, providers::Provider};
use chainio::DefaultProvider;
use config::Opts;
use explorer::ExplorerClient;
use extractor::LogFetcher;
use eyre::{Context, Result, eyre};
use primitives::hex::parse_address;
use runtime::ShutdownToken;
use storage::{ClickhouseReader, ClickhouseWriter, adapt_logs};
use tracing::info;

/// Backfill driver, generic over the provider so tests can mock the chain.
#[derive(Debug)]
pub struct Driver<P> {
    provider: P,
    fetcher: LogFetcher<P>,
    writer: ClickhouseWriter,
    reader: ClickhouseReader,
    explorer: ExplorerClient,
}

impl Driver<DefaultProvider> {
    /// Create a new driver from CLI options and run the schema migrations.
    pub async fn new(opts: Opts) -> Result<Self> {
        info!("Initializing driver");

        let provider = chainio::connect_http(opts.rpc.url);
        let writer = ClickhouseWriter::new(
            opts.clickhouse.url.clone(),
            opts.clickhouse.db.clone(),
            opts.clickhouse.username.clone(),
            opts.clickhouse.password.clone(),
        );
        let reader = ClickhouseReader::new(
            opts.clickhouse.url,
            opts.clickhouse.db,
            opts.clickhouse.username,
            opts.clickhouse.password,
        );
        let explorer = ExplorerClient::new(opts.explorer.api_url, opts.explorer.api_key);

        writer.init_db(opts.reset_db).await.wrap_err("failed to initialize database")?;

        Ok(Self::from_parts(provider, writer, reader, explorer))
    }
}

impl<P: Provider + Clone> Driver<P> {
    /// Assemble a driver from already-built parts. Runs no migrations.
    pub fn from_parts(
        provider: P,
        writer: ClickhouseWriter,
        reader: ClickhouseReader,
        explorer: ExplorerClient,
    ) -> Self {
        let fetcher = LogFetcher::new(provider.clone());
        Self { provider, fetcher, writer, reader, explorer }
    }

    /// The block a backfill of `address` should start from.
    ///
    /// Picks up right after the highest persisted log when there is one.
    /// Otherwise asks the explorer for the creation transaction and starts at
    /// the block containing it. Both lookups observe the shutdown token.
    pub async fn resume_point(&self, address: Address, shutdown: &ShutdownToken) -> Result<u64> {
        if let Some(progress) = self.reader.max_progress(address).await? {
            info!(
                %address,
                block_number = progress.block_number,
                log_index = progress.log_index,
                "Resuming from persisted progress"
            );
            return Ok(progress.block_number + 1);
        }

        if shutdown.is_cancelled() {
            return Err(eyre!("resume lookup cancelled for {address}"));
        }
        let creation = tokio::select! {
            res = self.explorer.contract_creation(address) => {
                res.wrap_err_with(|| format!("failed to look up creation of {address}"))?
            }
            () = shutdown.cancelled() => {
                return Err(eyre!("resume lookup cancelled for {address}"));
            }
        };
        let receipt = tokio::select! {
            res = self.provider.get_transaction_receipt(creation.tx_hash) => res?,
            () = shutdown.cancelled() => {
                return Err(eyre!("resume lookup cancelled for {address}"));
            }
        }
        .ok_or_else(|| eyre!("no receipt for creation tx {}", creation.tx_hash))?;
        let block_number = receipt
            .block_number
            .ok_or_else(|| eyre!("creation tx {} is not mined", creation.tx_hash))?;

        info!(%address, block_number, "Starting from contract creation");
        Ok(block_number)
    }

    /// Backfill all logs of `contract` up to the chain head.
    ///
    /// The address is validated before any network or database work. Every
    /// fetched batch is persisted before the cursor advances, so a crash or
    /// shutdown between passes never loses acknowledged progress.
    pub async fn backfill(&self, contract: &str, shutdown: &ShutdownToken) -> Result<()> {
        let address = parse_address(contract)
            .wrap_err_with(|| format!("invalid contract address {contract:?}"))?;

        let mut from_block = self.resume_point(address, shutdown).await?;
        info!(%address, from_block, "Starting backfill");

        loop {
            let outcome = self.fetcher.fetch(from_block, address, shutdown).await?;

            let rows = adapt_logs(&outcome.logs)?;
            self.writer.insert_logs(&rows).await.wrap_err("failed to insert logs")?;

            if outcome.logs.is_empty() {
                info!(%address, from_block, "Backfill caught up with chain head");
                return Ok(());
            }

            info!(
                %address,
                from_block,
                next_from_block = outcome.next_from_block,
                count = rows.len(),
                "Persisted log batch"
            );
            from_block = outcome.next_from_block;
        }
    }
}

#[cfg(test)]
mod tests;
