//! Logscope configuration
use clap::Parser;
use url::Url;

/// Clickhouse database configuration options
#[derive(Debug, Clone, Parser)]
pub struct ClickhouseOpts {
    /// Clickhouse URL
    #[clap(long, env = "CLICKHOUSE_URL")]
    pub url: Url,
    /// Clickhouse database
    #[clap(long, env = "CLICKHOUSE_DB")]
    pub db: String,
    /// Clickhouse username
    #[clap(long, env = "CLICKHOUSE_USERNAME")]
    pub username: String,
    /// Clickhouse password
    #[clap(long, env = "CLICKHOUSE_PASSWORD")]
    pub password: String,
}

/// RPC endpoint configuration options
#[derive(Debug, Clone, Parser)]
pub struct RpcOpts {
    /// Execution layer JSON-RPC URL
    #[clap(long, env = "RPC_URL")]
    pub url: Url,
}

/// Block-explorer API configuration options
#[derive(Debug, Clone, Parser)]
pub struct ExplorerOpts {
    /// Explorer API key
    #[clap(long, env = "ETHERSCAN_API_KEY")]
    pub api_key: String,
    /// Explorer API URL
    #[clap(long, env = "ETHERSCAN_API_URL", default_value = "https://api.etherscan.io/api")]
    pub api_url: String,
}

/// CLI options for logscope
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Clickhouse database configuration
    #[clap(flatten)]
    pub clickhouse: ClickhouseOpts,

    /// RPC endpoint configuration
    #[clap(flatten)]
    pub rpc: RpcOpts,

    /// Block-explorer API configuration
    #[clap(flatten)]
    pub explorer: ExplorerOpts,

    /// Contract whose logs to backfill. Validated before any network or
    /// database work starts.
    #[clap(long, env = "CONTRACT_ADDRESS")]
    pub contract: String,

    /// If set, drop & re-create all tables (local/dev only)
    #[clap(long)]
    pub reset_db: bool,
}
