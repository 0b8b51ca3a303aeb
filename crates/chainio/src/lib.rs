//! Chain I/O for logscope: provider construction, transport-boundary error
//! decoding and standard contract event definitions.

pub mod classify;
pub mod erc20;

use alloy::providers::{
    ProviderBuilder, RootProvider, fillers::FillProvider, utils::JoinedRecommendedFillers,
};
use url::Url;

/// Alias to the default provider with all recommended fillers (read-only).
pub type DefaultProvider = FillProvider<JoinedRecommendedFillers, RootProvider>;

/// Connects a read-only provider to an HTTP JSON-RPC endpoint.
pub fn connect_http(url: Url) -> DefaultProvider {
    ProviderBuilder::new().connect_http(url)
}
