//! Decoding of provider-limit errors at the transport boundary.
//!
//! Some providers cap the result size of an `eth_getLogs` call and reject
//! oversized windows with a structured error whose `data` names the highest
//! block the request may cover. That error is decoded here, once, into a
//! tagged variant; consumers never inspect raw error payloads themselves.

use alloy::transports::{RpcError, TransportError};
use alloy_json_rpc::ErrorPayload;

/// JSON-RPC error code for "limit exceeded".
///
/// See <https://github.com/ethereum/EIPs/blob/master/EIPS/eip-1474.md>.
pub const CODE_LIMIT_EXCEEDED: i64 = -32005;

/// A failed RPC call, classified at the transport boundary.
#[derive(Debug)]
pub enum RpcFailure {
    /// The provider capped the response and suggested the highest block the
    /// request may cover instead.
    LimitExceeded {
        /// Provider-suggested upper block bound for a retry.
        bound: u64,
    },
    /// Any other failure. Not recoverable via re-targeting; callers fall back
    /// to their own narrowing strategy or give up.
    Other(TransportError),
}

/// Classifies a failed RPC call, extracting the provider-suggested block
/// bound when present.
pub fn classify(err: TransportError) -> RpcFailure {
    if let RpcError::ErrorResp(payload) = &err {
        if let Some(bound) = limit_bound(payload) {
            return RpcFailure::LimitExceeded { bound };
        }
    }
    RpcFailure::Other(err)
}

/// Extracts the suggested upper block bound from a limit-exceeded error
/// payload.
///
/// Requires the limit-exceeded status code, structured auxiliary data with a
/// `to` field, and that field to be a hex-encoded (optionally `0x`-prefixed)
/// integer. Anything else yields `None`.
pub fn limit_bound(payload: &ErrorPayload) -> Option<u64> {
    if payload.code != CODE_LIMIT_EXCEEDED {
        return None;
    }
    let data = payload.try_data_as::<serde_json::Value>()?.ok()?;
    let bound = data.get("to")?.as_str()?;
    let bound = bound.strip_prefix("0x").unwrap_or(bound);
    u64::from_str_radix(bound, 16).ok()
}
