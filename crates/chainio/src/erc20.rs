//! Standard ERC-20 event definitions.
//!
//! Used to recognize well-known `topic0` signatures without a block-explorer
//! ABI lookup. The `Deposit`/`Withdrawal` pair covers WETH-style wrappers.

use alloy::sol;

sol! {
    /// Events emitted by ERC-20 tokens and WETH-style wrappers.
    #[allow(missing_docs)]
    #[derive(Debug)]
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
        event Deposit(address indexed dst, uint256 wad);
        event Withdrawal(address indexed src, uint256 wad);
    }
}

#[cfg(test)]
mod tests {
    use super::IERC20;
    use alloy::primitives::b256;
    use alloy_sol_types::SolEvent;

    #[test]
    fn transfer_signature_matches_canonical_hash() {
        assert_eq!(
            IERC20::Transfer::SIGNATURE_HASH,
            b256!("0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }

    #[test]
    fn approval_signature_matches_canonical_hash() {
        assert_eq!(
            IERC20::Approval::SIGNATURE_HASH,
            b256!("0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925")
        );
    }
}
