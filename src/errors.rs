use crate::markets::MarketId;
use alloy_primitives::{Address, U256};

/// A market definition that cannot be turned into a graph edge.
/// These are logged and the market is skipped, graph construction carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketConfigError {
    #[error("market {market} references unknown token {token}")]
    UnknownToken { market: MarketId, token: Address },
    #[error("market {market} is already listed for {existing_a}/{existing_b}, refusing {token_a}/{token_b}")]
    ConflictingMarketId { market: MarketId, existing_a: Address, existing_b: Address, token_a: Address, token_b: Address },
}

/// A per-hop failure of the injected swap estimator. Disqualifies one route for one trade size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimationError {
    #[error("insufficient liquidity in {market} for {amount_in}")]
    InsufficientLiquidity { market: MarketId, amount_in: U256 },
    #[error("market {0} is disabled")]
    MarketDisabled(MarketId),
    #[error("no pricing data for market {0}")]
    UnknownMarket(MarketId),
    #[error("{0}")]
    Other(String),
}
