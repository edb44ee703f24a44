use crate::Token;
use crate::markets::MarketId;
use alloy_primitives::{Address, B256};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sha2::digest::Update;
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One traversal of a single market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Hop {
    pub token_in: Address,
    pub token_out: Address,
    pub market: MarketId,
}

impl Display for Hop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#} -> {:#} via {}", self.token_in, self.token_out, self.market)
    }
}

/// Stable identity of a swap route, sha256 over its token and market ids.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapRouteHash(pub B256);

impl Display for SwapRouteHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for SwapRouteHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SwapRouteHash({})", self.0)
    }
}

#[derive(Clone, Debug, Default, Eq, Serialize)]
pub struct SwapRoute {
    // hash of the route, used as identity and for deduplication
    pub swap_route_hash: SwapRouteHash,
    // The tokens of the route e.g. token0 -> token1 -> token2
    pub tokens: Vec<Arc<Token>>,
    // The markets of the route e.g. market0 -> market1
    pub markets: Vec<MarketId>,
}

impl Display for SwapRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SwapRoute(markets={:?}, tokens={:?})",
            self.markets.iter().map(|m| m.to_string()).collect::<Vec<String>>(),
            self.tokens.iter().map(|t| t.get_symbol()).collect::<Vec<String>>()
        )
    }
}

impl SwapRoute {
    /// Create a new swap route for a list of tokens and markets.
    /// There must be exactly one token more than markets, and at least one market.
    pub fn new<T: Into<Arc<Token>>, M: Into<MarketId>>(tokens: Vec<T>, markets: Vec<M>) -> Result<Self> {
        let tokens: Vec<Arc<Token>> = tokens.into_iter().map(|t| t.into()).collect();
        let markets: Vec<MarketId> = markets.into_iter().map(|m| m.into()).collect();

        if markets.is_empty() {
            return Err(eyre!("Swap route needs at least one market"));
        }
        if tokens.len() != markets.len() + 1 {
            return Err(eyre!("Swap route token count {} does not match market count {}", tokens.len(), markets.len()));
        }
        let swap_route_hash = generate_swap_route_hash(&tokens, &markets);

        Ok(SwapRoute { swap_route_hash, tokens, markets })
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// The hop count of the swap route
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn tokens_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token_in(&self) -> Option<&Arc<Token>> {
        self.tokens.first()
    }

    pub fn token_out(&self) -> Option<&Arc<Token>> {
        self.tokens.last()
    }

    /// Tokens strictly between the input and the output token
    pub fn intermediate_tokens(&self) -> &[Arc<Token>] {
        if self.tokens.len() < 2 { &[] } else { &self.tokens[1..self.tokens.len() - 1] }
    }

    /// Invert the swap route. The same markets are traversed backwards.
    pub fn invert(&self) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.reverse();
        let mut markets = self.markets.clone();
        markets.reverse();
        let swap_route_hash = generate_swap_route_hash(&tokens, &markets);

        SwapRoute { swap_route_hash, tokens, markets }
    }

    pub fn contains_market(&self, market: &MarketId) -> bool {
        self.markets.contains(market)
    }

    /// Hops in trading order
    pub fn hops(&self) -> impl Iterator<Item = Hop> + '_ {
        self.markets.iter().enumerate().map(|(idx, market)| Hop {
            token_in: self.tokens[idx].get_address(),
            token_out: self.tokens[idx + 1].get_address(),
            market: *market,
        })
    }
}

impl Hash for SwapRoute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.hash(state);
        self.markets.hash(state);
    }
}

impl PartialEq for SwapRoute {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens && self.markets == other.markets
    }
}

/// Hash all the ids of the tokens and markets in the route to a sha256 hash.
/// The hash is stable across runs and platforms.
pub fn generate_swap_route_hash(tokens: &[Arc<Token>], markets: &[MarketId]) -> SwapRouteHash {
    let mut hasher = Sha256::new();

    for token in tokens.iter() {
        Update::update(&mut hasher, token.get_address().as_slice());
    }
    for market in markets.iter() {
        Update::update(&mut hasher, market.as_slice());
    }

    SwapRouteHash(B256::from_slice(&hasher.finalize()))
}
