use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use strum_macros::{Display, EnumIter, EnumString, VariantNames};

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketId {
    Address(Address),
    B256(B256),
}

impl Display for MarketId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketId::Address(address) => write!(f, "{address}"),
            MarketId::B256(hash) => write!(f, "{hash}"),
        }
    }
}

impl Debug for MarketId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MarketId({self})")
    }
}

impl From<Address> for MarketId {
    fn from(address: Address) -> Self {
        MarketId::Address(address)
    }
}

impl From<B256> for MarketId {
    fn from(hash: B256) -> Self {
        MarketId::B256(hash)
    }
}

impl MarketId {
    /// Raw bytes used for route hashing.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            MarketId::Address(address) => address.as_slice(),
            MarketId::B256(hash) => hash.as_slice(),
        }
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Hash, Eq, EnumString, VariantNames, Default, Deserialize, Serialize, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketKind {
    #[default]
    Perpetual,
    Spot,
}

/// A listed market as it comes from the chain configuration.
/// Swaps go between the long and the short side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDefinition {
    pub id: MarketId,
    #[serde(default)]
    pub index_token: Option<Address>,
    pub long_token: Address,
    pub short_token: Address,
    #[serde(default)]
    pub kind: MarketKind,
    #[serde(default)]
    pub is_same_collaterals: bool,
    #[serde(default)]
    pub is_disabled: bool,
}

impl MarketDefinition {
    pub fn new<I: Into<MarketId>>(id: I, long_token: Address, short_token: Address) -> Self {
        Self {
            id: id.into(),
            index_token: None,
            long_token,
            short_token,
            kind: MarketKind::Perpetual,
            is_same_collaterals: false,
            is_disabled: false,
        }
    }

    pub fn spot<I: Into<MarketId>>(id: I, long_token: Address, short_token: Address) -> Self {
        Self { kind: MarketKind::Spot, ..Self::new(id, long_token, short_token) }
    }

    pub fn with_index_token(self, index_token: Address) -> Self {
        Self { index_token: Some(index_token), ..self }
    }

    pub fn disabled(self) -> Self {
        Self { is_disabled: true, ..self }
    }

    /// Both collateral sides are the same token, either flagged or inferred.
    pub fn is_same_collateral(&self) -> bool {
        self.is_same_collaterals || self.long_token == self.short_token
    }

    /// The two tokens this market swaps between, or `None` when it cannot serve as a swap edge.
    pub fn swap_sides(&self) -> Option<(Address, Address)> {
        if self.is_disabled || self.is_same_collateral() {
            return None;
        }
        Some((self.long_token, self.short_token))
    }
}
