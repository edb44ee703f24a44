/// Default ceiling on hops per swap route.
pub const MAX_EDGE_PATH_LENGTH: u8 = 3;

/// Upper limit of queue pops per source token while enumerating routes.
pub const SEARCH_ITERATIONS_LIMIT: usize = 500_000;

pub type ChainId = u64;

#[non_exhaustive]
pub struct ChainIds;

impl ChainIds {
    pub const ARBITRUM: ChainId = 42161;
    pub const AVALANCHE: ChainId = 43114;
    pub const ARBITRUM_SEPOLIA: ChainId = 421614;
    pub const AVALANCHE_FUJI: ChainId = 43113;
}
