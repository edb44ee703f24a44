pub mod market;
pub mod market_config;

pub use market::{MarketDefinition, MarketId, MarketKind};
pub use market_config::{ChainMarketsConfig, RouteConfig, RoutingConfigSection};
