// Swap route discovery over per-chain market listings.
pub mod constants;
pub mod errors;
pub mod graph;
pub mod markets;
pub mod routing;
pub mod token;

// Common utilities
pub mod utils;

pub use constants::{ChainId, ChainIds, MAX_EDGE_PATH_LENGTH};
pub use errors::{EstimationError, MarketConfigError};
pub use graph::{Hop, MarketsGraph, ReachabilityIndex, SwapRoute, SwapRouteHash, SwapRoutesIndex, find_all_swap_routes};
pub use markets::{ChainMarketsConfig, MarketDefinition, MarketId, MarketKind, RouteConfig, RoutingConfigSection};
pub use routing::{ChainRoutes, RouteCache, RouteQuote, SwapEstimator, quote_routes, select_best_route, simulate_route};
pub use token::Token;
pub use utils::{LoadConfigError, RoutingConfigLoader, RoutingConfigLoaderSync};
