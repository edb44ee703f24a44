pub mod markets_graph;
pub mod reachability;
pub mod route_finder;
pub mod swap_route;
pub mod swap_route_set;
pub mod swap_routes_index;

pub use markets_graph::{FastHashMap, MarketEdge, MarketsGraph, TokenNode};
pub use reachability::ReachabilityIndex;
pub use route_finder::{find_all_swap_routes, find_all_swap_routes_with_limit};
pub use swap_route::{Hop, SwapRoute, SwapRouteHash, generate_swap_route_hash};
pub use swap_route_set::SwapRouteSet;
pub use swap_routes_index::{SwapRoutesIndex, canonical_pair};
