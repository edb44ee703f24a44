/// Trade-time routing on top of the precomputed per-chain graphs:
/// the estimator seam, best route selection and the per-chain cache.
pub mod best_route;
pub mod chain_routes;
pub mod estimator;
pub mod route_cache;

#[cfg(test)]
mod tests;

pub use best_route::{RouteQuote, quote_routes, select_best_route, simulate_route};
pub use chain_routes::ChainRoutes;
pub use estimator::SwapEstimator;
pub use route_cache::RouteCache;
