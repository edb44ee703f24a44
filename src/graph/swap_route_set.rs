use super::swap_route::{SwapRoute, SwapRouteHash};
use ahash::HashSet;

/// A set of swap routes that makes sure that there are no duplicates.
/// Unlike a plain hash set it keeps the first-insertion order.
#[derive(Default)]
pub struct SwapRouteSet {
    hashes: HashSet<SwapRouteHash>,
    routes: Vec<SwapRoute>,
}

impl SwapRouteSet {
    /// Create a new empty swap route set
    pub fn new() -> SwapRouteSet {
        SwapRouteSet::default()
    }

    /// Insert a swap route, returns false if it was already present
    pub fn insert(&mut self, route: SwapRoute) -> bool {
        if !self.hashes.insert(route.swap_route_hash) {
            return false;
        }
        self.routes.push(route);
        true
    }

    /// Extend from a vector of swap routes
    pub fn extend(&mut self, route_vec: Vec<SwapRoute>) {
        for route in route_vec {
            self.insert(route);
        }
    }

    /// Convert the set to a vector in insertion order
    pub fn vec(self) -> Vec<SwapRoute> {
        self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
