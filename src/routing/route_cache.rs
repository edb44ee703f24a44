use super::best_route::RouteQuote;
use super::chain_routes::ChainRoutes;
use super::estimator::SwapEstimator;
use crate::constants::ChainId;
use crate::graph::SwapRoute;
use crate::markets::{ChainMarketsConfig, RouteConfig, RoutingConfigSection};
use crate::utils::LoadConfigError;
use alloy_primitives::{Address, U256};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, warn};

/*
   Per-chain route data shared by every trade quote.
   An entry is only ever replaced as a whole: a rebuild computes a complete new ChainRoutes and
   publishes it with a single insert. Readers take an Arc clone and keep using the entry they got,
   they never observe a half built graph. Unknown chains behave like chains without markets.
*/
#[derive(Debug, Default)]
pub struct RouteCache {
    routing_config: RoutingConfigSection,
    chains: DashMap<ChainId, Arc<ChainRoutes>>,
}

impl RouteCache {
    pub fn new(routing_config: RoutingConfigSection) -> Result<Self, LoadConfigError> {
        routing_config.validate()?;
        Ok(Self { routing_config, chains: DashMap::new() })
    }

    /// Create the cache and build every configured chain
    pub fn from_config(config: &RouteConfig) -> Result<Self, LoadConfigError> {
        config.validate()?;
        let cache = Self::new(config.routing.clone())?;
        for chain_config in &config.chains {
            cache.rebuild(chain_config);
        }
        Ok(cache)
    }

    pub fn max_hops(&self) -> u8 {
        self.routing_config.max_hops
    }

    /// Build the chain's routes from its market listing and atomically replace the previous entry.
    pub fn rebuild(&self, chain_config: &ChainMarketsConfig) -> Arc<ChainRoutes> {
        let chain_routes = Arc::new(ChainRoutes::build(chain_config, self.routing_config.max_hops));
        if self.chains.insert(chain_config.chain_id, chain_routes.clone()).is_some() {
            info!(chain_id = chain_config.chain_id, "Replaced chain routes");
        }
        chain_routes
    }

    pub fn remove(&self, chain_id: ChainId) -> Option<Arc<ChainRoutes>> {
        self.chains.remove(&chain_id).map(|(_, chain_routes)| chain_routes)
    }

    pub fn get(&self, chain_id: ChainId) -> Option<Arc<ChainRoutes>> {
        self.chains.get(&chain_id).map(|entry| entry.value().clone())
    }

    pub fn contains_chain(&self, chain_id: ChainId) -> bool {
        self.chains.contains_key(&chain_id)
    }

    pub fn chain_ids(&self) -> Vec<ChainId> {
        let mut chain_ids: Vec<ChainId> = self.chains.iter().map(|entry| *entry.key()).collect();
        chain_ids.sort_unstable();
        chain_ids
    }

    fn get_or_warn(&self, chain_id: ChainId) -> Option<Arc<ChainRoutes>> {
        let chain_routes = self.get(chain_id);
        if chain_routes.is_none() {
            warn!(chain_id, "No routes built for chain");
        }
        chain_routes
    }

    pub fn is_reachable(&self, chain_id: ChainId, from: &Address, to: &Address) -> bool {
        self.get_or_warn(chain_id).map(|chain_routes| chain_routes.is_reachable(from, to)).unwrap_or(false)
    }

    pub fn reachable_tokens(&self, chain_id: ChainId, from: &Address) -> Vec<Address> {
        self.get_or_warn(chain_id).map(|chain_routes| chain_routes.reachable_tokens(from)).unwrap_or_default()
    }

    pub fn get_routes(&self, chain_id: ChainId, from: &Address, to: &Address) -> Vec<SwapRoute> {
        self.get_or_warn(chain_id).map(|chain_routes| chain_routes.get_routes(from, to)).unwrap_or_default()
    }

    pub fn find_best_route<E>(&self, chain_id: ChainId, from: &Address, to: &Address, amount_in: U256, estimator: &E) -> Option<RouteQuote>
    where
        E: SwapEstimator + ?Sized,
    {
        self.get_or_warn(chain_id)?.find_best_route(from, to, amount_in, estimator)
    }
}
