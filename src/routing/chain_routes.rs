use super::best_route::{RouteQuote, select_best_route};
use super::estimator::SwapEstimator;
use crate::constants::ChainId;
use crate::graph::{MarketsGraph, ReachabilityIndex, SwapRoute, SwapRoutesIndex, find_all_swap_routes};
use crate::markets::ChainMarketsConfig;
use alloy_primitives::{Address, U256};
use std::time::Instant;
use tracing::info;

/// Everything derived from the market listing of one chain. Built in one go and never mutated.
#[derive(Debug)]
pub struct ChainRoutes {
    pub chain_id: ChainId,
    pub max_hops: u8,
    pub markets_graph: MarketsGraph,
    pub reachability: ReachabilityIndex,
    pub swap_routes: SwapRoutesIndex,
}

impl ChainRoutes {
    pub fn build(chain_config: &ChainMarketsConfig, max_hops: u8) -> Self {
        let started_at = Instant::now();

        let markets_graph = if chain_config.tokens.is_empty() {
            MarketsGraph::build(&chain_config.markets)
        } else {
            MarketsGraph::build_with_tokens(&chain_config.tokens, &chain_config.markets)
        };
        let reachability = ReachabilityIndex::compute(&markets_graph, max_hops);
        let swap_routes = find_all_swap_routes(&markets_graph, max_hops);

        info!(
            chain_id = chain_config.chain_id,
            tokens = markets_graph.token_count(),
            pairs = swap_routes.pairs_len(),
            routes = swap_routes.routes_len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Chain routes built"
        );

        Self { chain_id: chain_config.chain_id, max_hops, markets_graph, reachability, swap_routes }
    }

    pub fn is_reachable(&self, from: &Address, to: &Address) -> bool {
        self.reachability.is_reachable(from, to)
    }

    pub fn reachable_tokens(&self, from: &Address) -> Vec<Address> {
        self.reachability.reachable_from(from)
    }

    pub fn get_routes(&self, from: &Address, to: &Address) -> Vec<SwapRoute> {
        self.swap_routes.get_routes(from, to)
    }

    pub fn find_best_route<E>(&self, from: &Address, to: &Address, amount_in: U256, estimator: &E) -> Option<RouteQuote>
    where
        E: SwapEstimator + ?Sized,
    {
        // cheap check before paying for route materialization
        if !self.is_reachable(from, to) {
            return None;
        }
        select_best_route(&self.get_routes(from, to), amount_in, estimator)
    }
}
