use super::markets_graph::{FastHashMap, MarketsGraph};
use super::swap_route::SwapRoute;
use super::swap_route_set::SwapRouteSet;
use super::swap_routes_index::SwapRoutesIndex;
use crate::constants::SEARCH_ITERATIONS_LIMIT;
use crate::markets::MarketId;
use ahash::HashSet;
use alloy_primitives::Address;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, error, info};

/// State of the search: the current token and the full token sequence taken to reach it.
#[derive(Debug)]
struct SearchState {
    node: NodeIndex<usize>,
    token_path: Vec<NodeIndex<usize>>,
}

/// Intermediate token sequences found per target, in discovery order and without duplicates.
#[derive(Default)]
struct RouteSignatures {
    seen: HashSet<(NodeIndex<usize>, Vec<NodeIndex<usize>>)>,
    by_target: FastHashMap<NodeIndex<usize>, Vec<Vec<NodeIndex<usize>>>>,
}

impl RouteSignatures {
    fn record(&mut self, target: NodeIndex<usize>, intermediate: &[NodeIndex<usize>]) {
        if self.seen.insert((target, intermediate.to_vec())) {
            self.by_target.entry(target).or_default().push(intermediate.to_vec());
        }
    }
}

/// Enumerate the candidate routes of every connected token pair.
///
/// Every unordered pair is handled once, searching from the token with the lower address.
/// The search is a breadth-first walk over token sequences of at most `max_hops` hops. Each
/// distinct sequence of intermediate tokens reaching the target is then expanded into every
/// combination of the parallel markets along it.
///
/// A walk that doubles back (`x -> y -> x`) over a pair served by a single market is dropped,
/// with parallel markets the detour is a distinct route and is kept. A route never uses the same
/// market for two consecutive hops.
pub fn find_all_swap_routes(markets_graph: &MarketsGraph, max_hops: u8) -> SwapRoutesIndex {
    find_all_swap_routes_with_limit(markets_graph, max_hops, SEARCH_ITERATIONS_LIMIT)
}

/// Same as [`find_all_swap_routes`] with an explicit cap on queue pops per source token.
/// A source hitting the cap logs an error and keeps the routes found so far.
pub fn find_all_swap_routes_with_limit(markets_graph: &MarketsGraph, max_hops: u8, iterations_limit: usize) -> SwapRoutesIndex {
    let sources = markets_graph.sorted_nodes();

    // The walk from a source does not depend on the target, one walk serves all its pairs
    let per_source: Vec<Vec<(Address, Address, Vec<SwapRoute>)>> =
        sources.par_iter().map(|source| find_swap_routes_from(markets_graph, *source, max_hops, iterations_limit)).collect();

    let mut index = SwapRoutesIndex::new(max_hops);
    for (from, to, routes) in per_source.into_iter().flatten() {
        index.insert_pair(from, to, routes);
    }

    info!(pairs = index.pairs_len(), routes = index.routes_len(), max_hops, "Swap routes enumerated");
    index
}

/// Routes from `source` to every token with a higher address, ordered by target address.
fn find_swap_routes_from(
    markets_graph: &MarketsGraph,
    source: NodeIndex<usize>,
    max_hops: u8,
    iterations_limit: usize,
) -> Vec<(Address, Address, Vec<SwapRoute>)> {
    let source_address = markets_graph.node_token(source).get_address();
    let signatures = search_route_signatures(markets_graph, source, max_hops, iterations_limit);

    let mut by_target: BTreeMap<Address, Vec<SwapRoute>> = BTreeMap::new();
    for (target, intermediates) in signatures.by_target {
        let mut route_set = SwapRouteSet::new();
        for intermediate in intermediates {
            let mut token_path = Vec::with_capacity(intermediate.len() + 2);
            token_path.push(source);
            token_path.extend(intermediate);
            token_path.push(target);
            route_set.extend(materialize_routes(markets_graph, &token_path));
        }
        if !route_set.is_empty() {
            by_target.insert(markets_graph.node_token(target).get_address(), route_set.vec());
        }
    }

    debug!(source = %source_address, pairs = by_target.len(), "Routes from source enumerated");
    by_target.into_iter().map(|(target, routes)| (source_address, target, routes)).collect()
}

fn search_route_signatures(markets_graph: &MarketsGraph, source: NodeIndex<usize>, max_hops: u8, iterations_limit: usize) -> RouteSignatures {
    let source_address = markets_graph.node_token(source).get_address();
    let max_path_len = max_hops as usize + 1;

    let mut signatures = RouteSignatures::default();
    let mut queue = VecDeque::from([SearchState { node: source, token_path: vec![source] }]);
    let mut searched_path_counter = 0usize;

    while let Some(SearchState { node, token_path }) = queue.pop_front() {
        // This is the upper limit to prevent runaway searches on very dense graphs
        if searched_path_counter > iterations_limit {
            error!(source = %source_address, max_hops, iterations_limit, "Route search too many iterations sanity check failed");
            break;
        }
        searched_path_counter += 1;

        if is_pointless_double_back(markets_graph, &token_path) {
            continue;
        }

        // Only pairs in canonical direction are recorded, the reverse is served by inverting
        if node != source && markets_graph.node_token(node).get_address() > source_address {
            signatures.record(node, &token_path[1..token_path.len() - 1]);
        }

        if token_path.len() >= max_path_len {
            continue;
        }

        for (neighbor, _) in markets_graph.node_neighbors(node) {
            let mut next_path = Vec::with_capacity(token_path.len() + 1);
            next_path.extend_from_slice(&token_path);
            next_path.push(*neighbor);
            queue.push_back(SearchState { node: *neighbor, token_path: next_path });
        }
    }

    signatures
}

/// `x -> y -> x` where the `x/y` pair has a single market only replays that market.
fn is_pointless_double_back(markets_graph: &MarketsGraph, token_path: &[NodeIndex<usize>]) -> bool {
    let [.., third_last, second_last, last] = token_path else {
        return false;
    };
    last == third_last && markets_graph.node_market_count(*last, *second_last) == 1
}

/// Expand a token sequence into every combination of concrete markets along it.
fn materialize_routes(markets_graph: &MarketsGraph, token_path: &[NodeIndex<usize>]) -> Vec<SwapRoute> {
    let mut market_paths: Vec<Vec<MarketId>> = vec![vec![]];

    for step in token_path.windows(2) {
        let Some(edge_index) = markets_graph.graph.find_edge(step[0], step[1]) else {
            return vec![];
        };
        let markets = markets_graph.edge_markets(edge_index);

        let mut next_paths = Vec::with_capacity(market_paths.len() * markets.len());
        for market_path in &market_paths {
            for market in markets {
                if market_path.last() == Some(market) {
                    continue;
                }
                let mut next_path = market_path.clone();
                next_path.push(*market);
                next_paths.push(next_path);
            }
        }
        market_paths = next_paths;
    }

    let tokens: Vec<Arc<_>> = token_path.iter().map(|node| markets_graph.node_token(*node).clone()).collect();
    market_paths.into_iter().filter_map(|markets| SwapRoute::new(tokens.clone(), markets).ok()).collect()
}
