use super::markets_graph::{FastHashMap, MarketsGraph};
use alloy_primitives::Address;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

/// For every token the set of tokens reachable within the hop bound.
/// Ignores which markets provide each edge, it answers only whether a swap is possible at all.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityIndex {
    max_hops: u8,
    reachable: FastHashMap<Address, BTreeSet<Address>>,
}

impl ReachabilityIndex {
    pub fn compute(markets_graph: &MarketsGraph, max_hops: u8) -> Self {
        let mut reachable = FastHashMap::default();

        for node in markets_graph.graph.node_indices() {
            let start = markets_graph.node_token(node).get_address();
            reachable.insert(start, reachable_from_node(markets_graph, node, max_hops));
        }

        debug!(tokens = reachable.len(), max_hops, "Reachability index computed");
        Self { max_hops, reachable }
    }

    pub fn max_hops(&self) -> u8 {
        self.max_hops
    }

    /// True if `to` can be reached from `from` within the hop bound. Never true for a token and itself.
    pub fn is_reachable(&self, from: &Address, to: &Address) -> bool {
        self.reachable.get(from).map(|tokens| tokens.contains(to)).unwrap_or(false)
    }

    /// Reachable tokens ordered by address, empty for unknown or isolated tokens
    pub fn reachable_from(&self, from: &Address) -> Vec<Address> {
        self.reachable.get(from).map(|tokens| tokens.iter().copied().collect()).unwrap_or_default()
    }

    pub fn get(&self, from: &Address) -> Option<&BTreeSet<Address>> {
        self.reachable.get(from)
    }

    pub fn len(&self) -> usize {
        self.reachable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reachable.is_empty()
    }
}

fn reachable_from_node(markets_graph: &MarketsGraph, start: NodeIndex<usize>, max_hops: u8) -> BTreeSet<Address> {
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([(start, 0u8)]);

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= max_hops {
            continue;
        }
        for (neighbor, _) in markets_graph.node_neighbors(node) {
            if visited.insert(*neighbor) {
                queue.push_back((*neighbor, depth + 1));
            }
        }
    }

    visited.remove(&start);
    visited.into_iter().map(|node| markets_graph.node_token(node).get_address()).collect()
}
