use crate::Token;
use crate::errors::MarketConfigError;
use crate::markets::{MarketDefinition, MarketId};
use ahash::RandomState;
use alloy_primitives::Address;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type FastHasher = RandomState;
/// FastHashMap using ahash
pub type FastHashMap<K, V> = HashMap<K, V, FastHasher>;

/// Token adjacency of all swappable markets on one chain.
///
/// Nodes are tokens, an undirected edge between two tokens holds every market connecting them.
/// Each node additionally keeps its neighbors sorted by token address so traversals are
/// deterministic regardless of the listing order of the markets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketsGraph {
    pub graph: UnGraph<TokenNode, MarketEdge, usize>,
    // token_address -> token (Keep reference for fast access of token details)
    pub tokens: FastHashMap<Address, Arc<Token>>,
    // token -> node index
    pub token_index: FastHashMap<Address, NodeIndex<usize>>,
    // market -> edge index
    pub market_index: FastHashMap<MarketId, EdgeIndex<usize>>,
    // node index -> (neighbor, edge) sorted by neighbor address
    adjacency: Vec<Vec<(NodeIndex<usize>, EdgeIndex<usize>)>>,
}

impl MarketsGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a chain's listed markets. Tokens are registered as markets reference them.
    pub fn build(markets: &[MarketDefinition]) -> Self {
        let mut markets_graph = MarketsGraph::new();
        markets_graph.add_markets(markets, false);
        markets_graph
    }

    /// Build the graph from a token registry and the listed markets.
    /// Registered tokens without markets become isolated nodes,
    /// markets referencing tokens outside the registry are skipped.
    pub fn build_with_tokens(tokens: &[Token], markets: &[MarketDefinition]) -> Self {
        let mut markets_graph = MarketsGraph::new();
        for token in tokens {
            markets_graph.add_or_get_token_idx_by_token(Arc::new(token.clone()));
        }
        markets_graph.add_markets(markets, true);
        markets_graph
    }

    fn add_markets(&mut self, markets: &[MarketDefinition], require_known_tokens: bool) {
        let mut skipped = 0usize;
        for market in markets {
            match self.insert_market(market, require_known_tokens) {
                Ok(true) => {}
                Ok(false) => skipped += 1,
                Err(e) => {
                    warn!(error = %e, "Skipping misconfigured market");
                    skipped += 1;
                }
            }
        }
        info!(
            tokens = self.token_count(),
            edges = self.edge_count(),
            markets = self.market_count(),
            skipped,
            "Markets graph built"
        );
    }

    /// Add a market as an edge, registering unknown tokens on the way.
    /// Returns `Ok(false)` when the market cannot be a swap edge or is already present.
    pub fn add_market(&mut self, market: &MarketDefinition) -> Result<bool, MarketConfigError> {
        self.insert_market(market, false)
    }

    /// Add a market as an edge, both tokens must already be registered.
    pub fn add_listed_market(&mut self, market: &MarketDefinition) -> Result<bool, MarketConfigError> {
        self.insert_market(market, true)
    }

    fn insert_market(&mut self, market: &MarketDefinition, require_known_tokens: bool) -> Result<bool, MarketConfigError> {
        let Some((token_a, token_b)) = market.swap_sides() else {
            debug!(market = %market.id, disabled = market.is_disabled, "Market is not a swap edge");
            return Ok(false);
        };

        if let Some(edge_index) = self.market_index.get(&market.id) {
            let (existing_a, existing_b) = self.edge_tokens(*edge_index);
            if (existing_a, existing_b) == (token_a, token_b) || (existing_a, existing_b) == (token_b, token_a) {
                return Ok(false);
            }
            return Err(MarketConfigError::ConflictingMarketId { market: market.id, existing_a, existing_b, token_a, token_b });
        }

        if require_known_tokens {
            for token in [token_a, token_b] {
                if !self.token_index.contains_key(&token) {
                    return Err(MarketConfigError::UnknownToken { market: market.id, token });
                }
            }
        }

        let node_a = self.add_or_get_token_idx_by_address(token_a);
        let node_b = self.add_or_get_token_idx_by_address(token_b);

        let edge_index = match self.graph.find_edge(node_a, node_b) {
            Some(edge_index) => {
                if let Some(edge) = self.graph.edge_weight_mut(edge_index) {
                    edge.markets.push(market.id);
                }
                edge_index
            }
            None => {
                let edge_index = self.graph.add_edge(node_a, node_b, MarketEdge::new(market.id));
                self.link_neighbors(node_a, node_b, edge_index);
                self.link_neighbors(node_b, node_a, edge_index);
                edge_index
            }
        };
        self.market_index.insert(market.id, edge_index);

        Ok(true)
    }

    fn link_neighbors(&mut self, node: NodeIndex<usize>, neighbor: NodeIndex<usize>, edge_index: EdgeIndex<usize>) {
        let neighbor_address = self.graph[neighbor].token.get_address();
        let graph = &self.graph;
        let neighbors = &mut self.adjacency[node.index()];
        let position = neighbors.partition_point(|(other, _)| graph[*other].token.get_address() < neighbor_address);
        neighbors.insert(position, (neighbor, edge_index));
    }

    fn edge_tokens(&self, edge_index: EdgeIndex<usize>) -> (Address, Address) {
        match self.graph.edge_endpoints(edge_index) {
            Some((a, b)) => (self.graph[a].token.get_address(), self.graph[b].token.get_address()),
            None => (Address::ZERO, Address::ZERO),
        }
    }

    pub fn add_or_get_token_idx_by_token(&mut self, arc_token: Arc<Token>) -> NodeIndex<usize> {
        if let Some(&idx) = self.token_index.get(&arc_token.get_address()) {
            return idx;
        }
        let address = arc_token.get_address();
        let idx = self.graph.add_node(TokenNode::new(arc_token.clone()));
        self.adjacency.push(vec![]);
        self.token_index.insert(address, idx);
        self.tokens.insert(address, arc_token);
        idx
    }

    pub(crate) fn add_or_get_token_idx_by_address(&mut self, address: Address) -> NodeIndex<usize> {
        if let Some(&idx) = self.token_index.get(&address) {
            return idx;
        }
        self.add_or_get_token_idx_by_token(Arc::new(Token::new(address)))
    }

    pub fn token_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of connected token pairs
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn market_count(&self) -> usize {
        self.market_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_token(&self, address: &Address) -> bool {
        self.token_index.contains_key(address)
    }

    pub fn get_token(&self, address: &Address) -> Option<&Arc<Token>> {
        self.tokens.get(address)
    }

    pub fn node_token(&self, node: NodeIndex<usize>) -> &Arc<Token> {
        &self.graph[node].token
    }

    /// All token nodes ordered by token address
    pub fn sorted_nodes(&self) -> Vec<NodeIndex<usize>> {
        let mut nodes: Vec<NodeIndex<usize>> = self.graph.node_indices().collect();
        nodes.sort_by_key(|node| self.graph[*node].token.get_address());
        nodes
    }

    /// Neighbors of a node with the edge connecting them, ordered by neighbor address
    pub fn node_neighbors(&self, node: NodeIndex<usize>) -> &[(NodeIndex<usize>, EdgeIndex<usize>)] {
        self.adjacency.get(node.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_markets(&self, edge_index: EdgeIndex<usize>) -> &[MarketId] {
        self.graph.edge_weight(edge_index).map(|edge| edge.markets.as_slice()).unwrap_or(&[])
    }

    /// Number of markets serving the pair, zero if the tokens are not directly connected
    pub fn node_market_count(&self, a: NodeIndex<usize>, b: NodeIndex<usize>) -> usize {
        self.graph.find_edge(a, b).map(|edge_index| self.edge_markets(edge_index).len()).unwrap_or(0)
    }

    /// Markets directly connecting two tokens in listing order
    pub fn markets_between(&self, a: &Address, b: &Address) -> &[MarketId] {
        let (Some(node_a), Some(node_b)) = (self.token_index.get(a), self.token_index.get(b)) else {
            return &[];
        };
        match self.graph.find_edge(*node_a, *node_b) {
            Some(edge_index) => self.edge_markets(edge_index),
            None => &[],
        }
    }

    /// Tokens directly connected to the given token, ordered by address
    pub fn neighbors(&self, address: &Address) -> Vec<Address> {
        let Some(node) = self.token_index.get(address) else {
            return vec![];
        };
        self.node_neighbors(*node).iter().map(|(neighbor, _)| self.graph[*neighbor].token.get_address()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenNode {
    pub token: Arc<Token>,
}

impl Display for TokenNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.token.get_address())
    }
}

impl TokenNode {
    pub fn new(token: Arc<Token>) -> Self {
        Self { token }
    }
}

/// Parallel markets between two tokens, in listing order and without duplicates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketEdge {
    pub markets: Vec<MarketId>,
}

impl Display for MarketEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.markets.iter().map(|m| m.to_string()).collect::<Vec<String>>())
    }
}

impl MarketEdge {
    pub fn new(market: MarketId) -> Self {
        Self { markets: vec![market] }
    }
}
