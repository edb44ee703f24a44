use super::swap_route::SwapRoute;
use alloy_primitives::Address;
use std::collections::{BTreeMap, BTreeSet};

/*
   Candidate routes for every connected token pair of a chain.
   Each unordered pair is stored once, under its canonical direction: from the token with the
   lower address to the token with the higher address. Lookups in the other direction return the
   same routes inverted. The index is immutable after it has been built.
*/
#[derive(Clone, Debug, Default)]
pub struct SwapRoutesIndex {
    max_hops: u8,
    routes: BTreeMap<Address, BTreeMap<Address, Vec<SwapRoute>>>,
}

/// Order a pair canonically, lower address first
pub fn canonical_pair(a: Address, b: Address) -> (Address, Address) {
    if a <= b { (a, b) } else { (b, a) }
}

impl SwapRoutesIndex {
    pub fn new(max_hops: u8) -> Self {
        Self { max_hops, routes: BTreeMap::new() }
    }

    pub(crate) fn insert_pair(&mut self, from: Address, to: Address, routes: Vec<SwapRoute>) {
        debug_assert!(from < to, "routes must be stored in canonical direction");
        if routes.is_empty() {
            return;
        }
        self.routes.entry(from).or_default().insert(to, routes);
    }

    pub fn max_hops(&self) -> u8 {
        self.max_hops
    }

    /// Routes from `from` to `to`, in enumeration order. Empty for a token and itself.
    pub fn get_routes(&self, from: &Address, to: &Address) -> Vec<SwapRoute> {
        if from == to {
            return vec![];
        }
        let (canonical_from, canonical_to) = canonical_pair(*from, *to);
        let Some(stored) = self.get_canonical_routes(&canonical_from, &canonical_to) else {
            return vec![];
        };
        if canonical_from == *from { stored.to_vec() } else { stored.iter().map(SwapRoute::invert).collect() }
    }

    /// Routes stored for a canonical pair without inverting, `from` must be the lower address
    pub fn get_canonical_routes(&self, from: &Address, to: &Address) -> Option<&[SwapRoute]> {
        self.routes.get(from).and_then(|inner| inner.get(to)).map(Vec::as_slice)
    }

    pub fn has_routes(&self, from: &Address, to: &Address) -> bool {
        if from == to {
            return false;
        }
        let (canonical_from, canonical_to) = canonical_pair(*from, *to);
        self.get_canonical_routes(&canonical_from, &canonical_to).is_some()
    }

    /// Tokens that have at least one route to or from the given token
    pub fn connected_tokens(&self, token: &Address) -> BTreeSet<Address> {
        let mut connected: BTreeSet<Address> = self.routes.get(token).map(|inner| inner.keys().copied().collect()).unwrap_or_default();
        for (from, inner) in self.routes.range(..*token) {
            if inner.contains_key(token) {
                connected.insert(*from);
            }
        }
        connected
    }

    /// Canonical pairs with their routes, ordered by (from, to)
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Address, &Vec<SwapRoute>)> + '_ {
        self.routes.iter().flat_map(|(from, inner)| inner.iter().map(move |(to, routes)| (from, to, routes)))
    }

    pub fn pairs_len(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }

    pub fn routes_len(&self) -> usize {
        self.routes.values().flat_map(BTreeMap::values).map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
