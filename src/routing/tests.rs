/// End to end tests of the route cache, from a chain configuration to a selected route.

#[cfg(test)]
mod integration_tests {
    use super::super::*;
    use crate::Token;
    use crate::constants::ChainIds;
    use crate::errors::EstimationError;
    use crate::graph::Hop;
    use crate::markets::{ChainMarketsConfig, MarketDefinition, MarketId, RouteConfig, RoutingConfigSection};
    use crate::utils::LoadConfigError;
    use alloy_primitives::{Address, U256, address};
    use lazy_static::lazy_static;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    lazy_static! {
        static ref ETH: Token =
            Token::new_with_data(address!("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"), Some("ETH".to_string()), None, Some(18));
        static ref USDC: Token =
            Token::new_with_data(address!("0xaf88d065e77c8cC2239327C5EDb3A432268e5831"), Some("USDC".to_string()), None, Some(6));
        static ref DAI: Token =
            Token::new_with_data(address!("0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1"), Some("DAI".to_string()), None, Some(18));
        static ref BTC: Token =
            Token::new_with_data(address!("0x2f2a2543B76A4166549F7aaB2e75Bef0aefC5B0f"), Some("BTC".to_string()), None, Some(8));
    }

    const ETH_USDC: Address = address!("0x70d95587d40A2caf56bd97485aB3Eec10Bee6336");
    const ETH_DAI: Address = address!("0x1111111111111111111111111111111111111111");
    const USDC_DAI: Address = address!("0x2222222222222222222222222222222222222222");
    const ETH_ETH: Address = address!("0x3333333333333333333333333333333333333333");

    fn arbitrum_config() -> ChainMarketsConfig {
        ChainMarketsConfig::new(
            ChainIds::ARBITRUM,
            vec![
                MarketDefinition::new(ETH_USDC, ETH.get_address(), USDC.get_address()).with_index_token(ETH.get_address()),
                MarketDefinition::new(ETH_DAI, ETH.get_address(), DAI.get_address()).with_index_token(ETH.get_address()),
                MarketDefinition::spot(USDC_DAI, USDC.get_address(), DAI.get_address()),
                MarketDefinition::new(ETH_ETH, ETH.get_address(), ETH.get_address()).with_index_token(ETH.get_address()),
            ],
        )
        .with_tokens(vec![ETH.clone(), USDC.clone(), DAI.clone(), BTC.clone()])
    }

    // Fees in basis points per market, unknown markets are not priced
    fn fee_estimator(fees: HashMap<MarketId, u64>) -> impl Fn(&Hop, U256) -> Result<U256, EstimationError> {
        move |hop: &Hop, amount_in: U256| {
            let fee = fees.get(&hop.market).ok_or(EstimationError::UnknownMarket(hop.market))?;
            Ok(amount_in * U256::from(10_000 - fee) / U256::from(10_000))
        }
    }

    #[test]
    fn test_multi_hop_discovery_through_cache() {
        let cache = RouteCache::new(RoutingConfigSection::default()).unwrap();
        cache.rebuild(&arbitrum_config());

        let routes = cache.get_routes(ChainIds::ARBITRUM, &ETH.get_address(), &DAI.get_address());
        let markets: Vec<Vec<MarketId>> = routes.iter().map(|route| route.markets.clone()).collect();

        assert!(markets.contains(&vec![MarketId::Address(ETH_DAI)]));
        assert!(markets.contains(&vec![MarketId::Address(ETH_USDC), MarketId::Address(USDC_DAI)]));
        for route in &routes {
            assert_eq!(route.token_in().unwrap().get_address(), ETH.get_address());
            assert_eq!(route.token_out().unwrap().get_address(), DAI.get_address());
            assert!(route.len() <= cache.max_hops() as usize);
        }

        // the opposite direction traverses the same markets backwards
        let reversed = cache.get_routes(ChainIds::ARBITRUM, &DAI.get_address(), &ETH.get_address());
        assert_eq!(reversed.len(), routes.len());
        for (forward, backward) in routes.iter().zip(reversed.iter()) {
            assert_eq!(forward.invert(), *backward);
        }
    }

    #[test]
    fn test_single_hop_routing() -> eyre::Result<()> {
        let cache = RouteCache::new(RoutingConfigSection::default().with_max_hops(1))?;
        let chain_routes = cache.rebuild(&arbitrum_config());

        assert_eq!(chain_routes.max_hops, 1);
        let routes = cache.get_routes(ChainIds::ARBITRUM, &ETH.get_address(), &DAI.get_address());
        assert_eq!(routes.iter().map(|route| route.markets.clone()).collect::<Vec<_>>(), vec![vec![MarketId::Address(ETH_DAI)]]);
        assert!(chain_routes.swap_routes.iter().all(|(_, _, routes)| routes.iter().all(|route| route.len() == 1)));

        Ok(())
    }

    #[test]
    fn test_zero_hops_is_rejected() {
        let result = RouteCache::new(RoutingConfigSection::default().with_max_hops(0));
        assert!(matches!(result, Err(LoadConfigError::ConfigError(_))));

        let config = RouteConfig { routing: RoutingConfigSection::default().with_max_hops(0), chains: vec![arbitrum_config()] };
        assert!(RouteCache::from_config(&config).is_err());
    }

    #[test]
    fn test_same_collateral_market_never_routes() {
        let cache = RouteCache::default();
        cache.rebuild(&arbitrum_config());

        assert!(cache.get_routes(ChainIds::ARBITRUM, &ETH.get_address(), &ETH.get_address()).is_empty());
        assert!(!cache.is_reachable(ChainIds::ARBITRUM, &ETH.get_address(), &ETH.get_address()));

        let chain_routes = cache.get(ChainIds::ARBITRUM).unwrap();
        assert_eq!(chain_routes.markets_graph.market_count(), 3);
        for (_, _, routes) in chain_routes.swap_routes.iter() {
            assert!(routes.iter().all(|route| !route.contains_market(&MarketId::Address(ETH_ETH))));
        }
    }

    #[test]
    fn test_isolated_token_is_unreachable() {
        let cache = RouteCache::default();
        cache.rebuild(&arbitrum_config());

        for token in [&*ETH, &*USDC, &*DAI] {
            assert!(!cache.is_reachable(ChainIds::ARBITRUM, &BTC.get_address(), &token.get_address()));
            assert!(!cache.is_reachable(ChainIds::ARBITRUM, &token.get_address(), &BTC.get_address()));
            assert!(cache.get_routes(ChainIds::ARBITRUM, &BTC.get_address(), &token.get_address()).is_empty());
        }
        assert!(cache.reachable_tokens(ChainIds::ARBITRUM, &BTC.get_address()).is_empty());
        assert!(cache.get(ChainIds::ARBITRUM).unwrap().swap_routes.connected_tokens(&BTC.get_address()).is_empty());
    }

    #[test]
    fn test_best_route_prefers_cheaper_two_hop() {
        let cache = RouteCache::default();
        cache.rebuild(&arbitrum_config());

        let fees = HashMap::from([(MarketId::Address(ETH_DAI), 100), (MarketId::Address(ETH_USDC), 10), (MarketId::Address(USDC_DAI), 5)]);
        let estimator = fee_estimator(fees);

        let quote = cache
            .find_best_route(ChainIds::ARBITRUM, &ETH.get_address(), &DAI.get_address(), U256::from(1_000_000u64), &estimator)
            .unwrap();
        assert_eq!(quote.route.markets, vec![MarketId::Address(ETH_USDC), MarketId::Address(USDC_DAI)]);
        assert_eq!(quote.hop_amounts, vec![U256::from(999_000u64), U256::from(998_500u64)]);

        // direct market becomes the cheapest
        let fees = HashMap::from([(MarketId::Address(ETH_DAI), 1), (MarketId::Address(ETH_USDC), 10), (MarketId::Address(USDC_DAI), 5)]);
        let quote = cache
            .find_best_route(ChainIds::ARBITRUM, &ETH.get_address(), &DAI.get_address(), U256::from(1_000_000u64), &fee_estimator(fees))
            .unwrap();
        assert_eq!(quote.route.markets, vec![MarketId::Address(ETH_DAI)]);
    }

    #[test]
    fn test_unpriced_markets_disqualify_only_their_routes() {
        let cache = RouteCache::default();
        cache.rebuild(&arbitrum_config());

        let fees = HashMap::from([(MarketId::Address(ETH_DAI), 100)]);
        let quote = cache
            .find_best_route(ChainIds::ARBITRUM, &DAI.get_address(), &ETH.get_address(), U256::from(10_000u64), &fee_estimator(fees))
            .unwrap();
        assert_eq!(quote.route.markets, vec![MarketId::Address(ETH_DAI)]);
        assert_eq!(quote.amount_out, U256::from(9_900u64));

        let nothing_priced = fee_estimator(HashMap::new());
        assert!(
            cache
                .find_best_route(ChainIds::ARBITRUM, &DAI.get_address(), &ETH.get_address(), U256::from(10_000u64), &nothing_priced)
                .is_none()
        );
    }

    #[test]
    fn test_unknown_chain_is_empty() {
        let cache = RouteCache::default();

        assert!(!cache.is_reachable(ChainIds::AVALANCHE, &ETH.get_address(), &USDC.get_address()));
        assert!(cache.get_routes(ChainIds::AVALANCHE, &ETH.get_address(), &USDC.get_address()).is_empty());
        assert!(
            cache
                .find_best_route(ChainIds::AVALANCHE, &ETH.get_address(), &USDC.get_address(), U256::from(1), &fee_estimator(HashMap::new()))
                .is_none()
        );
    }

    #[test]
    fn test_empty_market_list() {
        let cache = RouteCache::default();
        let chain_routes = cache.rebuild(&ChainMarketsConfig::new(ChainIds::AVALANCHE, vec![]));

        assert!(chain_routes.swap_routes.is_empty());
        assert!(chain_routes.reachability.is_empty());
        assert!(chain_routes.markets_graph.is_empty());
    }

    #[test]
    fn test_rebuild_replaces_whole_entry() {
        let cache = RouteCache::default();
        let mut config = arbitrum_config();
        cache.rebuild(&config);
        let before = cache.get(ChainIds::ARBITRUM).unwrap();

        // list a BTC market
        let btc_usdc = Address::repeat_byte(0x44);
        config.markets.push(MarketDefinition::new(btc_usdc, BTC.get_address(), USDC.get_address()));
        cache.rebuild(&config);
        let after = cache.get(ChainIds::ARBITRUM).unwrap();

        // readers holding the old entry keep a consistent view
        assert!(!before.is_reachable(&BTC.get_address(), &ETH.get_address()));
        assert!(after.is_reachable(&BTC.get_address(), &ETH.get_address()));
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(cache.is_reachable(ChainIds::ARBITRUM, &BTC.get_address(), &DAI.get_address()));
        assert_eq!(cache.chain_ids(), vec![ChainIds::ARBITRUM]);

        assert!(cache.remove(ChainIds::ARBITRUM).is_some());
        assert!(!cache.contains_chain(ChainIds::ARBITRUM));
    }

    #[test]
    fn test_concurrent_readers() {
        let cache = Arc::new(RouteCache::default());
        cache.rebuild(&arbitrum_config());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || {
                    let estimator = |_hop: &Hop, amount_in: U256| -> Result<U256, EstimationError> { Ok(amount_in - U256::from(1)) };
                    cache
                        .find_best_route(ChainIds::ARBITRUM, &ETH.get_address(), &DAI.get_address(), U256::from(100), &estimator)
                        .map(|quote| quote.route.swap_route_hash)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
        assert!(results[0].is_some());
        assert!(results.iter().all(|result| *result == results[0]));
    }

    #[test]
    fn test_from_config_builds_every_chain() -> eyre::Result<()> {
        let config = RouteConfig::from_toml_str(&format!(
            r#"
[routing]
max_hops = 2

[[chains]]
chain_id = {arbitrum}

[[chains.markets]]
id = "{eth_usdc}"
long_token = "{eth}"
short_token = "{usdc}"

[[chains]]
chain_id = {avalanche}
"#,
            arbitrum = ChainIds::ARBITRUM,
            avalanche = ChainIds::AVALANCHE,
            eth_usdc = ETH_USDC,
            eth = ETH.get_address(),
            usdc = USDC.get_address(),
        ))?;

        let cache = RouteCache::from_config(&config)?;
        assert_eq!(cache.max_hops(), 2);
        assert_eq!(cache.chain_ids(), vec![ChainIds::ARBITRUM, ChainIds::AVALANCHE]);
        assert!(cache.is_reachable(ChainIds::ARBITRUM, &USDC.get_address(), &ETH.get_address()));
        assert_eq!(cache.get_routes(ChainIds::ARBITRUM, &USDC.get_address(), &ETH.get_address()).len(), 1);

        Ok(())
    }
}
