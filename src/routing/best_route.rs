use super::estimator::SwapEstimator;
use crate::errors::EstimationError;
use crate::graph::SwapRoute;
use alloy_primitives::U256;
use serde::Serialize;
use tracing::{debug, trace};

/// A route simulated for one trade size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteQuote {
    pub route: SwapRoute,
    pub amount_in: U256,
    pub amount_out: U256,
    // output amount after every hop, the last one equals amount_out
    pub hop_amounts: Vec<U256>,
}

/// Thread `amount_in` through the hops of a route, the output of a hop is the input of the next.
pub fn simulate_route<E>(route: &SwapRoute, amount_in: U256, estimator: &E) -> Result<RouteQuote, EstimationError>
where
    E: SwapEstimator + ?Sized,
{
    if route.is_empty() {
        return Err(EstimationError::Other("route has no hops".to_string()));
    }

    let mut amount = amount_in;
    let mut hop_amounts = Vec::with_capacity(route.len());
    for hop in route.hops() {
        amount = estimator.estimate(&hop, amount)?;
        hop_amounts.push(amount);
    }

    Ok(RouteQuote { route: route.clone(), amount_in, amount_out: amount, hop_amounts })
}

/// Quotes of every route that can be filled at this size, in candidate order.
pub fn quote_routes<E>(routes: &[SwapRoute], amount_in: U256, estimator: &E) -> Vec<RouteQuote>
where
    E: SwapEstimator + ?Sized,
{
    routes
        .iter()
        .filter_map(|route| match simulate_route(route, amount_in, estimator) {
            Ok(quote) => Some(quote),
            Err(e) => {
                trace!(route = %route, error = %e, "Route disqualified");
                None
            }
        })
        .collect()
}

/// The route with the strictly greatest output. On equal outputs the earlier candidate wins.
/// `None` means the trade is not fillable right now, not a failure.
pub fn select_best_route<E>(routes: &[SwapRoute], amount_in: U256, estimator: &E) -> Option<RouteQuote>
where
    E: SwapEstimator + ?Sized,
{
    let mut best: Option<RouteQuote> = None;
    let mut disqualified = 0usize;

    for route in routes {
        match simulate_route(route, amount_in, estimator) {
            Ok(quote) => {
                if best.as_ref().is_none_or(|current| quote.amount_out > current.amount_out) {
                    best = Some(quote);
                }
            }
            Err(e) => {
                trace!(route = %route, error = %e, "Route disqualified");
                disqualified += 1;
            }
        }
    }

    debug!(candidates = routes.len(), disqualified, found = best.is_some(), %amount_in, "Best route selected");
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Token;
    use crate::graph::Hop;
    use crate::markets::MarketId;
    use alloy_primitives::Address;
    use std::cell::Cell;
    use std::sync::Arc;

    fn market_id(byte: u8) -> MarketId {
        MarketId::Address(Address::repeat_byte(byte))
    }

    fn route(tokens: &[u8], markets: &[u8]) -> SwapRoute {
        SwapRoute::new(
            tokens.iter().map(|b| Arc::new(Token::repeat_byte(*b))).collect::<Vec<_>>(),
            markets.iter().map(|b| market_id(*b)).collect::<Vec<_>>(),
        )
        .unwrap()
    }

    fn constant_fee(fee: u64) -> impl Fn(&Hop, U256) -> Result<U256, EstimationError> {
        move |hop: &Hop, amount_in: U256| {
            amount_in.checked_sub(U256::from(fee)).ok_or(EstimationError::InsufficientLiquidity { market: hop.market, amount_in })
        }
    }

    #[test]
    fn test_simulate_threads_amounts() {
        let swap_route = route(&[1, 2, 3], &[0x10, 0x11]);
        let quote = simulate_route(&swap_route, U256::from(1000), &constant_fee(10)).unwrap();

        assert_eq!(quote.hop_amounts, vec![U256::from(990), U256::from(980)]);
        assert_eq!(quote.amount_out, U256::from(980));
        assert_eq!(quote.amount_in, U256::from(1000));
    }

    #[test]
    fn test_output_of_hop_feeds_next_hop() {
        // doubles on the first market, halves minus one on the second
        let estimator = |hop: &Hop, amount_in: U256| -> Result<U256, EstimationError> {
            if hop.market == market_id(0x10) { Ok(amount_in * U256::from(2)) } else { Ok(amount_in / U256::from(2) - U256::from(1)) }
        };
        let quote = simulate_route(&route(&[1, 2, 3], &[0x10, 0x11]), U256::from(100), &estimator).unwrap();

        assert_eq!(quote.amount_out, U256::from(99));
    }

    #[test]
    fn test_prefers_fewer_hops_with_constant_fee() {
        let routes = vec![route(&[1, 2, 3], &[0x10, 0x11]), route(&[1, 3], &[0x12]), route(&[1, 2, 4, 3], &[0x10, 0x13, 0x14])];

        let best = select_best_route(&routes, U256::from(1000), &constant_fee(5)).unwrap();
        assert_eq!(best.route.markets, vec![market_id(0x12)]);
        assert_eq!(best.amount_out, U256::from(995));
    }

    #[test]
    fn test_prefers_lower_cumulative_fee() {
        let routes = vec![route(&[1, 3], &[0x10]), route(&[1, 2, 3], &[0x11, 0x12])];
        // the direct market is expensive, the two hop route is cheaper in total
        let estimator = |hop: &Hop, amount_in: U256| -> Result<U256, EstimationError> {
            let fee = if hop.market == market_id(0x10) { 50u64 } else { 10u64 };
            Ok(amount_in - U256::from(fee))
        };

        let best = select_best_route(&routes, U256::from(1000), &estimator).unwrap();
        assert_eq!(best.route.markets, vec![market_id(0x11), market_id(0x12)]);
        assert_eq!(best.amount_out, U256::from(980));
    }

    #[test]
    fn test_tie_keeps_earlier_route() {
        let routes = vec![route(&[1, 2], &[0x10]), route(&[1, 2], &[0x11]), route(&[1, 2], &[0x12])];

        let best = select_best_route(&routes, U256::from(1000), &constant_fee(1)).unwrap();
        assert_eq!(best.route.markets, vec![market_id(0x10)]);
    }

    #[test]
    fn test_failing_route_does_not_abort_selection() {
        let routes = vec![route(&[1, 2], &[0x10]), route(&[1, 3, 2], &[0x11, 0x12]), route(&[1, 2], &[0x13])];
        let estimator = |hop: &Hop, amount_in: U256| -> Result<U256, EstimationError> {
            match hop.market {
                m if m == market_id(0x10) => Err(EstimationError::MarketDisabled(m)),
                m if m == market_id(0x13) => Ok(amount_in - U256::from(3)),
                _ => Ok(amount_in - U256::from(1)),
            }
        };

        let best = select_best_route(&routes, U256::from(100), &estimator).unwrap();
        assert_eq!(best.route.markets, vec![market_id(0x11), market_id(0x12)]);
        assert_eq!(quote_routes(&routes, U256::from(100), &estimator).len(), 2);
    }

    #[test]
    fn test_failure_depends_on_trade_size() {
        let routes = vec![route(&[1, 2, 3], &[0x10, 0x11])];

        assert!(select_best_route(&routes, U256::from(15), &constant_fee(10)).is_none());
        assert!(select_best_route(&routes, U256::from(25), &constant_fee(10)).is_some());
    }

    #[test]
    fn test_no_routes() {
        assert!(select_best_route(&[], U256::from(1), &constant_fee(0)).is_none());
        assert!(quote_routes(&[], U256::from(1), &constant_fee(0)).is_empty());
    }

    #[test]
    fn test_empty_route_is_rejected() {
        assert!(simulate_route(&SwapRoute::default(), U256::from(1), &constant_fee(0)).is_err());
    }

    #[test]
    fn test_failing_hop_stops_simulation() {
        let calls = Cell::new(0);
        let estimator = |_hop: &Hop, _amount_in: U256| -> Result<U256, EstimationError> {
            calls.set(calls.get() + 1);
            Err(EstimationError::Other("paused".to_string()))
        };

        assert!(simulate_route(&route(&[1, 2, 3], &[0x10, 0x11]), U256::from(1), &estimator).is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_dyn_estimator() {
        let estimator: Box<dyn SwapEstimator> = Box::new(constant_fee(2));
        let best = select_best_route(&[route(&[1, 2], &[0x10])], U256::from(10), estimator.as_ref()).unwrap();
        assert_eq!(best.amount_out, U256::from(8));
    }
}
