use crate::errors::EstimationError;
use crate::graph::Hop;
use alloy_primitives::U256;

/// Converts an input amount at one hop into the output amount of that hop.
///
/// Implemented by the trading layer on top of live market state, it owns liquidity, fees and
/// price impact. Any closure `Fn(&Hop, U256) -> Result<U256, EstimationError>` is an estimator.
pub trait SwapEstimator {
    fn estimate(&self, hop: &Hop, amount_in: U256) -> Result<U256, EstimationError>;
}

impl<F> SwapEstimator for F
where
    F: Fn(&Hop, U256) -> Result<U256, EstimationError>,
{
    fn estimate(&self, hop: &Hop, amount_in: U256) -> Result<U256, EstimationError> {
        self(hop, amount_in)
    }
}
