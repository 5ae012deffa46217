pub mod model;
pub mod rsi_macd;
pub mod sma_crossover;

use crate::data::PriceSeries;
use crate::indicators::IndicatorError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//per-bar signal values
pub const BUY: i8 = 1;
pub const HOLD: i8 = 0;
pub const SELL: i8 = -1;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid strategy configuration: {0}")]
    InvalidConfig(String),
    #[error("Indicator computation failed: {0}")]
    Computation(#[from] IndicatorError),
}

//one buy/hold/sell decision at a single timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    pub timestamp: DateTime<Utc>,
    pub value: i8,
}

//ordered sequence of per-bar signals, index-aligned to a price series
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn new(points: Vec<SignalPoint>) -> Self {
        SignalSeries { points }
    }

    //pairs one value per price-series timestamp, in order
    pub fn from_values(timestamps: &[DateTime<Utc>], values: &[i8]) -> Self {
        let points = timestamps
            .iter()
            .zip(values.iter())
            .map(|(&timestamp, &value)| SignalPoint { timestamp, value })
            .collect();
        SignalSeries { points }
    }

    //a hold signal on every bar of the given price series
    pub fn all_hold(prices: &PriceSeries) -> Self {
        let points = prices
            .iter()
            .map(|bar| SignalPoint {
                timestamp: bar.timestamp,
                value: HOLD,
            })
            .collect();
        SignalSeries { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<i8> {
        self.points.iter().map(|p| p.value).collect()
    }

    //realigns this series to the timestamp set of a price series:
    //bars without a signal read as hold, signals at unknown timestamps
    //are dropped; a missing entry is never inferred as buy or sell
    pub fn align_to(&self, prices: &PriceSeries) -> SignalSeries {
        let by_timestamp: IndexMap<DateTime<Utc>, i8> = self
            .points
            .iter()
            .map(|p| (p.timestamp, p.value))
            .collect();

        let points = prices
            .iter()
            .map(|bar| SignalPoint {
                timestamp: bar.timestamp,
                value: by_timestamp.get(&bar.timestamp).copied().unwrap_or(HOLD),
            })
            .collect();

        SignalSeries { points }
    }
}

//capability contract every signal generator implements
//send + sync so strategies can be dispatched across sweep workers
pub trait Strategy: Send + Sync {
    //returns the strategy name for display
    fn name(&self) -> &str;

    //maps a price series to a signal series with an identical timestamp set
    fn generate_signals(&self, prices: &PriceSeries) -> Result<SignalSeries, StrategyError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn price_series(days: &[u32]) -> PriceSeries {
        let bars = days
            .iter()
            .map(|&d| Bar::new_unchecked(ts(d), 10.0, 10.0, 10.0, 10.0, 100.0))
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn align_fills_missing_timestamps_with_hold() {
        let prices = price_series(&[1, 2, 3]);
        let sparse = SignalSeries::new(vec![SignalPoint {
            timestamp: ts(2),
            value: BUY,
        }]);

        let aligned = sparse.align_to(&prices);
        assert_eq!(aligned.values(), vec![HOLD, BUY, HOLD]);
    }

    #[test]
    fn align_drops_unknown_timestamps() {
        let prices = price_series(&[1, 2]);
        let signals = SignalSeries::new(vec![
            SignalPoint {
                timestamp: ts(1),
                value: SELL,
            },
            SignalPoint {
                timestamp: ts(9),
                value: BUY,
            },
        ]);

        let aligned = signals.align_to(&prices);
        assert_eq!(aligned.values(), vec![SELL, HOLD]);
    }

    #[test]
    fn all_hold_matches_series_length() {
        let prices = price_series(&[1, 2, 3, 4]);
        let signals = SignalSeries::all_hold(&prices);
        assert_eq!(signals.len(), 4);
        assert!(signals.values().iter().all(|&v| v == HOLD));
    }
}
