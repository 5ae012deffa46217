use crate::data::PriceSeries;
use crate::strategy::{SignalSeries, Strategy, StrategyError};
use std::collections::HashSet;
use thiserror::Error;

//minimum bars a prediction must cover before its signals are trusted
const MIN_USABLE_BARS: usize = 20;

#[derive(Error, Debug)]
#[error("Predictor failure: {0}")]
pub struct PredictorError(pub String);

//external predictive collaborator: maps a price series to a signal
//series, typically backed by a trained model outside the core
pub trait Predictor: Send + Sync {
    fn predict(&self, prices: &PriceSeries) -> Result<SignalSeries, PredictorError>;
}

//strategy that delegates signal generation to an injected predictor
//fails softly: any predictor failure, a too-short input series, or a
//prediction covering fewer than MIN_USABLE_BARS bars yields an
//all-hold series instead of an error
pub struct ModelStrategy<P: Predictor> {
    predictor: P,
    name: String,
}

impl<P: Predictor> ModelStrategy<P> {
    pub fn new(predictor: P) -> Self {
        ModelStrategy {
            predictor,
            name: "Model".to_string(),
        }
    }
}

impl<P: Predictor> Strategy for ModelStrategy<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, prices: &PriceSeries) -> Result<SignalSeries, StrategyError> {
        if prices.len() < MIN_USABLE_BARS {
            return Ok(SignalSeries::all_hold(prices));
        }

        let predicted = match self.predictor.predict(prices) {
            Ok(predicted) => predicted,
            Err(_) => return Ok(SignalSeries::all_hold(prices)),
        };

        //count prediction points that land on actual price bars
        let known: HashSet<_> = prices.iter().map(|b| b.timestamp).collect();
        let usable = predicted
            .points()
            .iter()
            .filter(|p| known.contains(&p.timestamp))
            .count();

        if usable < MIN_USABLE_BARS {
            return Ok(SignalSeries::all_hold(prices));
        }

        Ok(predicted.align_to(prices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use crate::strategy::{SignalPoint, BUY, HOLD};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn price_series(len: u32) -> PriceSeries {
        let bars = (1..=len)
            .map(|d| Bar::new_unchecked(ts(d), 10.0, 10.0, 10.0, 10.0, 100.0))
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn predict(&self, _prices: &PriceSeries) -> Result<SignalSeries, PredictorError> {
            Err(PredictorError("model not loaded".to_string()))
        }
    }

    struct EchoPredictor {
        value: i8,
    }

    impl Predictor for EchoPredictor {
        fn predict(&self, prices: &PriceSeries) -> Result<SignalSeries, PredictorError> {
            let points = prices
                .iter()
                .map(|bar| SignalPoint {
                    timestamp: bar.timestamp,
                    value: self.value,
                })
                .collect();
            Ok(SignalSeries::new(points))
        }
    }

    struct SparsePredictor;

    impl Predictor for SparsePredictor {
        fn predict(&self, prices: &PriceSeries) -> Result<SignalSeries, PredictorError> {
            //covers only the first five bars
            let points = prices
                .iter()
                .take(5)
                .map(|bar| SignalPoint {
                    timestamp: bar.timestamp,
                    value: BUY,
                })
                .collect();
            Ok(SignalSeries::new(points))
        }
    }

    #[test]
    fn predictor_failure_falls_back_to_all_hold() {
        let prices = price_series(25);
        let strategy = ModelStrategy::new(FailingPredictor);

        let signals = strategy.generate_signals(&prices).unwrap();
        assert_eq!(signals.len(), 25);
        assert!(signals.values().iter().all(|&v| v == HOLD));
    }

    #[test]
    fn short_series_falls_back_to_all_hold() {
        let prices = price_series(10);
        let strategy = ModelStrategy::new(EchoPredictor { value: BUY });

        let signals = strategy.generate_signals(&prices).unwrap();
        assert!(signals.values().iter().all(|&v| v == HOLD));
    }

    #[test]
    fn sparse_prediction_falls_back_to_all_hold() {
        let prices = price_series(25);
        let strategy = ModelStrategy::new(SparsePredictor);

        let signals = strategy.generate_signals(&prices).unwrap();
        assert!(signals.values().iter().all(|&v| v == HOLD));
    }

    #[test]
    fn healthy_prediction_passes_through_aligned() {
        let prices = price_series(25);
        let strategy = ModelStrategy::new(EchoPredictor { value: BUY });

        let signals = strategy.generate_signals(&prices).unwrap();
        assert_eq!(signals.len(), 25);
        assert!(signals.values().iter().all(|&v| v == BUY));
    }
}
