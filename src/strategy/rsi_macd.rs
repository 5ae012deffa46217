use crate::data::PriceSeries;
use crate::indicators::{macd, rsi};
use crate::strategy::{SignalSeries, Strategy, StrategyError, BUY, HOLD, SELL};

const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;

//oscillator combo strategy
//buy when rsi crosses upward through the buy threshold while the macd
//line sits above its signal line; sell when rsi crosses downward
//through the sell threshold while the macd line sits below
#[derive(Debug, Clone)]
pub struct RsiMacdStrategy {
    rsi_buy_threshold: f64,
    rsi_sell_threshold: f64,
    name: String,
}

impl RsiMacdStrategy {
    pub fn new(rsi_buy_threshold: f64, rsi_sell_threshold: f64) -> Result<Self, StrategyError> {
        for threshold in [rsi_buy_threshold, rsi_sell_threshold] {
            if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
                return Err(StrategyError::InvalidConfig(format!(
                    "rsi threshold {} outside 0..100",
                    threshold
                )));
            }
        }

        Ok(RsiMacdStrategy {
            rsi_buy_threshold,
            rsi_sell_threshold,
            name: format!("RSI+MACD ({}/{})", rsi_buy_threshold, rsi_sell_threshold),
        })
    }
}

impl Strategy for RsiMacdStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, prices: &PriceSeries) -> Result<SignalSeries, StrategyError> {
        let closes = prices.closes();
        let rsi_series = rsi(&closes, RSI_PERIOD)?;
        let (macd_line, signal_line) = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL)?;

        let mut values = vec![HOLD; prices.len()];

        for i in 1..prices.len() {
            let prev_rsi = rsi_series[i - 1];
            let curr_rsi = rsi_series[i];
            if prev_rsi.is_nan() || curr_rsi.is_nan() {
                continue;
            }

            let sell_cross =
                prev_rsi > self.rsi_sell_threshold && curr_rsi <= self.rsi_sell_threshold;
            let buy_cross = prev_rsi < self.rsi_buy_threshold && curr_rsi >= self.rsi_buy_threshold;

            //sell takes precedence when both conditions hold on one bar
            if sell_cross && macd_line[i] < signal_line[i] {
                values[i] = SELL;
            } else if buy_cross && macd_line[i] > signal_line[i] {
                values[i] = BUY;
            }
        }

        Ok(SignalSeries::from_values(&prices.timestamps(), &values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use chrono::{TimeZone, Utc};

    fn price_series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let timestamp = Utc
                    .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                    .unwrap()
                    .checked_add_signed(chrono::Duration::days(i as i64))
                    .unwrap();
                Bar::new_unchecked(timestamp, close, close, close, close, 1000.0)
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn rejects_thresholds_outside_range() {
        assert!(matches!(
            RsiMacdStrategy::new(-5.0, 70.0),
            Err(StrategyError::InvalidConfig(_))
        ));
        assert!(matches!(
            RsiMacdStrategy::new(30.0, 170.0),
            Err(StrategyError::InvalidConfig(_))
        ));
        assert!(RsiMacdStrategy::new(30.0, 70.0).is_ok());
    }

    #[test]
    fn buy_requires_rsi_cross_and_macd_confirmation() {
        //long decline pins rsi low, then a sharp rally crosses the buy
        //threshold while macd turns positive
        let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64 * 2.0).collect();
        closes.extend((0..20).map(|i| 122.0 + i as f64 * 4.0));
        let strategy = RsiMacdStrategy::new(30.0, 70.0).unwrap();

        let signals = strategy.generate_signals(&price_series(&closes)).unwrap();
        assert!(signals.values().contains(&BUY));
    }

    #[test]
    fn no_signal_without_macd_confirmation() {
        //rsi oscillates through the thresholds on a flat macd: the very
        //first bars after seeding have macd == signal, so no confirmation
        let closes = [100.0; 30];
        let strategy = RsiMacdStrategy::new(30.0, 70.0).unwrap();

        let signals = strategy.generate_signals(&price_series(&closes)).unwrap();
        assert!(signals.values().iter().all(|&v| v == HOLD));
    }

    #[test]
    fn signal_length_matches_input() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i % 7) as f64).collect();
        let prices = price_series(&closes);
        let strategy = RsiMacdStrategy::new(30.0, 70.0).unwrap();

        let signals = strategy.generate_signals(&prices).unwrap();
        assert_eq!(signals.len(), prices.len());
    }
}
