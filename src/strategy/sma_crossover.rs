use crate::data::PriceSeries;
use crate::indicators::sma_min_periods;
use crate::strategy::{SignalSeries, Strategy, StrategyError, BUY, HOLD, SELL};

//sma crossover strategy
//emits buy at the first bar where the short sma crosses above the long
//sma, sell on the symmetric downward cross, hold everywhere else
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    short_window: usize,
    long_window: usize,
    name: String,
}

impl SmaCrossoverStrategy {
    //rejects short_window >= long_window and zero windows at construction
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, StrategyError> {
        if short_window == 0 || long_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "sma windows must be at least 1".to_string(),
            ));
        }
        if short_window >= long_window {
            return Err(StrategyError::InvalidConfig(format!(
                "short window ({}) must be smaller than long window ({})",
                short_window, long_window
            )));
        }

        Ok(SmaCrossoverStrategy {
            short_window,
            long_window,
            name: format!("SMA Crossover ({}/{})", short_window, long_window),
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, prices: &PriceSeries) -> Result<SignalSeries, StrategyError> {
        let closes = prices.closes();
        //relaxed warm-up: both averages exist from the first bar, so a
        //cross can fire as soon as the short mean pulls ahead
        let short = sma_min_periods(&closes, self.short_window, 1)?;
        let long = sma_min_periods(&closes, self.long_window, 1)?;

        let mut values = vec![HOLD; prices.len()];

        for i in 1..prices.len() {
            let prev_short = short[i - 1];
            let prev_long = long[i - 1];
            let curr_short = short[i];
            let curr_long = long[i];

            //strict cross against the immediately preceding bar
            if curr_short > curr_long && prev_short <= prev_long {
                values[i] = BUY;
            } else if curr_short < curr_long && prev_short >= prev_long {
                values[i] = SELL;
            }
        }

        Ok(SignalSeries::from_values(&prices.timestamps(), &values))
    }
}
