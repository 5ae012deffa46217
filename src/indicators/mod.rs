pub mod candle;
pub mod oscillator;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use candle::{bearish_engulfing, bullish_engulfing};
pub use oscillator::{cci, rsi, stochastic_k};
pub use trend::{ema, macd, momentum, sma, sma_min_periods};
pub use volatility::{atr, adx, bollinger_bands, BollingerBands};
pub use volume::{average_volume, mfi, obv};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Indicator input is empty")]
    EmptyInput,
    #[error("Invalid window size: {0}")]
    InvalidWindow(usize),
}

//denominator guard substituted for zero divisors instead of failing
pub(crate) const EPSILON: f64 = 1e-8;

//checks the common preconditions shared by all windowed transforms
pub(crate) fn validate_input(len: usize, window: usize) -> Result<(), IndicatorError> {
    if len == 0 {
        return Err(IndicatorError::EmptyInput);
    }
    if window == 0 {
        return Err(IndicatorError::InvalidWindow(window));
    }
    Ok(())
}

//wilder smoothing: recursive exponential mean with alpha = 1/period,
//seeded by the first input value
pub(crate) fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 1.0 / period as f64;
    let mut out = Vec::with_capacity(values.len());
    let mut prev = f64::NAN;

    for &value in values {
        prev = if prev.is_nan() {
            value
        } else {
            prev + alpha * (value - prev)
        };
        out.push(prev);
    }

    out
}
