use crate::indicators::{validate_input, IndicatorError};
use statrs::statistics::Statistics;

//simple moving average: arithmetic mean of the trailing window
//the first window-1 entries are nan (not enough history)
pub fn sma(values: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    sma_min_periods(values, window, window)
}

//sma with a relaxed warm-up: entries are defined as soon as at least
//min_periods values are available, averaging over what exists
pub fn sma_min_periods(
    values: &[f64],
    window: usize,
    min_periods: usize,
) -> Result<Vec<f64>, IndicatorError> {
    validate_input(values.len(), window)?;
    let min_periods = min_periods.clamp(1, window);

    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let available = i + 1;
        if available < min_periods {
            out.push(f64::NAN);
            continue;
        }

        let start = available.saturating_sub(window);
        out.push(values[start..=i].mean());
    }

    Ok(out)
}

//exponential moving average with decay 2/(window+1),
//seeded by the first value and defined from the first bar
pub fn ema(values: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(values.len(), window)?;

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);

    for &value in &values[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }

    Ok(out)
}

//macd line (ema fast - ema slow) and its signal line (ema of the macd line)
pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<(Vec<f64>, Vec<f64>), IndicatorError> {
    let ema_fast = ema(values, fast)?;
    let ema_slow = ema(values, slow)?;

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal)?;

    Ok((macd_line, signal_line))
}

//price difference relative to window bars ago
pub fn momentum(values: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(values.len(), window)?;

    let out = (0..values.len())
        .map(|i| {
            if i < window {
                f64::NAN
            } else {
                values[i] - values[i - window]
            }
        })
        .collect();

    Ok(out)
}
