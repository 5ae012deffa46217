use crate::data::PriceSeries;
use crate::indicators::{validate_input, IndicatorError, EPSILON};
use statrs::statistics::Statistics;

//relative strength index with wilder smoothing (alpha = 1/period)
//of the positive and negative bar-to-bar deltas
//the first entry is nan (no delta exists yet); avg_loss == 0 saturates
//the oscillator toward 100 through the epsilon denominator guard
pub fn rsi(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(values.len(), period)?;

    let alpha = 1.0 / period as f64;
    let mut out = Vec::with_capacity(values.len());
    out.push(f64::NAN);

    let mut avg_gain = f64::NAN;
    let mut avg_loss = f64::NAN;

    for i in 1..values.len() {
        let delta = values[i] - values[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if avg_gain.is_nan() {
            //seed the recursion with the first delta
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain += alpha * (gain - avg_gain);
            avg_loss += alpha * (loss - avg_loss);
        }

        let rs = avg_gain / (avg_loss + EPSILON);
        out.push(100.0 - 100.0 / (1.0 + rs));
    }

    Ok(out)
}

//stochastic %k: close position within the trailing high-low range,
//scaled to 0..100
pub fn stochastic_k(series: &PriceSeries, period: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(series.len(), period)?;

    let highs = series.highs();
    let lows = series.lows();
    let closes = series.closes();

    let mut out = Vec::with_capacity(series.len());

    for i in 0..series.len() {
        if i + 1 < period {
            out.push(f64::NAN);
            continue;
        }

        let start = i + 1 - period;
        let highest_high = highs[start..=i].iter().copied().fold(f64::MIN, f64::max);
        let lowest_low = lows[start..=i].iter().copied().fold(f64::MAX, f64::min);

        out.push(100.0 * (closes[i] - lowest_low) / (highest_high - lowest_low + EPSILON));
    }

    Ok(out)
}

//commodity channel index: typical price deviation from its own
//moving average, scaled by 0.015 times the mean absolute deviation
pub fn cci(series: &PriceSeries, period: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(series.len(), period)?;

    let typical: Vec<f64> = series.iter().map(|b| b.typical_price()).collect();
    let mut out = Vec::with_capacity(series.len());

    for i in 0..typical.len() {
        if i + 1 < period {
            out.push(f64::NAN);
            continue;
        }

        let start = i + 1 - period;
        let window = &typical[start..=i];
        let mean = window.mean();
        let mad = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;

        out.push((typical[i] - mean) / (0.015 * mad + EPSILON));
    }

    Ok(out)
}
