use crate::data::PriceSeries;
use crate::indicators::{sma_min_periods, validate_input, IndicatorError, EPSILON};

//on-balance volume: running sum of volume signed by the close-to-close
//direction, starting at zero on the first bar
pub fn obv(series: &PriceSeries) -> Result<Vec<f64>, IndicatorError> {
    validate_input(series.len(), 1)?;

    let bars = series.bars();
    let mut out = Vec::with_capacity(bars.len());
    let mut running = 0.0;

    for i in 0..bars.len() {
        if i > 0 {
            let delta = bars[i].close - bars[i - 1].close;
            running += delta.signum() * bars[i].volume;
        }
        out.push(running);
    }

    Ok(out)
}

//money flow index: ratio of positive to negative typical-price money
//flow over the period, scaled like an rsi to 0..100
//the first period entries are nan (flows need a previous typical price)
pub fn mfi(series: &PriceSeries, period: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(series.len(), period)?;

    let bars = series.bars();
    let typical: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();

    //positive/negative money flow per bar, defined from the second bar
    let mut pos_flow = vec![0.0; bars.len()];
    let mut neg_flow = vec![0.0; bars.len()];

    for i in 1..bars.len() {
        let money_flow = typical[i] * bars[i].volume;
        if typical[i] > typical[i - 1] {
            pos_flow[i] = money_flow;
        } else if typical[i] < typical[i - 1] {
            neg_flow[i] = money_flow;
        }
    }

    let mut out = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        if i < period {
            out.push(f64::NAN);
            continue;
        }

        let start = i + 1 - period;
        let pos: f64 = pos_flow[start..=i].iter().sum();
        let neg: f64 = neg_flow[start..=i].iter().sum();

        out.push(100.0 - 100.0 / (1.0 + pos / (neg + EPSILON)));
    }

    Ok(out)
}

//rolling mean volume, defined from the first bar
pub fn average_volume(series: &PriceSeries, window: usize) -> Result<Vec<f64>, IndicatorError> {
    sma_min_periods(&series.volumes(), window, 1)
}
