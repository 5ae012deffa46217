use crate::data::PriceSeries;
use crate::indicators::{sma, validate_input, wilder_smooth, IndicatorError, EPSILON};
use statrs::statistics::Statistics;

//the three bollinger lines for one input series
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

//bollinger bands: sma middle line, upper/lower at k trailing
//sample standard deviations
pub fn bollinger_bands(
    values: &[f64],
    window: usize,
    k: f64,
) -> Result<BollingerBands, IndicatorError> {
    let middle = sma(values, window)?;

    let mut upper = Vec::with_capacity(values.len());
    let mut lower = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i + 1 < window || window < 2 {
            upper.push(f64::NAN);
            lower.push(f64::NAN);
            continue;
        }

        let start = i + 1 - window;
        let std = values[start..=i].std_dev();
        upper.push(middle[i] + k * std);
        lower.push(middle[i] - k * std);
    }

    Ok(BollingerBands {
        middle,
        upper,
        lower,
    })
}

//true range per bar: max(high-low, |high-prev_close|, |low-prev_close|)
//the first bar has no previous close and uses high-low
fn true_range(series: &PriceSeries) -> Vec<f64> {
    let bars = series.bars();
    let mut out = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let bar = &bars[i];
        let tr = if i == 0 {
            bar.range()
        } else {
            let prev_close = bars[i - 1].close;
            bar.range()
                .max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        };
        out.push(tr);
    }

    out
}

//average true range: wilder-smoothed true range
pub fn atr(series: &PriceSeries, period: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(series.len(), period)?;
    Ok(wilder_smooth(&true_range(series), period))
}

//average directional index: wilder-smoothed directional movement
//+dm/-dm compare consecutive high/low moves, di lines are scaled by the
//smoothed true range, and adx is the smoothed dx
//the first bar has no movement yet and is nan
pub fn adx(series: &PriceSeries, period: usize) -> Result<Vec<f64>, IndicatorError> {
    validate_input(series.len(), period)?;

    let bars = series.bars();
    if bars.len() < 2 {
        return Ok(vec![f64::NAN; bars.len()]);
    }

    let tr = true_range(series);
    let mut plus_dm = Vec::with_capacity(bars.len() - 1);
    let mut minus_dm = Vec::with_capacity(bars.len() - 1);

    for i in 1..bars.len() {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let smoothed_tr = wilder_smooth(&tr[1..], period);
    let smoothed_plus = wilder_smooth(&plus_dm, period);
    let smoothed_minus = wilder_smooth(&minus_dm, period);

    let dx: Vec<f64> = smoothed_tr
        .iter()
        .zip(smoothed_plus.iter().zip(smoothed_minus.iter()))
        .map(|(&tr, (&plus, &minus))| {
            let plus_di = 100.0 * plus / (tr + EPSILON);
            let minus_di = 100.0 * minus / (tr + EPSILON);
            100.0 * (plus_di - minus_di).abs() / (plus_di + minus_di + EPSILON)
        })
        .collect();

    let mut out = vec![f64::NAN];
    out.extend(wilder_smooth(&dx, period));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Bar;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn series_from_ohlc(rows: &[(f64, f64, f64, f64)]) -> PriceSeries {
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| {
                let timestamp = Utc
                    .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                    .unwrap()
                    .checked_add_signed(chrono::Duration::days(i as i64))
                    .unwrap();
                Bar::new_unchecked(timestamp, open, high, low, close, 1000.0)
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn bollinger_bands_bracket_the_middle() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let bands = bollinger_bands(&values, 20, 2.0).unwrap();

        for i in 19..values.len() {
            assert!(bands.upper[i] >= bands.middle[i]);
            assert!(bands.lower[i] <= bands.middle[i]);
        }
        assert!(bands.upper[18].is_nan());
    }

    #[test]
    fn bollinger_bands_collapse_on_constant_series() {
        let values = [42.0; 25];
        let bands = bollinger_bands(&values, 20, 2.0).unwrap();

        assert_relative_eq!(bands.upper[24], 42.0);
        assert_relative_eq!(bands.lower[24], 42.0);
    }

    #[test]
    fn atr_of_constant_range_bars() {
        let rows: Vec<(f64, f64, f64, f64)> =
            (0..10).map(|_| (10.0, 11.0, 9.0, 10.0)).collect();
        let series = series_from_ohlc(&rows);

        let out = atr(&series, 5).unwrap();
        //every true range is 2.0, so the smoothed value stays 2.0
        for v in out {
            assert_relative_eq!(v, 2.0);
        }
    }

    #[test]
    fn atr_uses_previous_close_in_gaps() {
        //second bar gaps far above the first close
        let series = series_from_ohlc(&[(10.0, 11.0, 9.0, 10.0), (20.0, 21.0, 19.0, 20.0)]);
        let out = atr(&series, 1).unwrap();

        //with period 1 the atr equals the raw true range: |21 - 10| = 11
        assert_relative_eq!(out[1], 11.0);
    }

    #[test]
    fn adx_high_in_steady_trend() {
        let rows: Vec<(f64, f64, f64, f64)> = (0..40)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                (base, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        let series = series_from_ohlc(&rows);

        let out = adx(&series, 14).unwrap();
        assert!(out[0].is_nan());
        //one-way trend drives dx toward 100
        assert!(*out.last().unwrap() > 80.0);
    }

    #[test]
    fn adx_single_bar_is_nan() {
        let series = series_from_ohlc(&[(10.0, 11.0, 9.0, 10.0)]);
        let out = adx(&series, 14).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_nan());
    }
}
