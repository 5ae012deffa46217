use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a point in the equity curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    pub drawdown: f64,
    pub returns: f64,
}

//builds an annotated equity curve from per-bar (timestamp, equity)
//pairs: each point carries its decline from the running peak and its
//return over the previous bar
pub fn build_equity_curve(history: &[(DateTime<Utc>, f64)]) -> Vec<EquityPoint> {
    let mut curve = Vec::with_capacity(history.len());
    let mut peak = f64::NAN;
    let mut prev_equity = f64::NAN;

    for &(timestamp, equity) in history {
        if peak.is_nan() || equity > peak {
            peak = equity;
        }

        //a non-positive running peak yields no meaningful drawdown
        let drawdown = if peak > 0.0 {
            (peak - equity) / peak
        } else {
            0.0
        };

        let returns = if prev_equity.is_nan() || prev_equity == 0.0 {
            0.0
        } else {
            (equity - prev_equity) / prev_equity
        };

        curve.push(EquityPoint {
            timestamp,
            equity,
            drawdown,
            returns,
        });
        prev_equity = equity;
    }

    curve
}

//maximum peak-relative drawdown over the curve, in [0, 1]
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    equity_curve
        .iter()
        .map(|point| point.drawdown)
        .fold(0.0, f64::max)
}

//per-bar returns, one fewer than the number of equity points
pub fn bar_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve.iter().skip(1).map(|p| p.returns).collect()
}
