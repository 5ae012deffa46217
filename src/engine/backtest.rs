use crate::data::PriceSeries;
use crate::engine::trade::Trade;
use crate::metrics::{build_equity_curve, EquityPoint, SummaryMetrics};
use crate::portfolio::Position;
use crate::strategy::{SignalSeries, BUY, HOLD, SELL};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Invalid signal value {value} at {timestamp} (expected -1, 0 or 1)")]
    InvalidSignalValue {
        value: i8,
        timestamp: DateTime<Utc>,
    },
    #[error("No price bar at signal timestamp {0}")]
    MissingPriceAtTimestamp(DateTime<Utc>),
}

//result of a backtest
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub summary: SummaryMetrics,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}

//configuration for a backtest
//stop_loss_pct is a negative fraction (eg -0.05 exits 5% below entry),
//take_profit_pct a positive one (eg 0.1 exits 10% above entry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10000.0,
            stop_loss_pct: None,
            take_profit_pct: None,
        }
    }
}

//replays a signal series against a price series bar by bar,
//maintaining cash and a single long-or-flat position
//
//per bar, in order: a buy signal while flat invests as many whole
//shares as cash allows at the close; an open position exits on the
//first trigger among sell signal, stop-loss and take-profit; equity
//(cash plus mark-to-market position) is recorded unconditionally
//
//a position still open after the last bar is not force-liquidated
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        BacktestEngine { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    //validates the signal series against the price series and returns
    //a timestamp-indexed lookup
    //signals at timestamps without a price bar are an error; the
    //caller realigns with hold-fill if that is intended
    fn signal_lookup(
        prices: &PriceSeries,
        signals: &SignalSeries,
    ) -> Result<IndexMap<DateTime<Utc>, i8>, BacktestError> {
        let known: HashSet<DateTime<Utc>> = prices.iter().map(|b| b.timestamp).collect();
        let mut lookup = IndexMap::with_capacity(signals.len());

        for point in signals.points() {
            if !matches!(point.value, SELL | HOLD | BUY) {
                return Err(BacktestError::InvalidSignalValue {
                    value: point.value,
                    timestamp: point.timestamp,
                });
            }
            if !known.contains(&point.timestamp) {
                return Err(BacktestError::MissingPriceAtTimestamp(point.timestamp));
            }
            lookup.insert(point.timestamp, point.value);
        }

        Ok(lookup)
    }

    //runs the simulation and returns the equity curve, trade ledger
    //and summary metrics
    pub fn run(
        &self,
        prices: &PriceSeries,
        signals: &SignalSeries,
    ) -> Result<BacktestResult, BacktestError> {
        let lookup = Self::signal_lookup(prices, signals)?;

        let mut cash = self.config.initial_capital;
        let mut position = Position::flat();
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_history: Vec<(DateTime<Utc>, f64)> = Vec::with_capacity(prices.len());

        for bar in prices.iter() {
            let price = bar.close;
            //bars without a signal entry read as hold
            let signal = lookup.get(&bar.timestamp).copied().unwrap_or(HOLD);

            //entry: whole shares only, cost never exceeds cash
            if position.is_flat() && signal == BUY {
                let quantity = (cash / price).floor() as u64;
                if quantity > 0 {
                    cash -= quantity as f64 * price;
                    position.open(quantity, price);
                    trades.push(Trade::buy(bar.timestamp, quantity, price));
                }
            }

            //exit triggers in priority order: sell signal, stop-loss,
            //take-profit; the first hit fires exactly once
            if !position.is_flat() {
                let open_return = position.open_return(price).unwrap_or(0.0);

                let should_exit = signal == SELL
                    || self
                        .config
                        .stop_loss_pct
                        .is_some_and(|stop| open_return <= stop)
                    || self
                        .config
                        .take_profit_pct
                        .is_some_and(|take| open_return >= take);

                if should_exit {
                    let quantity = position.quantity;
                    let realized = position.close(price);
                    cash += quantity as f64 * price;
                    trades.push(Trade::sell(bar.timestamp, quantity, price, realized));
                }
            }

            //record equity unconditionally, every bar
            equity_history.push((bar.timestamp, cash + position.market_value(price)));
        }

        let equity_curve = build_equity_curve(&equity_history);
        let summary =
            SummaryMetrics::from_backtest(&equity_curve, &trades, self.config.initial_capital);

        Ok(BacktestResult {
            summary,
            equity_curve,
            trades,
        })
    }
}
