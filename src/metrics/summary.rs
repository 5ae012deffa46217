use crate::engine::trade::{Trade, TradeKind};
use crate::metrics::timeseries::{bar_returns, max_drawdown, EquityPoint};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//default annualization factor for the sharpe ratio, daily bars
pub const PERIODS_PER_YEAR: f64 = 252.0;

//summary metrics for a backtest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub initial_capital: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub num_trades: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub win_rate: f64,
}

impl SummaryMetrics {
    //calculates summary metrics from an equity curve and trade ledger
    pub fn from_backtest(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        initial_capital: f64,
    ) -> Self {
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_capital);

        let returns = bar_returns(equity_curve);
        let sharpe = sharpe_ratio(&returns, PERIODS_PER_YEAR);

        //win/loss statistics over completed (sell) trades only
        let sells: Vec<&Trade> = trades
            .iter()
            .filter(|t| t.kind == TradeKind::Sell)
            .collect();
        let num_winning_trades = sells.iter().filter(|t| t.is_winner()).count();
        let num_losing_trades = sells
            .iter()
            .filter(|t| t.realized_pnl.is_some_and(|pnl| pnl < 0.0))
            .count();
        let win_rate = if sells.is_empty() {
            0.0
        } else {
            num_winning_trades as f64 / sells.len() as f64
        };

        SummaryMetrics {
            initial_capital,
            final_equity,
            total_return: total_return(equity_curve),
            max_drawdown: max_drawdown(equity_curve),
            sharpe_ratio: sharpe,
            num_trades: trades.len(),
            num_winning_trades,
            num_losing_trades,
            win_rate,
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Initial Capital"),
            Cell::new(&format!("${:.2}", self.initial_capital)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Final Equity"),
            Cell::new(&format!("${:.2}", self.final_equity)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total Return"),
            Cell::new(&format!("{:.2}%", self.total_return * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Max Drawdown"),
            Cell::new(&format!("{:.2}%", self.max_drawdown * 100.0)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Sharpe Ratio"),
            Cell::new(&format!("{:.3}", self.sharpe_ratio)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Number of Trades"),
            Cell::new(&format!("{}", self.num_trades)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Winning / Losing"),
            Cell::new(&format!(
                "{} / {}",
                self.num_winning_trades, self.num_losing_trades
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Win Rate"),
            Cell::new(&format!("{:.2}%", self.win_rate * 100.0)),
        ]));

        table.printstd();
    }
}

//total return over the curve; an empty curve or a zero starting
//equity yields 0
fn total_return(equity_curve: &[EquityPoint]) -> f64 {
    let (first, last) = match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) => (first.equity, last.equity),
        _ => return 0.0,
    };

    if first == 0.0 {
        return 0.0;
    }
    (last - first) / first
}

//annualized sharpe ratio of per-bar returns
//fewer than two returns or zero variance yields 0, not an error
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.mean();
    let std_dev = returns.std_dev();

    if std_dev == 0.0 {
        return 0.0;
    }

    (mean / std_dev) * periods_per_year.sqrt()
}
