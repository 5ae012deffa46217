use crate::data::PriceSeries;
use crate::engine::{BacktestConfig, BacktestEngine};
use crate::metrics::SummaryMetrics;
use crate::strategy::{Strategy, StrategyError};
use prettytable::{Cell, Row, Table};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

//metric recorded in each sweep cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    TotalReturn,
    MaxDrawdown,
    SharpeRatio,
    WinRate,
}

impl MetricKind {
    //parse metric kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "return" | "total_return" => Some(MetricKind::TotalReturn),
            "drawdown" | "max_drawdown" => Some(MetricKind::MaxDrawdown),
            "sharpe" | "sharpe_ratio" => Some(MetricKind::SharpeRatio),
            "win" | "win_rate" => Some(MetricKind::WinRate),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::TotalReturn => "Total Return",
            MetricKind::MaxDrawdown => "Max Drawdown",
            MetricKind::SharpeRatio => "Sharpe Ratio",
            MetricKind::WinRate => "Win Rate",
        }
    }

    fn select(&self, summary: &SummaryMetrics) -> f64 {
        match self {
            MetricKind::TotalReturn => summary.total_return,
            MetricKind::MaxDrawdown => summary.max_drawdown,
            MetricKind::SharpeRatio => summary.sharpe_ratio,
            MetricKind::WinRate => summary.win_rate,
        }
    }

    //drawdown is a cost, everything else a reward
    fn higher_is_better(&self) -> bool {
        !matches!(self, MetricKind::MaxDrawdown)
    }
}

//two named candidate value lists swept over their cartesian product
#[derive(Debug, Clone)]
pub struct SweepGrid {
    pub param1: Vec<f64>,
    pub param2: Vec<f64>,
}

//2-d sweep outcome; rows follow param1, columns param2, both sorted
//ascending for a reproducible layout
#[derive(Debug, Clone)]
pub struct SweepResult {
    pub param1_values: Vec<f64>,
    pub param2_values: Vec<f64>,
    pub metric: MetricKind,
    //values[row][col]; none marks an invalid combination or a cell
    //whose strategy/backtest/metric chain failed
    pub values: Vec<Vec<Option<f64>>>,
}

impl SweepResult {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row][col]
    }

    //best defined cell as (param1, param2, value), if any cell is defined
    pub fn best(&self) -> Option<(f64, f64, f64)> {
        let mut best: Option<(f64, f64, f64)> = None;

        for (row, row_cells) in self.values.iter().enumerate() {
            for (col, cell) in row_cells.iter().enumerate() {
                if let Some(value) = cell {
                    let better = match best {
                        None => true,
                        Some((_, _, current)) => {
                            if self.metric.higher_is_better() {
                                *value > current
                            } else {
                                *value < current
                            }
                        }
                    };
                    if better {
                        best = Some((self.param1_values[row], self.param2_values[col], *value));
                    }
                }
            }
        }

        best
    }

    //prints the matrix with param2 across the columns
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        let mut header = vec![Cell::new(self.metric.label())];
        for p2 in &self.param2_values {
            header.push(Cell::new(&format!("{}", p2)));
        }
        table.add_row(Row::new(header));

        for (row, p1) in self.param1_values.iter().enumerate() {
            let mut cells = vec![Cell::new(&format!("{}", p1))];
            for col in 0..self.param2_values.len() {
                let rendered = match self.values[row][col] {
                    Some(value) => format!("{:.4}", value),
                    None => "-".to_string(),
                };
                cells.push(Cell::new(&rendered));
            }
            table.add_row(Row::new(cells));
        }

        table.printstd();
    }
}

//sorts a candidate list ascending, dropping duplicates and
//non-finite entries
fn sorted_unique(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    out.dedup();
    out
}

//runs one independent simulation per grid cell and collects the chosen
//metric into a pre-allocated matrix
//
//cells are fully independent (fresh strategy, fresh engine) and are
//dispatched across the rayon worker pool one row at a time; a failing
//cell stays undefined and never aborts the sweep
pub fn run_sweep<V, F>(
    prices: &PriceSeries,
    grid: &SweepGrid,
    metric: MetricKind,
    config: &BacktestConfig,
    validity: V,
    build: F,
) -> SweepResult
where
    V: Fn(f64, f64) -> bool + Sync,
    F: Fn(f64, f64) -> Result<Box<dyn Strategy>, StrategyError> + Sync,
{
    let param1_values = sorted_unique(&grid.param1);
    let param2_values = sorted_unique(&grid.param2);

    let mut values = vec![vec![None; param2_values.len()]; param1_values.len()];

    values
        .par_iter_mut()
        .enumerate()
        .for_each(|(row, row_cells)| {
            let p1 = param1_values[row];
            for (col, cell) in row_cells.iter_mut().enumerate() {
                let p2 = param2_values[col];
                *cell = run_cell(prices, config, metric, p1, p2, &validity, &build);
            }
        });

    SweepResult {
        param1_values,
        param2_values,
        metric,
        values,
    }
}

fn run_cell<V, F>(
    prices: &PriceSeries,
    config: &BacktestConfig,
    metric: MetricKind,
    p1: f64,
    p2: f64,
    validity: &V,
    build: &F,
) -> Option<f64>
where
    V: Fn(f64, f64) -> bool + Sync,
    F: Fn(f64, f64) -> Result<Box<dyn Strategy>, StrategyError> + Sync,
{
    if !validity(p1, p2) {
        return None;
    }

    let strategy = build(p1, p2).ok()?;
    let signals = strategy.generate_signals(prices).ok()?;
    let result = BacktestEngine::new(config.clone())
        .run(prices, &signals)
        .ok()?;

    let value = metric.select(&result.summary);
    value.is_finite().then_some(value)
}
