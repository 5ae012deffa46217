pub mod summary;
pub mod timeseries;

pub use summary::{sharpe_ratio, SummaryMetrics, PERIODS_PER_YEAR};
pub use timeseries::{bar_returns, build_equity_curve, max_drawdown, EquityPoint};
