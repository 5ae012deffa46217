pub mod sweep;

pub use sweep::{run_sweep, MetricKind, SweepGrid, SweepResult};
