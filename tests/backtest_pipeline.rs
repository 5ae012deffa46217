//end-to-end pipeline tests: csv -> strategy -> backtest -> metrics -> sweep

use bolsa::prelude::*;
use chrono::{DateTime, TimeZone, Utc};
use std::io::Write;

fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn price_series(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let timestamp = Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .unwrap()
                .checked_add_signed(chrono::Duration::days(i as i64))
                .unwrap();
            Bar::new_unchecked(timestamp, close, close + 1.0, close - 1.0, close, 1000.0)
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

#[test]
fn csv_to_metrics_pipeline() {
    //two up-then-down cycles so a short/long crossover trades
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    for i in 0..60u32 {
        let phase = (i / 15) % 2;
        let close = if phase == 0 {
            100.0 + (i % 15) as f64 * 2.0
        } else {
            128.0 - (i % 15) as f64 * 2.0
        };
        let date = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::days(i as i64))
            .unwrap();
        writeln!(
            file,
            "{},{},{},{},{},{}",
            date.format("%Y-%m-%d"),
            close,
            close + 1.0,
            close - 1.0,
            close,
            10_000
        )
        .unwrap();
    }

    let prices = load_csv(file.path()).unwrap();
    assert_eq!(prices.len(), 60);

    let strategy = SmaCrossoverStrategy::new(3, 8).unwrap();
    let signals = strategy.generate_signals(&prices).unwrap();
    assert_eq!(signals.len(), prices.len());

    let engine = BacktestEngine::new(BacktestConfig {
        initial_capital: 10000.0,
        ..BacktestConfig::default()
    });
    let result = engine.run(&prices, &signals).unwrap();

    assert_eq!(result.equity_curve.len(), prices.len());
    assert!((0.0..=1.0).contains(&result.summary.max_drawdown));
    assert_eq!(result.summary.num_trades, result.trades.len());

    //the ledger strictly alternates buy, sell, buy, ...
    for pair in result.trades.windows(2) {
        assert_ne!(pair[0].kind, pair[1].kind);
    }
    if let Some(first) = result.trades.first() {
        assert_eq!(first.kind, TradeKind::Buy);
    }
}

#[test]
fn worked_scenario_matches_reference_numbers() {
    let prices = price_series(&[100.0, 105.0, 110.0, 108.0, 120.0, 115.0]);
    let signals = SignalSeries::from_values(&prices.timestamps(), &[0, 1, 0, 0, -1, 0]);

    let engine = BacktestEngine::new(BacktestConfig {
        initial_capital: 10000.0,
        ..BacktestConfig::default()
    });
    let result = engine.run(&prices, &signals).unwrap();

    let equity: Vec<f64> = result.equity_curve.iter().map(|p| p.equity).collect();
    assert_eq!(
        equity,
        vec![10000.0, 9975.0, 10475.0, 10285.0, 11425.0, 11425.0]
    );

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[1].realized_pnl, Some(1425.0));
    assert!(result.summary.total_return > 0.0);
    assert_eq!(result.summary.num_winning_trades, 1);
    assert_eq!(result.summary.win_rate, 1.0);
}

#[test]
fn constant_capital_under_all_hold_signals() {
    let prices = price_series(&[100.0, 90.0, 110.0, 95.0, 130.0]);
    let signals = SignalSeries::from_values(&prices.timestamps(), &[0, 0, 0, 0, 0]);

    let engine = BacktestEngine::new(BacktestConfig {
        initial_capital: 7500.0,
        ..BacktestConfig::default()
    });
    let result = engine.run(&prices, &signals).unwrap();

    for point in &result.equity_curve {
        assert_eq!(point.equity, 7500.0);
    }
    assert_eq!(result.summary.sharpe_ratio, 0.0);
    assert_eq!(result.summary.total_return, 0.0);
}

#[test]
fn sweep_marks_invalid_cells_undefined() {
    let closes: Vec<f64> = (0..50)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0 + i as f64 * 0.5)
        .collect();
    let prices = price_series(&closes);

    let grid = SweepGrid {
        param1: vec![3.0, 10.0, 20.0],
        param2: vec![5.0, 15.0],
    };
    let result = run_sweep(
        &prices,
        &grid,
        MetricKind::TotalReturn,
        &BacktestConfig::default(),
        |short, long| short < long,
        |short, long| {
            SmaCrossoverStrategy::new(short as usize, long as usize)
                .map(|s| Box::new(s) as Box<dyn Strategy>)
        },
    );

    //rows 3, 10, 20 against columns 5, 15
    for (row, &short) in result.param1_values.iter().enumerate() {
        for (col, &long) in result.param2_values.iter().enumerate() {
            let cell = result.get(row, col);
            if short < long {
                assert!(cell.is_some(), "cell ({}, {}) should be defined", short, long);
            } else {
                assert!(cell.is_none(), "cell ({}, {}) should be undefined", short, long);
            }
        }
    }
}

struct AlternatingPredictor;

impl Predictor for AlternatingPredictor {
    fn predict(&self, prices: &PriceSeries) -> Result<SignalSeries, PredictorError> {
        let values: Vec<i8> = (0..prices.len())
            .map(|i| match i % 10 {
                2 => 1,
                7 => -1,
                _ => 0,
            })
            .collect();
        Ok(SignalSeries::from_values(&prices.timestamps(), &values))
    }
}

#[test]
fn model_strategy_runs_through_the_engine() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 9) as f64).collect();
    let prices = price_series(&closes);

    let strategy = ModelStrategy::new(AlternatingPredictor);
    let signals = strategy.generate_signals(&prices).unwrap();

    let engine = BacktestEngine::new(BacktestConfig::default());
    let result = engine.run(&prices, &signals).unwrap();

    assert_eq!(result.equity_curve.len(), prices.len());
    assert!(!result.trades.is_empty());
}

#[test]
fn misaligned_signals_realign_with_hold_fill() {
    let prices = price_series(&[100.0, 101.0, 102.0, 103.0]);

    //signal series over a different timestamp set
    let foreign = SignalSeries::new(vec![
        SignalPoint {
            timestamp: ts(2),
            value: 1,
        },
        SignalPoint {
            timestamp: ts(25),
            value: -1,
        },
    ]);

    let aligned = foreign.align_to(&prices);
    assert_eq!(aligned.len(), prices.len());

    let engine = BacktestEngine::new(BacktestConfig::default());
    let result = engine.run(&prices, &aligned).unwrap();

    //the buy at day 2 happens, the foreign sell is dropped, the
    //position stays open to the end
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].kind, TradeKind::Buy);
}
