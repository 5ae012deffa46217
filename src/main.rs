use anyhow::{Context, Result};
use bolsa::prelude::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bolsa")]
#[command(about = "A Rust-based signal backtesting and strategy optimization engine for stocks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a single backtest
    Run {
        //path to csv data file (timestamp,open,high,low,close,volume)
        #[arg(long)]
        data: PathBuf,

        //json configuration file; overrides the strategy flags below
        #[arg(long)]
        config: Option<PathBuf>,

        //strategy type (sma, rsi-macd)
        #[arg(long, default_value = "sma")]
        strategy: String,

        //short sma window (for sma strategy)
        #[arg(long)]
        short: Option<usize>,

        //long sma window (for sma strategy)
        #[arg(long)]
        long: Option<usize>,

        //rsi buy threshold (for rsi-macd strategy)
        #[arg(long)]
        rsi_buy: Option<f64>,

        //rsi sell threshold (for rsi-macd strategy)
        #[arg(long)]
        rsi_sell: Option<f64>,

        //initial capital
        #[arg(long, default_value = "10000")]
        capital: f64,

        //stop-loss as a negative fraction (eg -0.05)
        #[arg(long)]
        stop_loss: Option<f64>,

        //take-profit as a positive fraction (eg 0.1)
        #[arg(long)]
        take_profit: Option<f64>,

        //output path for equity curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,

        //output path for trades csv
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,
    },

    //sweep two strategy parameters over a grid
    Sweep {
        //path to csv data file
        #[arg(long)]
        data: PathBuf,

        //strategy type (sma, rsi-macd)
        #[arg(long, default_value = "sma")]
        strategy: String,

        //first parameter candidates, comma separated
        //short windows for sma, buy thresholds for rsi-macd
        #[arg(long)]
        param1: String,

        //second parameter candidates, comma separated
        //long windows for sma, sell thresholds for rsi-macd
        #[arg(long)]
        param2: String,

        //metric to record per cell (return, drawdown, sharpe, win)
        #[arg(long, default_value = "sharpe")]
        metric: String,

        //initial capital
        #[arg(long, default_value = "10000")]
        capital: f64,

        //stop-loss as a negative fraction
        #[arg(long)]
        stop_loss: Option<f64>,

        //take-profit as a positive fraction
        #[arg(long)]
        take_profit: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            config,
            strategy,
            short,
            long,
            rsi_buy,
            rsi_sell,
            capital,
            stop_loss,
            take_profit,
            output_equity_csv,
            output_trades_csv,
        } => {
            let configuration = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)
                    .context(format!("Failed to load configuration from {:?}", path))?,
                None => BacktestConfiguration {
                    data_path: data.clone(),
                    initial_capital: capital,
                    stop_loss_pct: stop_loss,
                    take_profit_pct: take_profit,
                    strategy_type: StrategyType::parse(&strategy)
                        .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", strategy))?,
                    strategy_params: strategy_params_from_flags(
                        &strategy, short, long, rsi_buy, rsi_sell,
                    )?,
                    output_equity_csv,
                    output_trades_csv,
                },
            };

            run_backtest(data, configuration)?;
        }
        Commands::Sweep {
            data,
            strategy,
            param1,
            param2,
            metric,
            capital,
            stop_loss,
            take_profit,
        } => {
            run_parameter_sweep(
                data,
                strategy,
                param1,
                param2,
                metric,
                capital,
                stop_loss,
                take_profit,
            )?;
        }
    }

    Ok(())
}

fn strategy_params_from_flags(
    strategy: &str,
    short: Option<usize>,
    long: Option<usize>,
    rsi_buy: Option<f64>,
    rsi_sell: Option<f64>,
) -> Result<StrategyParams> {
    let strategy_type = StrategyType::parse(strategy)
        .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", strategy))?;

    let params = match strategy_type {
        StrategyType::SmaCrossover => {
            let defaults = SmaParams::default();
            StrategyParams::Sma(SmaParams {
                short_window: short.unwrap_or(defaults.short_window),
                long_window: long.unwrap_or(defaults.long_window),
            })
        }
        StrategyType::RsiMacd => {
            let defaults = RsiMacdParams::default();
            StrategyParams::RsiMacd(RsiMacdParams {
                rsi_buy_threshold: rsi_buy.unwrap_or(defaults.rsi_buy_threshold),
                rsi_sell_threshold: rsi_sell.unwrap_or(defaults.rsi_sell_threshold),
            })
        }
    };

    Ok(params)
}

fn run_backtest(data_path: PathBuf, configuration: BacktestConfiguration) -> Result<()> {
    println!("Bolsa Backtesting Engine");
    println!("========================\n");

    //load data
    println!("Loading data from {:?}...", data_path);
    let prices =
        load_csv(&data_path).context(format!("Failed to load data from {:?}", data_path))?;

    let (start, end) = prices.date_range();
    println!("Loaded {} bars", prices.len());
    println!("Date range: {} to {}\n", start, end);

    //create strategy
    let strategy = configuration
        .build_strategy()
        .map_err(|e| anyhow::anyhow!("Invalid strategy configuration: {}", e))?;

    println!("Strategy: {}", strategy.name());
    println!("Initial capital: ${:.2}", configuration.initial_capital);
    if let Some(stop) = configuration.stop_loss_pct {
        println!("Stop-loss: {:.1}%", stop * 100.0);
    }
    if let Some(take) = configuration.take_profit_pct {
        println!("Take-profit: {:.1}%", take * 100.0);
    }
    println!();

    //generate signals and run the simulation
    println!("Running backtest...\n");
    let signals = strategy
        .generate_signals(&prices)
        .map_err(|e| anyhow::anyhow!("Signal generation failed: {}", e))?;

    let engine = BacktestEngine::new(configuration.engine_config());
    let result = engine
        .run(&prices, &signals)
        .map_err(|e| anyhow::anyhow!("Backtest failed: {}", e))?;

    //display results
    println!("Backtest Results");
    println!("================\n");
    result.summary.pretty_print_table();

    //save outputs if requested
    if let Some(equity_path) = &configuration.output_equity_csv {
        save_equity_csv(&result.equity_curve, equity_path)?;
        println!("\nEquity curve saved to {:?}", equity_path);
    }

    if let Some(trades_path) = &configuration.output_trades_csv {
        save_trades_csv(&result.trades, trades_path)?;
        println!("Trades saved to {:?}", trades_path);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_parameter_sweep(
    data_path: PathBuf,
    strategy_name: String,
    param1: String,
    param2: String,
    metric_name: String,
    capital: f64,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
) -> Result<()> {
    println!("Bolsa Parameter Sweep");
    println!("=====================\n");

    let prices =
        load_csv(&data_path).context(format!("Failed to load data from {:?}", data_path))?;
    println!("Loaded {} bars", prices.len());

    let strategy_type = StrategyType::parse(&strategy_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", strategy_name))?;
    let metric = MetricKind::parse(&metric_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown metric: {}", metric_name))?;

    let grid = SweepGrid {
        param1: parse_value_list(&param1)?,
        param2: parse_value_list(&param2)?,
    };

    let config = BacktestConfig {
        initial_capital: capital,
        stop_loss_pct: stop_loss,
        take_profit_pct: take_profit,
    };

    println!(
        "Sweeping {} x {} combinations of {:?} on {}...\n",
        grid.param1.len(),
        grid.param2.len(),
        strategy_type,
        metric.label()
    );

    let result = match strategy_type {
        StrategyType::SmaCrossover => run_sweep(
            &prices,
            &grid,
            metric,
            &config,
            |short, long| short < long,
            |short, long| {
                SmaCrossoverStrategy::new(short as usize, long as usize)
                    .map(|s| Box::new(s) as Box<dyn Strategy>)
            },
        ),
        StrategyType::RsiMacd => run_sweep(
            &prices,
            &grid,
            metric,
            &config,
            |_, _| true,
            |buy, sell| {
                RsiMacdStrategy::new(buy, sell).map(|s| Box::new(s) as Box<dyn Strategy>)
            },
        ),
    };

    result.pretty_print_table();

    if let Some((p1, p2, value)) = result.best() {
        println!("\nBest cell: param1={}, param2={}, {}={:.4}", p1, p2, metric.label(), value);
    } else {
        println!("\nNo defined cells in the sweep.");
    }

    Ok(())
}

//parses a comma-separated list of numeric candidates
fn parse_value_list(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .context(format!("Invalid numeric value '{}'", part))
        })
        .collect()
}

fn save_equity_csv(equity_curve: &[EquityPoint], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "timestamp,equity,drawdown,returns")?;

    for point in equity_curve {
        writeln!(
            file,
            "{},{},{},{}",
            point.timestamp.to_rfc3339(),
            point.equity,
            point.drawdown,
            point.returns
        )?;
    }

    Ok(())
}

fn save_trades_csv(trades: &[Trade], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(file, "timestamp,kind,quantity,price,realized_pnl")?;

    for trade in trades {
        writeln!(
            file,
            "{},{:?},{},{},{}",
            trade.timestamp.to_rfc3339(),
            trade.kind,
            trade.quantity,
            trade.price,
            trade
                .realized_pnl
                .map(|pnl| pnl.to_string())
                .unwrap_or_default()
        )?;
    }

    Ok(())
}
