use crate::engine::BacktestConfig;
use crate::strategy::rsi_macd::RsiMacdStrategy;
use crate::strategy::sma_crossover::SmaCrossoverStrategy;
use crate::strategy::{Strategy, StrategyError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    SmaCrossover,
    RsiMacd,
}

impl StrategyType {
    //parse strategy type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sma" | "sma_crossover" => Some(StrategyType::SmaCrossover),
            "rsi-macd" | "rsi_macd" => Some(StrategyType::RsiMacd),
            _ => None,
        }
    }
}

//sma crossover strategy parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmaParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        SmaParams {
            short_window: 50,
            long_window: 200,
        }
    }
}

//rsi + macd strategy parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiMacdParams {
    pub rsi_buy_threshold: f64,
    pub rsi_sell_threshold: f64,
}

impl Default for RsiMacdParams {
    fn default() -> Self {
        RsiMacdParams {
            rsi_buy_threshold: 30.0,
            rsi_sell_threshold: 70.0,
        }
    }
}

//strategy-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StrategyParams {
    Sma(SmaParams),
    RsiMacd(RsiMacdParams),
}

//complete backtest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfiguration {
    //data
    pub data_path: PathBuf,

    //simulation settings
    pub initial_capital: f64,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,

    //strategy
    pub strategy_type: StrategyType,
    pub strategy_params: StrategyParams,

    //optional output paths
    pub output_equity_csv: Option<PathBuf>,
    pub output_trades_csv: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: PathBuf::from("data.csv"),
            initial_capital: 10000.0,
            stop_loss_pct: None,
            take_profit_pct: None,
            strategy_type: StrategyType::SmaCrossover,
            strategy_params: StrategyParams::Sma(SmaParams::default()),
            output_equity_csv: None,
            output_trades_csv: None,
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //engine settings carried by this configuration
    pub fn engine_config(&self) -> BacktestConfig {
        BacktestConfig {
            initial_capital: self.initial_capital,
            stop_loss_pct: self.stop_loss_pct,
            take_profit_pct: self.take_profit_pct,
        }
    }

    //instantiates the configured strategy
    //model-backed strategies need a live predictor and are wired up by
    //the caller instead
    pub fn build_strategy(&self) -> Result<Box<dyn Strategy>, StrategyError> {
        match &self.strategy_params {
            StrategyParams::Sma(params) => Ok(Box::new(SmaCrossoverStrategy::new(
                params.short_window,
                params.long_window,
            )?)),
            StrategyParams::RsiMacd(params) => Ok(Box::new(RsiMacdStrategy::new(
                params.rsi_buy_threshold,
                params.rsi_sell_threshold,
            )?)),
        }
    }
}
