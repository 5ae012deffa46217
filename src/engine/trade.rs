use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Buy,
    Sell,
}

//immutable record of one executed trade
//the ledger strictly alternates buy, sell, buy, ... because the
//simulation holds at most one open position at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: DateTime<Utc>,
    pub kind: TradeKind,
    pub quantity: u64,
    pub price: f64,
    //present only on sell trades: (exit - entry) * quantity
    pub realized_pnl: Option<f64>,
}

impl Trade {
    pub fn buy(timestamp: DateTime<Utc>, quantity: u64, price: f64) -> Self {
        Trade {
            timestamp,
            kind: TradeKind::Buy,
            quantity,
            price,
            realized_pnl: None,
        }
    }

    pub fn sell(timestamp: DateTime<Utc>, quantity: u64, price: f64, realized_pnl: f64) -> Self {
        Trade {
            timestamp,
            kind: TradeKind::Sell,
            quantity,
            price,
            realized_pnl: Some(realized_pnl),
        }
    }

    //returns true for a sell that closed above its entry
    pub fn is_winner(&self) -> bool {
        self.realized_pnl.map(|pnl| pnl > 0.0).unwrap_or(false)
    }
}
