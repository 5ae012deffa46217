use serde::{Deserialize, Serialize};

//open long position held during a simulation run
//entry_price is some iff quantity > 0; no short or margin positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    //number of shares held, never negative
    pub quantity: u64,

    //price the open quantity was bought at
    pub entry_price: Option<f64>,
}

impl Position {
    //creates a new flat position
    pub fn flat() -> Self {
        Position {
            quantity: 0,
            entry_price: None,
        }
    }

    //returns true if no position is open
    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    //opens a long position at the given price
    pub fn open(&mut self, quantity: u64, price: f64) {
        self.quantity = quantity;
        self.entry_price = Some(price);
    }

    //closes the open position at the given price and returns the
    //realized pnl: (exit - entry) * quantity
    pub fn close(&mut self, price: f64) -> f64 {
        let entry = self.entry_price.unwrap_or(price);
        let realized = (price - entry) * self.quantity as f64;

        self.quantity = 0;
        self.entry_price = None;

        realized
    }

    //mark-to-market value of the open quantity at the given price
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    //return since entry as a fraction of the entry price
    pub fn open_return(&self, price: f64) -> Option<f64> {
        self.entry_price.map(|entry| (price - entry) / entry)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_position_is_flat() {
        let position = Position::flat();
        assert!(position.is_flat());
        assert_eq!(position.entry_price, None);
    }

    #[test]
    fn open_then_close_realizes_pnl() {
        let mut position = Position::flat();
        position.open(95, 105.0);

        assert!(!position.is_flat());
        assert_relative_eq!(position.market_value(110.0), 95.0 * 110.0);

        let realized = position.close(120.0);
        assert_relative_eq!(realized, (120.0 - 105.0) * 95.0);
        assert!(position.is_flat());
        assert_eq!(position.entry_price, None);
    }

    #[test]
    fn open_return_tracks_entry() {
        let mut position = Position::flat();
        assert_eq!(position.open_return(100.0), None);

        position.open(10, 100.0);
        assert_relative_eq!(position.open_return(98.0).unwrap(), -0.02);
        assert_relative_eq!(position.open_return(103.0).unwrap(), 0.03);
    }
}
