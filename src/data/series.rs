use crate::data::bar::Bar;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("Price series is empty")]
    Empty,
    #[error("Duplicate timestamp {timestamp} at index {index}")]
    DuplicateTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },
    #[error("Timestamp {timestamp} at index {index} is not in increasing order")]
    NonMonotonicTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },
}

//an immutable, time-ordered series of ohlcv bars
//timestamps are strictly increasing and unique, validated at construction
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    //creates a price series, rejecting empty input and any
    //duplicate or out-of-order timestamp
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for i in 1..bars.len() {
            let prev = bars[i - 1].timestamp;
            let curr = bars[i].timestamp;

            if curr == prev {
                return Err(SeriesError::DuplicateTimestamp {
                    index: i,
                    timestamp: curr,
                });
            }
            if curr < prev {
                return Err(SeriesError::NonMonotonicTimestamp {
                    index: i,
                    timestamp: curr,
                });
            }
        }

        Ok(PriceSeries { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> &Bar {
        &self.bars[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    //first and last bar timestamps
    pub fn date_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.bars.first().map(|b| b.timestamp).unwrap_or_default(),
            self.bars.last().map(|b| b.timestamp).unwrap_or_default(),
        )
    }
}
