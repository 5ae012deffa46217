use crate::data::bar::Bar;
use crate::data::series::PriceSeries;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

//parses either an rfc3339 timestamp or a plain calendar date
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

//loads a price series from a csv file with columns
//timestamp,open,high,low,close,volume
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        //parse timestamp
        let timestamp = parse_timestamp(&record.timestamp).context(format!(
            "Failed to parse timestamp '{}' at line {}",
            record.timestamp,
            index + 2
        ))?;

        //create bar
        let bar = Bar::new_unchecked(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        );

        bars.push(bar);
    }

    //sort by timestamp to ensure chronological order
    bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let series = PriceSeries::new(bars).context(format!("Invalid price data in {:?}", path))?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_csv_with_plain_dates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        writeln!(file, "2024-01-02,10.0,11.0,9.5,10.5,1000").unwrap();
        writeln!(file, "2024-01-01,9.0,10.0,8.5,9.5,900").unwrap();

        let series = load_csv(file.path()).unwrap();

        //rows are sorted chronologically regardless of file order
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![9.5, 10.5]);
    }

    #[test]
    fn loads_csv_with_rfc3339_timestamps() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        writeln!(file, "2024-01-01T14:30:00+00:00,9.0,10.0,8.5,9.5,900").unwrap();

        let series = load_csv(file.path()).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        writeln!(file, "2024-01-01,9.0,10.0,8.5,9.5,900").unwrap();
        writeln!(file, "2024-01-01,9.0,10.0,8.5,9.5,900").unwrap();

        assert!(load_csv(file.path()).is_err());
    }

    #[test]
    fn unparseable_timestamp_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        writeln!(file, "01/02/2024,9.0,10.0,8.5,9.5,900").unwrap();

        assert!(load_csv(file.path()).is_err());
    }
}
