//! CSV parsing for the `date,price[,...]` history table.
//!
//! Rules:
//! - the first line is a header and is skipped
//! - rows with fewer than two fields are skipped, not errors
//! - fields past the second are ignored
//! - quotes have no special meaning; a stray `"` affects only its own line
//! - rows whose date or price cannot be parsed, or whose price is not a
//!   finite positive number, are dropped
//!
//! The surviving rows are sorted newest first.

use super::provider::DataError;
use crate::domain::{PriceHistory, PricePoint};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parsed history plus counts of what was left out.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub history: PriceHistory,
    /// Rows with fewer than two fields.
    pub skipped_short: usize,
    /// Rows with an unparsable date, unparsable price, or non-positive price.
    pub dropped_invalid: usize,
}

/// Parse the full text of a history table.
///
/// Only a structural failure of the CSV reader (for example invalid UTF-8
/// in a field) is an error; malformed rows are counted and skipped.
pub fn parse_history(text: &str) -> Result<ParseReport, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.trim().as_bytes());

    let mut points = Vec::new();
    let mut skipped_short = 0;
    let mut dropped_invalid = 0;

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DataError::ParseFailure(e.to_string()))?;

        let (Some(date_field), Some(price_field)) = (record.get(0), record.get(1)) else {
            skipped_short += 1;
            continue;
        };

        match (parse_date(date_field), parse_price(price_field)) {
            (Some(date), Some(price)) if PricePoint::new(date, price).is_valid() => {
                points.push(PricePoint::new(date, price));
            }
            _ => {
                // header is line 1
                tracing::debug!(line = i + 2, date_field, price_field, "dropping history row");
                dropped_invalid += 1;
            }
        }
    }

    Ok(ParseReport {
        history: PriceHistory::new(points),
        skipped_short,
        dropped_invalid,
    })
}

/// Parse a calendar date, accepting ISO dates, slash dates, and
/// timestamps (the time part is discarded).
pub fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(field, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(field, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(field).ok().map(|dt| dt.date_naive()))
}

/// Parse a USD price; a leading `$` is tolerated.
fn parse_price(field: &str) -> Option<f64> {
    field.trim().trim_start_matches('$').parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_and_sorts_newest_first() {
        let text = "date,price\n2024-06-01,59000\n2024-06-03,61000\n2024-06-02,60000\n";
        let report = parse_history(text).unwrap();
        let prices: Vec<f64> = report.history.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![61_000.0, 60_000.0, 59_000.0]);
        assert_eq!(report.skipped_short, 0);
        assert_eq!(report.dropped_invalid, 0);
    }

    #[test]
    fn header_only_is_empty() {
        let report = parse_history("date,price\n").unwrap();
        assert!(report.history.is_empty());
        assert!(parse_history("").unwrap().history.is_empty());
    }

    #[test]
    fn short_lines_are_skipped_and_parsing_continues() {
        let text = "date,price\n2024-01-01,100\njunk\n2024-01-02,200\n2024-01-03\n2024-01-04,400\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.len(), 3);
        assert_eq!(report.skipped_short, 2);
        assert_eq!(report.history.latest().unwrap().price, 400.0);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let text = "date,price,volume,source\n2024-01-01,42000.5,123,cg\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.history.latest().unwrap().price, 42_000.5);
    }

    #[test]
    fn non_numeric_price_row_is_dropped() {
        let text = "date,price\n2024-01-01,100\n2024-01-02,n/a\n2024-01-03,\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.dropped_invalid, 2);
        assert!(report.history.iter().all(|p| p.price.is_finite()));
    }

    #[test]
    fn non_positive_and_bad_date_rows_are_dropped() {
        let text = "date,price\n2024-01-01,0\n2024-01-02,-5\nyesterday,100\n2024-01-04,NaN\n2024-01-05,7\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.dropped_invalid, 4);
    }

    #[test]
    fn whitespace_and_crlf_are_tolerated() {
        let text = "date , price\r\n 2024-01-01 , 100 \r\n2024-01-02,200\r\n\r\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.history.latest().unwrap().date, ymd(2024, 1, 2));
    }

    #[test]
    fn stray_quote_only_affects_its_own_line() {
        let text = "date,price\n2024-01-01,100\n\"oops\n2024-01-02,200\n2024-01-03,300\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.len(), 3);
        assert_eq!(report.skipped_short, 1);
        assert_eq!(report.history.latest().unwrap().price, 300.0);

        let text = "date,price\n2024-01-01,\"100\n2024-01-02,200\n2024-01-03,300\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.len(), 2);
        assert_eq!(report.dropped_invalid, 1);
    }

    #[test]
    fn dollar_prefixed_price() {
        let report = parse_history("date,price\n2024-01-01,$61250.75\n").unwrap();
        assert_eq!(report.history.latest().unwrap().price, 61_250.75);
    }

    #[test]
    fn date_formats() {
        assert_eq!(parse_date("2024-06-02"), Some(ymd(2024, 6, 2)));
        assert_eq!(parse_date("2024/06/02"), Some(ymd(2024, 6, 2)));
        assert_eq!(parse_date("06/02/2024"), Some(ymd(2024, 6, 2)));
        assert_eq!(parse_date("2024-06-02 23:59:59"), Some(ymd(2024, 6, 2)));
        assert_eq!(parse_date("2024-06-02T08:00:00"), Some(ymd(2024, 6, 2)));
        assert_eq!(parse_date("2024-06-02T08:00:00Z"), Some(ymd(2024, 6, 2)));
        assert_eq!(parse_date("June 2nd"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn sorting_compares_dates_not_strings() {
        // slash dates would sort wrongly as strings
        let text = "date,price\n12/31/2023,1\n01/01/2024,2\n";
        let report = parse_history(text).unwrap();
        assert_eq!(report.history.latest().unwrap().date, ymd(2024, 1, 1));
    }
}
