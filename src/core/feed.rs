//! Daily fixing feed: data model, text parser and the provider seam.
//!
//! The CNB publishes its fixing as plain text: a free-form date line, a
//! `|`-delimited header row, then one `|`-delimited row per currency.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One currency row of the daily fixing.
///
/// `rate` is the CZK equivalent of `amount` units of the foreign currency,
/// e.g. `amount: 100, code: "JPY", rate: 14.301` reads "100 JPY = 14.301 CZK".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub country: String,
    pub currency: String,
    pub amount: u32,
    pub code: String,
    pub rate: f64,
}

/// A parsed fixing snapshot. Rows keep the feed's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRateData {
    pub date: NaiveDate,
    pub rates: Vec<CurrencyRate>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed needs a date line and a header line, got {lines} non-empty line(s)")]
    TooShort { lines: usize },
    #[error("unrecognized fixing date: '{0}'")]
    BadDate(String),
    #[error("feed header is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("row '{row}' has {found} field(s), header declares {expected}")]
    RowWidth {
        row: String,
        expected: usize,
        found: usize,
    },
    #[error("row '{row}' contains invalid {field}: '{value}'")]
    InvalidField {
        row: String,
        field: &'static str,
        value: String,
    },
}

/// Source of the daily fixing, typically backed by the CNB endpoint.
#[async_trait]
pub trait RateFeedProvider: Send + Sync {
    async fn fetch_daily(&self) -> Result<DailyRateData>;
}

/// Column positions resolved from the header row. The feed's column order is
/// not part of its contract, only the column names are.
struct ColumnMap {
    width: usize,
    country: usize,
    currency: usize,
    amount: usize,
    code: usize,
    rate: usize,
}

impl ColumnMap {
    fn from_header(header: &str) -> Result<Self, FeedError> {
        let names: Vec<String> = header
            .split('|')
            .map(|name| name.trim().to_lowercase())
            .collect();

        let find = |column: &'static str| {
            names
                .iter()
                .position(|name| name == column)
                .ok_or(FeedError::MissingColumn(column))
        };

        Ok(ColumnMap {
            width: names.len(),
            country: find("country")?,
            currency: find("currency")?,
            amount: find("amount")?,
            code: find("code")?,
            rate: find("rate")?,
        })
    }
}

/// Parses the raw fixing text into a dated list of currency rates.
///
/// Blank lines are skipped, CRLF and LF are both accepted. A feed with zero
/// data rows is valid and yields an empty rate list.
pub fn parse_daily_feed(raw: &str) -> Result<DailyRateData, FeedError> {
    let lines: Vec<&str> = raw.lines().filter(|line| !line.trim().is_empty()).collect();

    if lines.len() < 2 {
        return Err(FeedError::TooShort { lines: lines.len() });
    }

    let date = parse_fixing_date(lines[0])?;
    let columns = ColumnMap::from_header(lines[1])?;

    let mut rates = Vec::with_capacity(lines.len() - 2);
    for row in &lines[2..] {
        rates.push(parse_row(row, &columns)?);
    }

    Ok(DailyRateData { date, rates })
}

/// The date line looks like `13 Oct 2025 #199`; the trailing fixing ordinal
/// is ignored.
fn parse_fixing_date(line: &str) -> Result<NaiveDate, FeedError> {
    let date_part: Vec<&str> = line.split_whitespace().take(3).collect();
    NaiveDate::parse_from_str(&date_part.join(" "), "%d %b %Y")
        .map_err(|_| FeedError::BadDate(line.to_string()))
}

fn parse_row(row: &str, columns: &ColumnMap) -> Result<CurrencyRate, FeedError> {
    let fields: Vec<&str> = row.split('|').map(str::trim).collect();
    if fields.len() != columns.width {
        return Err(FeedError::RowWidth {
            row: row.to_string(),
            expected: columns.width,
            found: fields.len(),
        });
    }

    let invalid = |field: &'static str, value: &str| FeedError::InvalidField {
        row: row.to_string(),
        field,
        value: value.to_string(),
    };

    let amount_raw = fields[columns.amount];
    if !is_integer(amount_raw) {
        return Err(invalid("amount", amount_raw));
    }
    let amount = amount_raw
        .parse()
        .map_err(|_| invalid("amount", amount_raw))?;

    let rate_raw = fields[columns.rate];
    if !is_decimal(rate_raw) {
        return Err(invalid("rate", rate_raw));
    }
    let rate = rate_raw.parse().map_err(|_| invalid("rate", rate_raw))?;

    Ok(CurrencyRate {
        country: fields[columns.country].to_string(),
        currency: fields[columns.currency].to_string(),
        amount,
        code: fields[columns.code].to_string(),
        rate,
    })
}

fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Digits with an optional single `.` fraction, matching the feed's native
/// number format. No sign, no thousands separators.
fn is_decimal(value: &str) -> bool {
    match value.split_once('.') {
        Some((int, frac)) => is_integer(int) && is_integer(frac),
        None => is_integer(value),
    }
}
