//! Bidirectional conversion engine.
//!
//! Keeps two textual amount fields (CZK and foreign) and a selected currency
//! code mutually consistent with the active fixing rate, while tolerating
//! free-form keystrokes. All transitions are synchronous; events must be
//! applied one at a time.

use crate::core::feed::{CurrencyRate, DailyRateData};

/// Computed amounts are displayed with exactly this many decimal places.
pub const DISPLAY_DECIMALS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyOption {
    pub code: String,
    pub name: String,
}

/// Options offered before any fixing data has loaded.
pub fn default_currency_options() -> Vec<CurrencyOption> {
    vec![
        CurrencyOption {
            code: "CZK".to_string(),
            name: "Czech Koruna".to_string(),
        },
        CurrencyOption {
            code: "EUR".to_string(),
            name: "Euro".to_string(),
        },
    ]
}

/// The conversion state machine. One owner applies events in arrival order;
/// there is no interior mutability.
#[derive(Debug, Clone)]
pub struct Converter {
    daily_rates: Option<DailyRateData>,
    selected: String,
    base_text: String,
    foreign_text: String,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Converter {
            daily_rates: None,
            selected: "EUR".to_string(),
            base_text: "100".to_string(),
            foreign_text: "100".to_string(),
        }
    }

    /// The CZK field text.
    pub fn base_text(&self) -> &str {
        &self.base_text
    }

    /// The foreign-currency field text.
    pub fn foreign_text(&self) -> &str {
        &self.foreign_text
    }

    pub fn selected_code(&self) -> &str {
        &self.selected
    }

    /// The fixing row matching the selected code, if any. Absence is a valid
    /// state: the two fields simply stop recomputing each other.
    pub fn resolved_rate(&self) -> Option<&CurrencyRate> {
        self.daily_rates
            .as_ref()
            .and_then(|daily| daily.rates.iter().find(|rate| rate.code == self.selected))
    }

    pub fn daily_rates(&self) -> Option<&DailyRateData> {
        self.daily_rates.as_ref()
    }

    /// Selectable currencies, sorted by code. Falls back to the static list
    /// until fixing data loads.
    pub fn currency_options(&self) -> Vec<CurrencyOption> {
        match &self.daily_rates {
            Some(daily) => {
                let mut options: Vec<CurrencyOption> = daily
                    .rates
                    .iter()
                    .map(|rate| CurrencyOption {
                        code: rate.code.clone(),
                        name: rate.currency.clone(),
                    })
                    .collect();
                options.sort_by(|a, b| a.code.cmp(&b.code));
                options
            }
            None => default_currency_options(),
        }
    }

    /// A fixing snapshot loaded (or reloaded). Recomputes the foreign field
    /// from the base field iff the resolved rate record changed.
    pub fn load_rates(&mut self, daily: DailyRateData) {
        let before = self.resolved_rate().cloned();
        self.daily_rates = Some(daily);
        self.apply_rate_change(before);
    }

    /// The user picked a different currency. Re-resolves the rate and syncs
    /// the foreign field when the resolution actually changed.
    pub fn select_currency(&mut self, code: &str) {
        let before = self.resolved_rate().cloned();
        self.selected = code.to_string();
        self.apply_rate_change(before);
    }

    /// A keystroke in the base (CZK) field. The sanitized text always lands
    /// in the field; the foreign field follows only when the text parses and
    /// a rate is resolved.
    pub fn edit_base(&mut self, raw: &str) {
        self.base_text = clamp_decimals(raw, DISPLAY_DECIMALS);
        if let (Some(value), Some(rate)) =
            (parse_amount(&self.base_text), self.resolved_rate().cloned())
        {
            self.foreign_text = format_amount(value * rate.amount as f64 / rate.rate);
        }
    }

    /// A keystroke in the foreign field; mirror image of [`Self::edit_base`].
    pub fn edit_foreign(&mut self, raw: &str) {
        self.foreign_text = clamp_decimals(raw, DISPLAY_DECIMALS);
        if let (Some(value), Some(rate)) = (
            parse_amount(&self.foreign_text),
            self.resolved_rate().cloned(),
        ) {
            self.base_text = format_amount(value * rate.rate / rate.amount as f64);
        }
    }

    // Fires only on a change of the resolved rate record. Base edits never
    // route through here, so there is no feedback loop between the fields.
    fn apply_rate_change(&mut self, before: Option<CurrencyRate>) {
        let Some(rate) = self.resolved_rate().cloned() else {
            return;
        };
        if before.as_ref() == Some(&rate) {
            return;
        }
        if let Some(value) = parse_amount(&self.base_text) {
            self.foreign_text = format_amount(value * rate.amount as f64 / rate.rate);
        }
    }
}

/// Parses field text to a number, accepting `,` as a decimal separator.
/// Rust's float parser also accepts "inf" and "nan"; those are not amounts.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.replace(',', ".").parse().ok().filter(|v: &f64| v.is_finite())
}

/// Fixed 4-decimal display format for computed amounts.
pub fn format_amount(value: f64) -> String {
    format!("{value:.precision$}", precision = DISPLAY_DECIMALS)
}

/// Truncates raw field input to an optional sign, an integer part, and at
/// most `max_decimals` digits after a single `.` or `,` separator.
///
/// A trailing separator survives so the field stays editable mid-keystroke.
/// Input without a leading numeric prefix passes through verbatim; it simply
/// won't parse, and no recompute fires.
fn clamp_decimals(raw: &str, max_decimals: usize) -> String {
    let mut chars = raw.chars().peekable();
    let mut out = String::new();

    if chars.peek() == Some(&'-') {
        out.push('-');
        chars.next();
    }

    let mut int_digits = 0;
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        out.push(c);
        chars.next();
        int_digits += 1;
    }
    if int_digits == 0 {
        return raw.to_string();
    }

    if let Some(&sep) = chars.peek()
        && (sep == '.' || sep == ',')
    {
        out.push(sep);
        chars.next();
        let mut frac_digits = 0;
        while let Some(&c) = chars.peek() {
            if !c.is_ascii_digit() || frac_digits == max_decimals {
                break;
            }
            out.push(c);
            chars.next();
            frac_digits += 1;
        }
    }

    out
}
