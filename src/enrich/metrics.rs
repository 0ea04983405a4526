//! Per-record temporal and financial metrics.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::config::SECONDS_PER_DAY;
use crate::rates::ExchangeRate;

static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\d.]+)([A-Za-z]+)$").expect("price pattern is a valid regex")
});

/// Whole days from the start of `today` (UTC) until `end`, rounded up.
///
/// `end` at 12:00 four days after today gives 5. Negative once the end has
/// passed.
pub fn days_remaining(end: DateTime<Utc>, today: NaiveDate) -> i64 {
    let start = today.and_time(NaiveTime::MIN).and_utc();
    let millis = (end - start).num_milliseconds() as f64;
    (millis / (SECONDS_PER_DAY as f64 * 1000.0)).ceil() as i64
}

/// Expired strictly after the end day.
pub fn is_expired(end: DateTime<Utc>, today: NaiveDate) -> bool {
    today > end.date_naive()
}

/// An annual price split into amount and currency unit.
///
/// `amount` is NaN when the raw price does not look like `12.00USD`.
#[derive(Debug, Clone, Serialize)]
pub struct Price {
    pub amount: f64,
    pub unit: String,
}

impl Price {
    pub fn is_parsed(&self) -> bool {
        !self.amount.is_nan()
    }
}

/// Parses `<amount><unit>`, e.g. `12.00USD` or `99CNY`.
pub fn parse_price(raw: &str) -> Price {
    let captures = PRICE_PATTERN.captures(raw.trim());
    match captures {
        Some(caps) => Price {
            amount: caps[1].parse().unwrap_or(f64::NAN),
            unit: caps[2].to_string(),
        },
        None => Price {
            amount: f64::NAN,
            unit: String::new(),
        },
    }
}

/// Remaining value of the current billing year in both currencies.
///
/// Either field is NaN when it cannot be computed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Valuation {
    pub usd: f64,
    pub cny: f64,
}

impl Valuation {
    pub const UNAVAILABLE: Valuation = Valuation {
        usd: f64::NAN,
        cny: f64::NAN,
    };

    /// `amount / 365 * max(days, 0)`, converted through `rate`.
    ///
    /// Units other than USD and CNY (case-insensitive) are unavailable.
    pub fn residual(price: &Price, days: Option<i64>, rate: &ExchangeRate) -> Self {
        let Some(days) = days else {
            return Self::UNAVAILABLE;
        };
        let native = price.amount / 365.0 * days.max(0) as f64;
        match price.unit.to_ascii_uppercase().as_str() {
            "USD" => Valuation {
                usd: native,
                cny: native * rate.rate_cny,
            },
            "CNY" => Valuation {
                usd: native / rate.rate_cny,
                cny: native,
            },
            _ => Self::UNAVAILABLE,
        }
    }

    pub fn is_available(&self) -> bool {
        self.usd.is_finite() && self.cny.is_finite()
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_available() {
            write!(f, "{:.2}USD | {:.2}CNY", self.usd, self.cny)
        } else {
            f.write_str("N/A")
        }
    }
}
