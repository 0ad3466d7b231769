use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// Currencies offered to clients when picking a base or target.
pub const AVAILABLE_CURRENCIES: [&str; 8] = ["USD", "INR", "GBP", "EUR", "JPY", "CAD", "AUD", "SGD"];

/// ISO-like three letter currency code.
///
/// Amounts are stored in a single currency; codes only matter when a ledger
/// view is rendered through a [`Conversion`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Canonical (uppercase) code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::Currency(format!(
                "invalid currency code: {value}"
            )));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// The `(base, target, rate)` triple every rendered view is computed with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub rate: f64,
}

impl Conversion {
    pub fn new(base: CurrencyCode, target: CurrencyCode, rate: f64) -> Self {
        Self { base, target, rate }
    }

    /// A conversion that leaves amounts untouched.
    pub fn identity(code: CurrencyCode) -> Self {
        Self {
            base: code.clone(),
            target: code,
            rate: 1.0,
        }
    }

    /// Converted amount for display. Every renderer goes through here so the
    /// same snapshot always yields the same cents.
    #[must_use]
    pub fn convert(&self, amount: Money) -> Money {
        amount.convert(self.rate)
    }

    /// Human readable rate line, e.g. `1 USD = 83.12 INR`.
    pub fn describe(&self) -> String {
        format!("1 {} = {} {}", self.base, self.rate, self.target)
    }
}
