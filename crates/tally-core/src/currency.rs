//! Currency type with ISO 4217 codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency codes.
///
/// Represents the currencies the upstream transaction feeds settle in.
/// Every shipped source adapter currently reports [`Currency::ZAR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum Currency {
    /// South African Rand
    #[default]
    ZAR,
    /// United States Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Botswana Pula
    BWP,
    /// Namibian Dollar
    NAD,
}

impl Currency {
    /// Returns the ISO 4217 code as a string slice.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::ZAR => "ZAR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::BWP => "BWP",
            Currency::NAD => "NAD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::ZAR.code(), "ZAR");
        assert_eq!(Currency::USD.to_string(), "USD");
    }

    #[test]
    fn test_currency_default() {
        assert_eq!(Currency::default(), Currency::ZAR);
    }

    #[test]
    fn test_currency_serde() {
        let json = serde_json::to_string(&Currency::ZAR).unwrap();
        assert_eq!(json, "\"ZAR\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Currency::ZAR);
    }
}
