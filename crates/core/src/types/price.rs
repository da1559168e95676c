//! Type-safe price representation using decimal arithmetic.
//!
//! Unit prices are stored in the currency-agnostic base unit (USD). Display
//! in another currency is a client-side concern: each [`CurrencyCode`]
//! carries its own conversion rate and formatting rule, and the set is
//! closed - adding a currency means adding the variant, its rate, and its
//! symbol here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// Display currencies supported by the storefront.
///
/// A closed set: exactly one code is active at a time, and extending the set
/// requires adding both the variant and its conversion/formatting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    CAD,
}

impl CurrencyCode {
    /// The ISO 4217 code string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::CAD => "CAD",
        }
    }

    /// Currency symbol used for display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD => "$",
        }
    }

    /// Display conversion rate from the base unit (USD).
    ///
    /// Rates are advisory display data for the storefront UI, not money
    /// math; order totals are always settled server-side in the base unit.
    #[must_use]
    pub fn rate(self) -> Decimal {
        match self {
            Self::USD => Decimal::ONE,
            Self::CAD => Decimal::new(135, 2),
        }
    }

    /// The other code in the two-currency set.
    ///
    /// With more than two codes a toggle stops being well-defined and
    /// callers must use an explicit set instead.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::USD => Self::CAD,
            Self::CAD => Self::USD,
        }
    }

    /// Convert a base-unit amount into this currency for display.
    #[must_use]
    pub fn convert(self, base_amount: Decimal) -> Decimal {
        (base_amount * self.rate()).round_dp(2)
    }

    /// Format a base-unit amount for display in this currency
    /// (e.g., "$27.00 CAD").
    #[must_use]
    pub fn format(self, base_amount: Decimal) -> String {
        format!("{}{:.2} {}", self.symbol(), self.convert(base_amount), self.code())
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "CAD" => Ok(Self::CAD),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}
