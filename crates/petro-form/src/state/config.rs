//! # Configuration State
//!
//! Station configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PETRO_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.
//!
//! The thermal expansion coefficient is deliberately absent: it is a
//! physical constant in `petro-core`, not a station setting.

use petro_core::numeric::{parse_decimal_or_zero, round_to};
use petro_core::DEFAULT_DENSITY_TOLERANCE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Station configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Station name (shown in the form header)
    pub station_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u32,

    /// Accepted |corrected − invoice| density in kg/m³
    pub density_tolerance: Decimal,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Station: "PetroPro Station"
    /// - Currency: INR (₹), 2 places
    /// - Density tolerance: 3.0 kg/m³
    fn default() -> Self {
        ConfigState {
            station_name: "PetroPro Station".to_string(),
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            currency_decimals: 2,
            density_tolerance: DEFAULT_DENSITY_TOLERANCE,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `PETRO_STATION_NAME`: Override station name
    /// - `PETRO_CURRENCY_SYMBOL`: Override currency symbol
    /// - `PETRO_DENSITY_TOLERANCE`: Override tolerance (e.g., "2.5")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(name) = lookup("PETRO_STATION_NAME") {
            config.station_name = name;
        }

        if let Some(symbol) = lookup("PETRO_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        // Non-positive or unparseable tolerances keep the default
        if let Some(raw) = lookup("PETRO_DENSITY_TOLERANCE") {
            let tolerance = parse_decimal_or_zero(&raw);
            if tolerance > Decimal::ZERO {
                config.density_tolerance = tolerance;
            }
        }

        config
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use petro_form::state::ConfigState;
    /// use rust_decimal::Decimal;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_amount(Decimal::new(157000, 2)), "₹1570.00");
    /// ```
    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded = round_to(amount, self.currency_decimals);
        format!(
            "{}{}{}",
            if rounded < Decimal::ZERO { "-" } else { "" },
            self.currency_symbol,
            rounded.abs()
        )
    }
}
