//! Conversion configuration.
//!
//! The original tooling this replaces drove null and currency handling
//! from process-wide flags. Here both knobs live in a [`Config`] value
//! threaded explicitly through every parser and filter, so a conversion
//! run's behavior is visible at the call site and testable in isolation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel string used for null fields in relaxed mode.
pub const NULL_SENTINEL: &str = "nil";

/// How null fields are represented in output documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullMode {
    /// Null fields render as the sentinel string `"nil"`.
    #[default]
    Relaxed,
    /// Null fields render as JSON null.
    Strict,
}

/// How price fields are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyMode {
    /// Prices parse as floating-point numbers.
    #[default]
    Relaxed,
    /// Prices parse as arbitrary-precision decimals.
    Strict,
}

/// Configuration for a conversion run. Read-only for the duration of the
/// run; the defaults match the relaxed modes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Config {
    /// Null representation mode.
    pub nulls: NullMode,
    /// Currency precision mode.
    pub currency: CurrencyMode,
}

impl Config {
    /// Relaxed nulls and relaxed currency.
    pub fn relaxed() -> Self {
        Self::default()
    }

    /// Strict nulls and strict currency.
    pub fn strict() -> Self {
        Self {
            nulls: NullMode::Strict,
            currency: CurrencyMode::Strict,
        }
    }

    /// The active null representation.
    ///
    /// Every parser returns this for absent input, and
    /// [`Config::is_null`] recognizes exactly this value. The two must
    /// stay coupled; changing one without the other breaks the
    /// null-named modifier filter.
    pub fn null_value(&self) -> Value {
        match self.nulls {
            NullMode::Relaxed => Value::String(NULL_SENTINEL.to_string()),
            NullMode::Strict => Value::Null,
        }
    }

    /// Whether a value equals the active null representation.
    pub fn is_null(&self, value: &Value) -> bool {
        match self.nulls {
            NullMode::Relaxed => value.as_str() == Some(NULL_SENTINEL),
            NullMode::Strict => value.is_null(),
        }
    }
}
