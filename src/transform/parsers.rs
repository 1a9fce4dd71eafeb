//! Field parsers for stock item values.
//!
//! Each parser maps one raw field value to a typed JSON value, honoring
//! the run's [`Config`]. Absent input always becomes the active null
//! representation; a [`ParseError`] is raised only for malformed numeric
//! text. Already-typed values pass through unchanged, so applying a
//! parser to its own output is a no-op.

use bigdecimal::BigDecimal;
use serde_json::{Number, Value};
use std::str::FromStr;
use tracing::trace;

use crate::config::{Config, CurrencyMode, NULL_SENTINEL};
use crate::error::ParseError;

/// The available field parsers, dispatched per column by pattern rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParser {
    /// Whole-number identifier.
    Integer,
    /// Stock quantity. The literal cell text `nil` also counts as absent,
    /// matching the export convention of the upstream system.
    Quantity,
    /// Monetary amount with optional leading `-` and `$`.
    Price,
    /// Free text.
    Text,
}

impl FieldParser {
    /// Apply this parser to a value.
    pub fn apply(&self, value: &Value, config: &Config) -> Result<Value, ParseError> {
        // The active null representation maps to itself, whichever mode
        // produced it.
        if config.is_null(value) {
            return Ok(config.null_value());
        }

        match self {
            FieldParser::Integer => parse_integer(value, config),
            FieldParser::Quantity => parse_quantity(value, config),
            FieldParser::Price => parse_price(value, config),
            FieldParser::Text => parse_text(value, config),
        }
    }
}

fn parse_integer(value: &Value, config: &Config) -> Result<Value, ParseError> {
    match value {
        Value::Null => Ok(config.null_value()),
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| ParseError::InvalidInteger(s.clone())),
        other => Ok(other.clone()),
    }
}

fn parse_quantity(value: &Value, config: &Config) -> Result<Value, ParseError> {
    match value {
        Value::Null => Ok(config.null_value()),
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) if s == NULL_SENTINEL => Ok(config.null_value()),
        Value::String(s) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| ParseError::InvalidQuantity(s.clone())),
        other => Ok(other.clone()),
    }
}

fn parse_price(value: &Value, config: &Config) -> Result<Value, ParseError> {
    let text = match value {
        Value::Null => return Ok(config.null_value()),
        Value::Number(_) => return Ok(value.clone()),
        Value::String(s) => s,
        other => return Ok(other.clone()),
    };

    if text.is_empty() {
        return Ok(config.null_value());
    }

    let (is_negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let digits = unsigned.strip_prefix('$').unwrap_or(unsigned);

    trace!(value = %text, negative = is_negative, remainder = %digits, "parsing price");

    match config.currency {
        CurrencyMode::Relaxed => {
            let parsed = digits
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseError::InvalidPrice(text.clone()))?;
            let parsed = if is_negative { -parsed } else { parsed };
            Ok(Number::from_f64(parsed)
                .map(Value::Number)
                .unwrap_or(Value::Null))
        }
        CurrencyMode::Strict => {
            let parsed = BigDecimal::from_str(digits)
                .map_err(|_| ParseError::InvalidPrice(text.clone()))?;
            let parsed = if is_negative { -parsed } else { parsed };
            let number = Number::from_str(&parsed.to_string())
                .map_err(|_| ParseError::InvalidPrice(text.clone()))?;
            Ok(Value::Number(number))
        }
    }
}

fn parse_text(value: &Value, config: &Config) -> Result<Value, ParseError> {
    match value {
        Value::Null => Ok(config.null_value()),
        other => Ok(other.clone()),
    }
}
