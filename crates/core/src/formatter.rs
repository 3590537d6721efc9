//! Display formatting for scalar configuration values.
//!
//! Text given as a number, boolean or null is turned into slide text here.
//! The formatter is handed to the builder explicitly; there is no global
//! instance.

use crate::error::{Error, Result};
use serde_json::{Number, Value};

/// Locale-aware formatter for scalar values.
#[derive(Debug, Clone)]
pub struct Formatter {
    /// BCP 47 locale tag, informational.
    locale: String,
    decimal_separator: char,
    /// `None` disables digit grouping.
    thousand_separator: Option<char>,
    /// Labels for `false` and `true`.
    boolean_format: (String, String),
    /// Text shown for `null`.
    null_display: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            decimal_separator: '.',
            thousand_separator: Some(','),
            boolean_format: ("No".to_string(), "Yes".to_string()),
            null_display: "(not set)".to_string(),
        }
    }
}

impl Formatter {
    /// Create a formatter with `en-US` conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with separators for a known locale.
    ///
    /// Unknown locales keep the `en-US` separators.
    pub fn for_locale(locale: &str) -> Self {
        let base = Self::default();
        let (decimal, thousand) = match locale.split(['-', '_']).next().unwrap_or("") {
            "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" => (',', Some('.')),
            "fr" | "ru" | "pl" | "cs" | "sv" | "fi" | "nb" | "uk" => (',', Some('\u{a0}')),
            _ => (base.decimal_separator, base.thousand_separator),
        };
        Self {
            locale: locale.to_string(),
            decimal_separator: decimal,
            thousand_separator: thousand,
            ..base
        }
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    pub fn with_thousand_separator(mut self, separator: Option<char>) -> Self {
        self.thousand_separator = separator;
        self
    }

    pub fn with_boolean_format(mut self, no: impl Into<String>, yes: impl Into<String>) -> Self {
        self.boolean_format = (no.into(), yes.into());
        self
    }

    pub fn with_null_display(mut self, display: impl Into<String>) -> Self {
        self.null_display = display.into();
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Format a scalar value as display text.
    ///
    /// Arrays and objects have no display form and are rejected.
    pub fn format_value(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(self.format_boolean(*b).to_string()),
            Value::Null => Ok(self.null_display.clone()),
            Value::Number(n) => Ok(self.format_number(n)),
            Value::Array(_) | Value::Object(_) => Err(Error::invalid_value(
                "text",
                "content",
                "a string, number, boolean or null",
            )),
        }
    }

    pub fn format_boolean(&self, value: bool) -> &str {
        if value {
            &self.boolean_format.1
        } else {
            &self.boolean_format.0
        }
    }

    /// Format a number with the locale's separators.
    pub fn format_number(&self, number: &Number) -> String {
        let raw = number.to_string();
        let (sign, digits) = match raw.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", raw.as_str()),
        };
        // Exponent notation is left alone.
        if digits.contains(['e', 'E']) {
            return raw;
        }
        let (integer, fraction) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };

        let mut out = String::with_capacity(raw.len() + integer.len() / 3);
        out.push_str(sign);
        out.push_str(&self.group_digits(integer));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }

    fn group_digits(&self, integer: &str) -> String {
        let Some(separator) = self.thousand_separator else {
            return integer.to_string();
        };
        let len = integer.len();
        let mut grouped = String::with_capacity(len + len / 3);
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push(separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}
