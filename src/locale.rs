//! Numeric locale used to canonicalise currency amounts.
//!
//! The locale is explicit configuration. [`NumberLocale::from_env`] exists for
//! front ends that want the process locale resolved once at start-up; the
//! extraction pipeline itself only ever sees the injected value.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CURRENCY_SIGNS: &[char] = &['$'];

/// Decimal and digit-group separators for amount parsing and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberLocale {
    /// Separator between integer and fractional digits
    pub decimal_separator: char,
    /// Separator between groups of three integer digits
    pub group_separator: char,
}

impl NumberLocale {
    /// Create a locale from explicit separators.
    pub fn new(decimal_separator: char, group_separator: char) -> Result<Self> {
        let locale = Self {
            decimal_separator,
            group_separator,
        };
        locale.validate()?;
        Ok(locale)
    }

    /// Resolve a POSIX locale tag such as `en_NZ.UTF-8` or `de_DE@euro`.
    ///
    /// `C` and `POSIX` map to the default (`.` decimal, `,` grouping).
    pub fn from_tag(tag: &str) -> Result<Self> {
        let base = tag
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();

        if base.is_empty() || base == "C" || base == "POSIX" {
            return Ok(Self::default());
        }

        let mut parts = base.split(['_', '-']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        let region = parts.next().map(|r| r.to_ascii_uppercase());

        let (decimal, group) = match (language.as_str(), region.as_deref()) {
            ("de" | "it" | "fr", Some("CH") | Some("LI")) => ('.', '\''),
            ("es", Some("MX") | Some("US")) => ('.', ','),
            ("en" | "ja" | "zh" | "ko" | "th" | "he" | "hi" | "mi" | "ms" | "tl", _) => ('.', ','),
            ("de" | "nl" | "it" | "es" | "pt" | "da" | "id" | "tr" | "el" | "ro", _) => (',', '.'),
            ("fr" | "ru" | "pl" | "cs" | "sv" | "nb" | "nn" | "fi" | "uk" | "hu" | "sk", _) => {
                (',', ' ')
            }
            _ => return Err(Error::InvalidLocale(tag.to_string())),
        };

        Self::new(decimal, group)
    }

    /// Resolve the process locale from `LC_ALL`, `LC_NUMERIC` and `LANG`.
    ///
    /// Falls back to the default when none is set or the tag is unknown.
    pub fn from_env() -> Self {
        let tag = ["LC_ALL", "LC_NUMERIC", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty());

        match tag {
            Some(tag) => Self::from_tag(&tag).unwrap_or_else(|e| {
                log::warn!("{}; using default number format", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Check that the separators can be told apart.
    pub fn validate(&self) -> Result<()> {
        let bad = |c: char| c.is_ascii_digit() || c == '-';
        if self.decimal_separator == self.group_separator {
            return Err(Error::InvalidLocale(format!(
                "decimal and group separator are both {:?}",
                self.decimal_separator
            )));
        }
        if bad(self.decimal_separator) || bad(self.group_separator) {
            return Err(Error::InvalidLocale(format!(
                "separators {:?}/{:?} collide with numerals",
                self.decimal_separator, self.group_separator
            )));
        }
        Ok(())
    }

    /// Parse localized amount text into a number.
    ///
    /// A leading currency sign is ignored; group separators are removed and the
    /// decimal separator is mapped to `.` before parsing.
    pub fn parse(&self, text: &str) -> Option<f64> {
        let text = text.trim().trim_start_matches(CURRENCY_SIGNS);

        let mut delocalized = String::with_capacity(text.len());
        for c in text.chars() {
            if c == self.group_separator {
                continue;
            }
            if c == self.decimal_separator {
                delocalized.push('.');
            } else if c.is_ascii_digit() || c == '-' || c == '.' {
                delocalized.push(c);
            } else {
                return None;
            }
        }

        delocalized
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Format a number with two decimals and grouped integer digits.
    pub fn format(&self, value: f64) -> String {
        let fixed = format!("{:.2}", value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
        if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
            out.push('-');
        }
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(digit);
        }
        out.push(self.decimal_separator);
        out.push_str(frac_part);
        out
    }

    /// Canonicalise an amount string, or return it unchanged when it does not parse.
    pub fn format_amount_str(&self, text: &str) -> String {
        match self.parse(text) {
            Some(value) => self.format(value),
            None => {
                log::debug!("amount {:?} did not parse; keeping original", text);
                text.to_string()
            }
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
        }
    }
}
