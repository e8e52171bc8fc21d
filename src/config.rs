//! Extraction configuration.
//!
//! The insurer vocabulary, table layout, sentinel and number locale are data,
//! loaded from JSON or built in code. Every field has a default matching the
//! stock behaviour, so a config file only needs the keys it changes:
//!
//! ```json
//! { "insurers": ["Acme Mutual", "AIA"], "locale": { "decimal_separator": "," , "group_separator": "." } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::{DEFAULT_INSURERS, NOT_AVAILABLE};
use crate::locale::NumberLocale;
use crate::model::TableLayout;

/// Settings for field extraction and table assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Known insurer names in priority order
    pub insurers: Vec<String>,

    /// Benefit rows and totals label
    pub layout: TableLayout,

    /// Placeholder for fields that were not found
    pub sentinel: String,

    /// Separators used to read and format amounts
    pub locale: NumberLocale,
}

impl ExtractionConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_str_with_locale(json, NumberLocale::default())
    }

    /// Parse a JSON document, using `locale` unless the document sets one.
    pub fn from_json_str_with_locale(json: &str, locale: NumberLocale) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let sets_locale = value.get("locale").is_some();

        let mut config: Self = serde_json::from_value(value)?;
        if !sets_locale {
            config.locale = locale;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_file_with_locale(path, NumberLocale::default())
    }

    /// Load a JSON config file, using `locale` unless the file sets one.
    pub fn from_json_file_with_locale<P: AsRef<Path>>(
        path: P,
        locale: NumberLocale,
    ) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str_with_locale(&json, locale)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }

    /// Replace the insurer list.
    pub fn with_insurers<I, S>(mut self, insurers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insurers = insurers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the table layout.
    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the placeholder for missing fields.
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Set the number locale.
    pub fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Check the layout and locale.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.locale.validate()?;
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            insurers: DEFAULT_INSURERS.iter().map(|s| s.to_string()).collect(),
            layout: TableLayout::default(),
            sentinel: NOT_AVAILABLE.to_string(),
            locale: NumberLocale::default(),
        }
    }
}
