//! `[locale]` section configuration.
//!
//! Describes what a "location-like" mention looks like in generated output.
//! A line matching the indicator must also mention a whitelisted place.

use macros::Config;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Locale indicator for free-text location checks.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "locale")]
pub struct LocaleConfig {
    /// State abbreviation matched next to a comma (", TX" or "TX,").
    #[config(default = "TX")]
    pub state: String,

    /// Country suffix matched after a comma (", USA").
    #[config(default = "USA")]
    pub country: String,

    /// Regex for ZIP-shaped tokens.
    #[config(default = r"\\b7[5-9]\\d{3}(?:-\\d{4})?\\b")]
    pub zip: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            state: "TX".into(),
            country: "USA".into(),
            zip: r"\b7[5-9]\d{3}(?:-\d{4})?\b".into(),
        }
    }
}

impl LocaleConfig {
    /// Combined indicator pattern.
    pub fn indicator_pattern(&self) -> String {
        let state = regex::escape(&self.state);
        let country = regex::escape(&self.country);
        format!(r",\s*{state}\b|\b{state}\s*,|{zip}|,\s*{country}\b", zip = self.zip)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.state.trim().is_empty() {
            diag.error(Self::FIELDS.state, "state abbreviation must not be empty");
        }
        if self.country.trim().is_empty() {
            diag.error(Self::FIELDS.country, "country suffix must not be empty");
        }
        if let Err(e) = Regex::new(&self.zip) {
            diag.error(Self::FIELDS.zip, format!("invalid regex: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_pattern_matches() {
        let re = Regex::new(&LocaleConfig::default().indicator_pattern()).unwrap();
        assert!(re.is_match("Austin, TX"));
        assert!(re.is_match("TX, 78701"));
        assert!(re.is_match("zip 78732"));
        assert!(re.is_match("Round Rock, USA"));
        assert!(!re.is_match("TEXAS ranch"));
        assert!(!re.is_match("order 12345"));
    }
}
