//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::category::Rgb;
use crate::error::{Error, Result};

/// Settings for an editing session.
///
/// Missing fields in a JSON document take their default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Cards in an opening sample hand.
    pub hand_size: usize,

    /// Color given to categories created without one.
    pub category_color: Rgb,

    /// `chrono` format string for the date prefix of changelog lines.
    pub changelog_date_format: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hand_size: 7,
            category_color: Rgb::new(0x80, 0x80, 0x80),
            changelog_date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::format("editor configuration", e))
    }

    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    #[must_use]
    pub fn with_category_color(mut self, color: Rgb) -> Self {
        self.category_color = color;
        self
    }

    #[must_use]
    pub fn with_changelog_date_format(mut self, format: impl Into<String>) -> Self {
        self.changelog_date_format = format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.hand_size, 7);
        assert_eq!(config.changelog_date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_from_json_partial() {
        let config = EditorConfig::from_json(r#"{ "hand_size": 8 }"#).unwrap();
        assert_eq!(config.hand_size, 8);
        assert_eq!(config.category_color, EditorConfig::default().category_color);
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            EditorConfig::from_json("{ hand_size: }"),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_builder() {
        let config = EditorConfig::default()
            .with_hand_size(6)
            .with_category_color(Rgb::new(1, 2, 3))
            .with_changelog_date_format("%d/%m/%Y");
        assert_eq!(config.hand_size, 6);
        assert_eq!(config.category_color, Rgb::new(1, 2, 3));
        assert_eq!(config.changelog_date_format, "%d/%m/%Y");
    }
}
