use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for [`Stage::setup`](crate::Stage::setup).
///
/// Deserializes from `{"id": "game", "w": 640, "h": 480, "color": "#000"}`;
/// `color` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageConfig {
    /// Identifier of the surface to bind.
    pub id: String,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
    /// Default fill color used by `clear`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl StageConfig {
    pub const DEFAULT_COLOR: &'static str = "#fff";

    pub fn new(id: impl Into<String>, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            w,
            h,
            color: None,
        }
    }

    /// Override the default clear color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The configured color string, or `#fff`.
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(Self::DEFAULT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn color_is_optional() {
        let config = StageConfig::from_json_str(r#"{"id": "c", "w": 100, "h": 50}"#).unwrap();
        assert_eq!(config, StageConfig::new("c", 100, 50));
        assert_eq!(config.color_or_default(), "#fff");
    }

    #[test]
    fn explicit_color_wins() {
        let config = StageConfig::new("c", 1, 1).with_color("#123");
        assert_eq!(config.color_or_default(), "#123");
    }

    #[test]
    fn malformed_config_is_reported() {
        assert!(matches!(
            StageConfig::from_json_str(r#"{"id": "c", "w": -1, "h": 5}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            StageConfig::from_json_str(r#"{"id": "c", "w": 1, "h": 5, "depth": 2}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            StageConfig::from_path("/no/such/stage.json"),
            Err(Error::Io(_))
        ));
    }
}
