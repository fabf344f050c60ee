use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::HexColor;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse marker config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("defaultColors[{index}] = {value:?} is not a six-digit hex color")]
    InvalidColor { index: usize, value: String },
}

/// Shape of the config object as the host passes it in, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMarkerConfig {
    #[serde(default)]
    default_colors: Vec<String>,
}

/// Marker settings. With no preset colors the tool is a plain on/off
/// highlighter; with colors it shows a swatch panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerConfig {
    default_colors: Vec<HexColor>,
}

impl MarkerConfig {
    pub fn from_colors<I, S>(colors: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let default_colors = colors
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let value = value.as_ref();
                value.parse::<HexColor>().map_err(|_| ConfigError::InvalidColor {
                    index,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { default_colors })
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawMarkerConfig = serde_json::from_str(s)?;
        Self::from_colors(raw.default_colors)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let raw: RawMarkerConfig = serde_json::from_value(value)?;
        Self::from_colors(raw.default_colors)
    }

    pub fn default_colors(&self) -> &[HexColor] {
        &self.default_colors
    }

    pub fn has_palette(&self) -> bool {
        !self.default_colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_means_no_palette() {
        let config = MarkerConfig::from_json_str("{}").unwrap();
        assert!(!config.has_palette());
    }

    #[test]
    fn invalid_entry_is_reported_with_its_index() {
        let err = MarkerConfig::from_json_str(r##"{"defaultColors": ["#ffeb3b", "#fff"]}"##)
            .unwrap_err();
        match err {
            ConfigError::InvalidColor { index, value } => {
                assert_eq!(index, 1);
                assert_eq!(value, "#fff");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
