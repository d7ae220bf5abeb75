use serde::{Deserialize, Serialize};

use crate::model::Color;

pub const DEFAULT_BACKGROUND_ATTRIBUTE: &str = "background";
pub const DEFAULT_NO_HIGHLIGHT_COLOR: &str = "#000000";

/// Knobs shared by the extractor and the `yrs` host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Color a host reports for text that has never been highlighted.
    pub default_color: Color,
    /// Formatting attribute key used to store the background color.
    pub background_attribute: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            default_color: Color::new(DEFAULT_NO_HIGHLIGHT_COLOR),
            background_attribute: DEFAULT_BACKGROUND_ATTRIBUTE.to_string(),
        }
    }
}
