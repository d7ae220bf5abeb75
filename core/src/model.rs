use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{HighlightError, Result};

/// Opaque color token such as `#ffff00`. Hosts decide what the string means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// What to do with the background of every match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Color(Color),
    Clear,
}

impl Directive {
    /// The color to write, `None` meaning "unset the attribute".
    pub fn color(&self) -> Option<&Color> {
        match self {
            Directive::Color(color) => Some(color),
            Directive::Clear => None,
        }
    }
}

/// Form object sent by a front end: `{ "color": "#rrggbb" }` or `{ "clear": true }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRequest {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub clear: bool,
}

impl HighlightRequest {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            clear: false,
        }
    }

    pub fn clear() -> Self {
        Self {
            color: None,
            clear: true,
        }
    }

    /// `clear` wins over `color`; a blank color is treated as missing.
    pub fn into_directive(self) -> Result<Directive> {
        if self.clear {
            return Ok(Directive::Clear);
        }
        match self.color {
            Some(color) if !color.trim().is_empty() => Ok(Directive::Color(Color::new(color))),
            _ => Err(HighlightError::NoColorSupplied),
        }
    }
}

/// Position of a structural element in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Selected sub-range of one element, both ends in chars, end inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRange {
    pub start: usize,
    pub end_inclusive: usize,
}

/// One element touched by the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeElement {
    pub element: ElementId,
    /// Resolved by the host when the selection is built.
    pub is_text_bearing: bool,
    /// `None` when the whole element is selected.
    pub range: Option<PartialRange>,
}

impl RangeElement {
    pub fn full(element: ElementId, is_text_bearing: bool) -> Self {
        Self {
            element,
            is_text_bearing,
            range: None,
        }
    }

    pub fn partial(
        element: ElementId,
        is_text_bearing: bool,
        start: usize,
        end_inclusive: usize,
    ) -> Self {
        Self {
            element,
            is_text_bearing,
            range: Some(PartialRange {
                start,
                end_inclusive,
            }),
        }
    }

    pub fn is_partial(&self) -> bool {
        self.range.is_some()
    }

    /// Offset of the first selected character.
    pub fn start_offset(&self) -> usize {
        self.range.map_or(0, |range| range.start)
    }
}

/// Ordered range elements of the user's selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub elements: Vec<RangeElement>,
}

impl Selection {
    pub fn new(elements: Vec<RangeElement>) -> Self {
        Self { elements }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn text_elements(&self) -> impl Iterator<Item = &RangeElement> {
        self.elements.iter().filter(|element| element.is_text_bearing)
    }
}

/// One literal occurrence of the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub element: ElementId,
    pub start: usize,
    pub end_inclusive: usize,
}

/// What a front end needs to open its color picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPrompt {
    pub pattern: String,
    pub initial_color: Option<Color>,
}

/// Result of one highlight action, always paired with the notice that was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightOutcome {
    pub count: usize,
    pub notice: String,
}
