use thiserror::Error;

use crate::model::ElementId;

/// Everything that can stop a highlight action.
///
/// The first three are user mistakes and turn into notices; the rest come from
/// the document host.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("nothing is selected")]
    NoSelection,

    #[error("the search pattern is empty")]
    EmptyPattern,

    #[error("no color or clear directive was supplied")]
    NoColorSupplied,

    #[error("element {0} does not exist")]
    ElementNotFound(ElementId),

    #[error("element {0} has no editable text")]
    NotTextBearing(ElementId),

    #[error("offset {offset} is out of range for element {element} (length {len})")]
    OffsetOutOfRange {
        element: ElementId,
        offset: usize,
        len: usize,
    },

    #[error("document error: {0}")]
    Document(String),
}

impl HighlightError {
    /// One-line message shown to the user.
    pub fn notice(&self) -> String {
        match self {
            HighlightError::NoSelection | HighlightError::EmptyPattern => {
                "Please select a word or phrase to highlight first.".to_string()
            }
            HighlightError::NoColorSupplied => "Please select a color.".to_string(),
            other => format!("Could not update the document: {other}"),
        }
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            HighlightError::NoSelection
                | HighlightError::EmptyPattern
                | HighlightError::NoColorSupplied
        )
    }
}

pub type Result<T> = std::result::Result<T, HighlightError>;
