pub mod memory;
pub mod search;
pub mod yrs_doc;

pub use memory::{ElementKind, MemoryDocument, StyleRun};
pub use yrs_doc::YrsDocument;

use crate::error::Result;
use crate::model::{Color, ElementId, Match, Selection};

/// Capability the core needs from whatever owns the document.
///
/// Offsets are char offsets into an element's text; ends are inclusive.
pub trait DocumentAccess {
    /// Current selection, `None` when nothing is selected.
    fn selection(&self) -> Option<Selection>;

    /// Number of structural elements in the body.
    fn element_count(&self) -> usize;

    fn is_text_bearing(&self, element: ElementId) -> bool;

    /// Full text of a text-bearing element.
    fn text(&self, element: ElementId) -> Result<String>;

    /// Background color of one character, `None` when unset.
    fn background_color(&self, element: ElementId, offset: usize) -> Result<Option<Color>>;

    /// Sets (`Some`) or unsets (`None`) the background of `[start, end_inclusive]`.
    fn set_background_color(
        &mut self,
        element: ElementId,
        start: usize,
        end_inclusive: usize,
        color: Option<&Color>,
    ) -> Result<()>;

    /// Next literal occurrence of `pattern` strictly after `after`, or from the
    /// start of the body. Matches never span two elements.
    fn find_next(&self, pattern: &str, after: Option<&Match>) -> Result<Option<Match>> {
        let mut failure = None;
        let found = search::find_next_in(
            self.element_count(),
            |element| {
                if failure.is_some() || !self.is_text_bearing(element) {
                    return None;
                }
                match self.text(element) {
                    Ok(text) => Some(text),
                    Err(err) => {
                        failure = Some(err);
                        None
                    }
                }
            },
            pattern,
            after,
        );
        match failure {
            Some(err) => Err(err),
            None => Ok(found),
        }
    }

    /// Every non-overlapping occurrence of `pattern` in document order.
    ///
    /// Each element's text is read once. Formatting never changes the text,
    /// so the result stays valid while the matches are being colored.
    fn find_all(&self, pattern: &str) -> Result<Vec<Match>> {
        let mut found = Vec::new();
        for index in 0..self.element_count() {
            let element = ElementId(index);
            if !self.is_text_bearing(element) {
                continue;
            }
            let text = self.text(element)?;
            found.extend(search::find_all_in_text(&text, pattern).into_iter().map(
                |(start, end_inclusive)| Match {
                    element,
                    start,
                    end_inclusive,
                },
            ));
        }
        Ok(found)
    }
}
