use serde::{Deserialize, Serialize};
use strum::Display;

use super::{DocumentAccess, search};
use crate::error::{HighlightError, Result};
use crate::model::{Color, ElementId, Match, RangeElement, Selection};

/// Structural element kinds known to the in-memory host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
    Paragraph,
    Heading,
    ListItem,
    Image,
    HorizontalRule,
}

impl ElementKind {
    pub fn is_text_bearing(self) -> bool {
        !matches!(self, ElementKind::Image | ElementKind::HorizontalRule)
    }
}

/// Contiguous characters sharing one background color, as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRun {
    pub start: usize,
    pub end_inclusive: usize,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ElementRepr", into = "ElementRepr")]
pub struct MemoryElement {
    kind: ElementKind,
    text: String,
    /// One slot per char of `text`.
    background: Vec<Option<Color>>,
}

impl MemoryElement {
    fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        let text = if kind.is_text_bearing() {
            text.into()
        } else {
            String::new()
        };
        let background = vec![None; text.chars().count()];
        Self {
            kind,
            text,
            background,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Background grouped into runs of equal color.
    pub fn highlights(&self) -> Vec<StyleRun> {
        let mut runs: Vec<StyleRun> = Vec::new();
        for (offset, slot) in self.background.iter().enumerate() {
            let Some(color) = slot else {
                continue;
            };
            match runs.last_mut() {
                Some(run) if run.end_inclusive + 1 == offset && run.color == *color => {
                    run.end_inclusive = offset;
                }
                _ => runs.push(StyleRun {
                    start: offset,
                    end_inclusive: offset,
                    color: color.clone(),
                }),
            }
        }
        runs
    }
}

#[derive(Serialize, Deserialize)]
struct ElementRepr {
    kind: ElementKind,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    highlights: Vec<StyleRun>,
}

impl From<ElementRepr> for MemoryElement {
    fn from(repr: ElementRepr) -> Self {
        let mut element = MemoryElement::new(repr.kind, repr.text);
        let len = element.background.len();
        for run in repr.highlights {
            if run.start >= len {
                continue;
            }
            let end = run.end_inclusive.min(len - 1);
            for slot in &mut element.background[run.start..=end] {
                *slot = Some(run.color.clone());
            }
        }
        element
    }
}

impl From<MemoryElement> for ElementRepr {
    fn from(element: MemoryElement) -> Self {
        let highlights = element.highlights();
        ElementRepr {
            kind: element.kind,
            text: element.text,
            highlights,
        }
    }
}

/// Document kept entirely in memory: the reference host for tests and the
/// file-based `apply` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
    #[serde(skip)]
    selection: Option<Selection>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut doc = Self::new();
        for text in paragraphs {
            doc.push(ElementKind::Paragraph, text);
        }
        doc
    }

    pub fn push(&mut self, kind: ElementKind, text: impl Into<String>) -> ElementId {
        self.elements.push(MemoryElement::new(kind, text));
        ElementId(self.elements.len() - 1)
    }

    pub fn element(&self, element: ElementId) -> Option<&MemoryElement> {
        self.elements.get(element.0)
    }

    pub fn elements(&self) -> &[MemoryElement] {
        &self.elements
    }

    pub fn highlights(&self, element: ElementId) -> Vec<StyleRun> {
        self.element(element)
            .map(MemoryElement::highlights)
            .unwrap_or_default()
    }

    /// Builds a selection from `(element, Some((start, end_inclusive)))` for a
    /// partial range or `(element, None)` for the whole element.
    pub fn select<I>(&mut self, ranges: I) -> Result<()>
    where
        I: IntoIterator<Item = (ElementId, Option<(usize, usize)>)>,
    {
        let mut elements = Vec::new();
        for (id, range) in ranges {
            let element = self
                .element(id)
                .ok_or(HighlightError::ElementNotFound(id))?;
            let is_text_bearing = element.kind.is_text_bearing();
            elements.push(match range {
                Some((start, end_inclusive)) => {
                    RangeElement::partial(id, is_text_bearing, start, end_inclusive)
                }
                None => RangeElement::full(id, is_text_bearing),
            });
        }
        self.selection = (!elements.is_empty()).then(|| Selection::new(elements));
        Ok(())
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    fn text_element(&self, element: ElementId) -> Result<&MemoryElement> {
        let found = self
            .element(element)
            .ok_or(HighlightError::ElementNotFound(element))?;
        if !found.kind.is_text_bearing() {
            return Err(HighlightError::NotTextBearing(element));
        }
        Ok(found)
    }
}

impl DocumentAccess for MemoryDocument {
    fn selection(&self) -> Option<Selection> {
        self.selection.clone()
    }

    fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn is_text_bearing(&self, element: ElementId) -> bool {
        self.element(element)
            .is_some_and(|found| found.kind.is_text_bearing())
    }

    fn text(&self, element: ElementId) -> Result<String> {
        Ok(self.text_element(element)?.text.clone())
    }

    fn background_color(&self, element: ElementId, offset: usize) -> Result<Option<Color>> {
        let found = self.text_element(element)?;
        found
            .background
            .get(offset)
            .cloned()
            .ok_or(HighlightError::OffsetOutOfRange {
                element,
                offset,
                len: found.background.len(),
            })
    }

    fn set_background_color(
        &mut self,
        element: ElementId,
        start: usize,
        end_inclusive: usize,
        color: Option<&Color>,
    ) -> Result<()> {
        self.text_element(element)?;
        let found = &mut self.elements[element.0];
        let len = found.background.len();
        if start > end_inclusive || end_inclusive >= len {
            return Err(HighlightError::OffsetOutOfRange {
                element,
                offset: end_inclusive.max(start),
                len,
            });
        }
        tracing::trace!(%element, kind = %found.kind, start, end_inclusive, "set background");
        for slot in &mut found.background[start..=end_inclusive] {
            *slot = color.cloned();
        }
        Ok(())
    }

    // Searches borrow the stored text instead of going through `text()`.
    fn find_next(&self, pattern: &str, after: Option<&Match>) -> Result<Option<Match>> {
        Ok(search::find_next_in(
            self.elements.len(),
            |element| {
                let found = &self.elements[element.0];
                found.kind.is_text_bearing().then_some(found.text.as_str())
            },
            pattern,
            after,
        ))
    }

    fn find_all(&self, pattern: &str) -> Result<Vec<Match>> {
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, found)| found.kind.is_text_bearing())
            .flat_map(|(index, found)| {
                search::find_all_in_text(&found.text, pattern)
                    .into_iter()
                    .map(move |(start, end_inclusive)| Match {
                        element: ElementId(index),
                        start,
                        end_inclusive,
                    })
            })
            .collect())
    }
}
