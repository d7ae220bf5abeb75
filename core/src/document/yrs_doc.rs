use std::sync::Arc;

use yrs::types::Attrs;
use yrs::types::text::YChange;
use yrs::types::xml::{XmlElementPrelim, XmlOut};
use yrs::{
    Any, Doc, OffsetKind, Options, Out, ReadTxn, Text, Transact, XmlElementRef, XmlFragment,
    XmlTextPrelim, XmlTextRef,
};

use super::{DocumentAccess, search};
use crate::config::HighlightConfig;
use crate::error::{HighlightError, Result};
use crate::model::{Color, ElementId, Match, RangeElement, Selection};

// ============================================================================
// Constants
// ============================================================================

/// Name of the root XML fragment shared with the editor clients.
pub const CONTENT_FIELD: &str = "content";

/// Leaf elements that occupy a slot in the body but carry no text.
const ATOM_ELEMENTS: &[&str] = &["image", "horizontal_rule"];

/// Stand-in for embedded objects inside a text node.
const OBJECT_REPLACEMENT: char = '\u{FFFC}';

// ============================================================================
// Document host
// ============================================================================

/// `DocumentAccess` over a collaborative `yrs` document.
///
/// Every `XmlText` node under the `content` fragment is one text-bearing
/// element; atom elements such as images are elements without text. Background
/// colors live in a text formatting attribute.
pub struct YrsDocument {
    doc: Arc<Doc>,
    attribute: Arc<str>,
    selection: Option<Selection>,
}

enum Node {
    Text(XmlTextRef),
    Atom,
}

impl YrsDocument {
    pub fn new(config: &HighlightConfig) -> Self {
        // Offsets below are converted assuming UTF-8 byte indexing.
        let doc = Doc::with_options(Options {
            offset_kind: OffsetKind::Bytes,
            ..Options::default()
        });
        let _ = doc.get_or_insert_xml_fragment(CONTENT_FIELD);
        Self {
            doc: Arc::new(doc),
            attribute: Arc::from(config.background_attribute.as_str()),
            selection: None,
        }
    }

    pub fn doc(&self) -> &Arc<Doc> {
        &self.doc
    }

    /// Appends a paragraph holding one text node and returns its element id.
    pub fn push_paragraph(&mut self, text: &str) -> ElementId {
        let fragment = self.doc.get_or_insert_xml_fragment(CONTENT_FIELD);
        let mut txn = self.doc.transact_mut();
        let len = fragment.len(&txn);
        let para = fragment.insert(&mut txn, len, XmlElementPrelim::empty("paragraph"));
        para.insert(&mut txn, 0, XmlTextPrelim::new(text));
        ElementId(collect_nodes(&txn, &fragment).len() - 1)
    }

    /// Appends an atom element (e.g. `image`) that has no text.
    pub fn push_atom(&mut self, tag: &str) -> ElementId {
        let fragment = self.doc.get_or_insert_xml_fragment(CONTENT_FIELD);
        let mut txn = self.doc.transact_mut();
        let len = fragment.len(&txn);
        fragment.insert(&mut txn, len, XmlElementPrelim::empty(tag));
        ElementId(collect_nodes(&txn, &fragment).len() - 1)
    }

    /// Same contract as `MemoryDocument::select`.
    ///
    /// Ids index the current leaf layout; a remote edit that adds or removes a
    /// paragraph shifts them, so select and act under the same lease.
    pub fn select<I>(&mut self, ranges: I) -> Result<()>
    where
        I: IntoIterator<Item = (ElementId, Option<(usize, usize)>)>,
    {
        let nodes = self.with_nodes(|_, nodes| {
            nodes
                .iter()
                .map(|node| matches!(node, Node::Text(_)))
                .collect::<Vec<_>>()
        });
        let mut elements = Vec::new();
        for (id, range) in ranges {
            let is_text_bearing = *nodes.get(id.0).ok_or(HighlightError::ElementNotFound(id))?;
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

    fn with_nodes<R>(&self, f: impl FnOnce(&yrs::Transaction, &[Node]) -> R) -> R {
        let fragment = self.doc.get_or_insert_xml_fragment(CONTENT_FIELD);
        let txn = self.doc.transact();
        let nodes = collect_nodes(&txn, &fragment);
        f(&txn, &nodes)
    }

    fn color_from_attrs(&self, attrs: Option<&Attrs>) -> Option<Color> {
        match attrs?.get(&self.attribute)? {
            Any::String(value) if !value.is_empty() => Some(Color::new(value.to_string())),
            // Editor marks store `{ color: "..." }`.
            Any::Map(map) => match map.get("color")? {
                Any::String(value) if !value.is_empty() => Some(Color::new(value.to_string())),
                _ => None,
            },
            _ => None,
        }
    }
}

fn text_node<'a>(nodes: &'a [Node], element: ElementId) -> Result<&'a XmlTextRef> {
    match nodes.get(element.0) {
        Some(Node::Text(text)) => Ok(text),
        Some(Node::Atom) => Err(HighlightError::NotTextBearing(element)),
        None => Err(HighlightError::ElementNotFound(element)),
    }
}

impl DocumentAccess for YrsDocument {
    fn selection(&self) -> Option<Selection> {
        self.selection.clone()
    }

    fn element_count(&self) -> usize {
        self.with_nodes(|_, nodes| nodes.len())
    }

    fn is_text_bearing(&self, element: ElementId) -> bool {
        self.with_nodes(|_, nodes| matches!(nodes.get(element.0), Some(Node::Text(_))))
    }

    fn text(&self, element: ElementId) -> Result<String> {
        self.with_nodes(|txn, nodes| {
            let text = text_node(nodes, element)?;
            Ok(TextLayout::read(text, txn).text)
        })
    }

    fn background_color(&self, element: ElementId, offset: usize) -> Result<Option<Color>> {
        self.with_nodes(|txn, nodes| {
            let layout = TextLayout::read(text_node(nodes, element)?, txn);
            let chunk = *layout
                .chunk_of
                .get(offset)
                .ok_or(HighlightError::OffsetOutOfRange {
                    element,
                    offset,
                    len: layout.chunk_of.len(),
                })?;
            Ok(self.color_from_attrs(layout.attrs[chunk].as_deref()))
        })
    }

    fn set_background_color(
        &mut self,
        element: ElementId,
        start: usize,
        end_inclusive: usize,
        color: Option<&Color>,
    ) -> Result<()> {
        let fragment = self.doc.get_or_insert_xml_fragment(CONTENT_FIELD);
        // Nodes are collected inside the write transaction that formats them.
        let mut txn = self.doc.transact_mut();
        let nodes = collect_nodes(&txn, &fragment);
        let text = text_node(&nodes, element)?;
        let layout = TextLayout::read(text, &txn);
        let len = layout.chunk_of.len();
        if start > end_inclusive || end_inclusive >= len {
            return Err(HighlightError::OffsetOutOfRange {
                element,
                offset: end_inclusive.max(start),
                len,
            });
        }

        let from = layout.index[start];
        let to = layout.index[end_inclusive + 1];
        let value = match color {
            Some(color) => Any::String(Arc::from(color.as_str())),
            None => Any::Null,
        };
        let attrs = Attrs::from([(self.attribute.clone(), value)]);
        text.format(&mut txn, from, to - from, attrs);
        Ok(())
    }

    fn find_next(&self, pattern: &str, after: Option<&Match>) -> Result<Option<Match>> {
        // One transaction for the whole probe instead of one per element.
        Ok(self.with_nodes(|txn, nodes| {
            search::find_next_in(
                nodes.len(),
                |element| match &nodes[element.0] {
                    Node::Text(text) => Some(TextLayout::read(text, txn).text),
                    Node::Atom => None,
                },
                pattern,
                after,
            )
        }))
    }

    fn find_all(&self, pattern: &str) -> Result<Vec<Match>> {
        Ok(self.with_nodes(|txn, nodes| {
            let mut found = Vec::new();
            for (index, node) in nodes.iter().enumerate() {
                let Node::Text(text) = node else { continue };
                let text = TextLayout::read(text, txn).text;
                found.extend(search::find_all_in_text(&text, pattern).into_iter().map(
                    |(start, end_inclusive)| Match {
                        element: ElementId(index),
                        start,
                        end_inclusive,
                    },
                ));
            }
            found
        }))
    }
}

// ============================================================================
// Text layout: char offsets <-> yrs indices
// ============================================================================

/// Plain text of one `XmlText` plus the bookkeeping to map char offsets to
/// `yrs` indices and formatting chunks.
#[derive(Default)]
struct TextLayout {
    text: String,
    /// `yrs` index of every char, plus one entry past the end.
    index: Vec<u32>,
    /// Formatting chunk of every char.
    chunk_of: Vec<usize>,
    attrs: Vec<Option<Box<Attrs>>>,
}

impl TextLayout {
    fn read(node: &XmlTextRef, txn: &impl ReadTxn) -> Self {
        let mut layout = TextLayout::default();
        let mut pos = 0u32;
        for (chunk, diff) in node.diff(txn, YChange::identity).into_iter().enumerate() {
            match &diff.insert {
                Out::Any(Any::String(s)) => {
                    for ch in s.chars() {
                        layout.text.push(ch);
                        layout.index.push(pos);
                        layout.chunk_of.push(chunk);
                        pos += ch.len_utf8() as u32;
                    }
                }
                _ => {
                    layout.text.push(OBJECT_REPLACEMENT);
                    layout.index.push(pos);
                    layout.chunk_of.push(chunk);
                    pos += 1;
                }
            }
            layout.attrs.push(diff.attributes);
        }
        layout.index.push(pos);
        layout
    }
}

// ============================================================================
// Tree walk
// ============================================================================

/// Leaf nodes of the fragment in document order.
fn collect_nodes(txn: &impl ReadTxn, fragment: &yrs::XmlFragmentRef) -> Vec<Node> {
    let mut nodes = Vec::new();
    let len = fragment.len(txn);
    for i in 0..len {
        if let Some(child) = fragment.get(txn, i) {
            collect_from_node(txn, child, &mut nodes);
        }
    }
    nodes
}

fn collect_from_node(txn: &impl ReadTxn, node: XmlOut, nodes: &mut Vec<Node>) {
    match node {
        XmlOut::Text(text) => nodes.push(Node::Text(text)),
        XmlOut::Element(elem) => collect_from_element(txn, &elem, nodes),
        XmlOut::Fragment(fragment) => {
            let len = fragment.len(txn);
            for i in 0..len {
                if let Some(child) = fragment.get(txn, i) {
                    collect_from_node(txn, child, nodes);
                }
            }
        }
    }
}

fn collect_from_element(txn: &impl ReadTxn, elem: &XmlElementRef, nodes: &mut Vec<Node>) {
    if ATOM_ELEMENTS.contains(&elem.tag().as_ref()) {
        nodes.push(Node::Atom);
        return;
    }
    let len = elem.len(txn);
    for i in 0..len {
        if let Some(child) = elem.get(txn, i) {
            collect_from_node(txn, child, nodes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(paragraphs: &[&str]) -> YrsDocument {
        let mut doc = YrsDocument::new(&HighlightConfig::default());
        for text in paragraphs {
            doc.push_paragraph(text);
        }
        doc
    }

    #[test]
    fn test_empty_document_has_no_elements() {
        let doc = doc_with(&[]);
        assert_eq!(doc.element_count(), 0);
        assert_eq!(doc.find_next("x", None).unwrap(), None);
    }

    #[test]
    fn test_find_all_reads_each_node_once() {
        let mut doc = doc_with(&["cat dog cat", "dog"]);
        doc.push_atom("image");
        doc.push_paragraph("wörld cat");
        let spans: Vec<_> = doc
            .find_all("cat")
            .unwrap()
            .into_iter()
            .map(|m| (m.element.0, m.start, m.end_inclusive))
            .collect();
        assert_eq!(spans, vec![(0, 0, 2), (0, 8, 10), (3, 6, 8)]);
    }

    #[test]
    fn test_text_nodes_are_elements() {
        let mut doc = doc_with(&["hello", "world"]);
        let image = doc.push_atom("image");
        assert_eq!(doc.element_count(), 3);
        assert_eq!(doc.text(ElementId(1)).unwrap(), "world");
        assert!(doc.is_text_bearing(ElementId(0)));
        assert!(!doc.is_text_bearing(image));
        assert!(matches!(
            doc.text(image),
            Err(HighlightError::NotTextBearing(_))
        ));
    }

    #[test]
    fn test_format_and_clear_background() {
        let mut doc = doc_with(&["cat dog cat"]);
        let yellow = Color::new("#ffff00");
        doc.set_background_color(ElementId(0), 4, 6, Some(&yellow))
            .unwrap();

        assert_eq!(doc.background_color(ElementId(0), 3).unwrap(), None);
        assert_eq!(
            doc.background_color(ElementId(0), 4).unwrap(),
            Some(yellow.clone())
        );
        assert_eq!(
            doc.background_color(ElementId(0), 6).unwrap(),
            Some(yellow)
        );
        assert_eq!(doc.background_color(ElementId(0), 7).unwrap(), None);
        // Formatting must not leak into the plain text.
        assert_eq!(doc.text(ElementId(0)).unwrap(), "cat dog cat");

        doc.set_background_color(ElementId(0), 4, 6, None).unwrap();
        assert_eq!(doc.background_color(ElementId(0), 5).unwrap(), None);
    }

    #[test]
    fn test_multibyte_offsets_map_to_the_right_chars() {
        let mut doc = doc_with(&["héllo wörld"]);
        let red = Color::new("#ff0000");
        let found = doc.find_next("wörld", None).unwrap().unwrap();
        assert_eq!((found.start, found.end_inclusive), (6, 10));

        doc.set_background_color(found.element, found.start, found.end_inclusive, Some(&red))
            .unwrap();
        assert_eq!(doc.background_color(ElementId(0), 5).unwrap(), None);
        assert_eq!(
            doc.background_color(ElementId(0), 7).unwrap(),
            Some(red.clone())
        );
        assert_eq!(doc.background_color(ElementId(0), 10).unwrap(), Some(red));
    }

    #[test]
    fn test_out_of_range_offsets() {
        let mut doc = doc_with(&["abc"]);
        assert!(matches!(
            doc.background_color(ElementId(0), 3),
            Err(HighlightError::OffsetOutOfRange { len: 3, .. })
        ));
        assert!(matches!(
            doc.set_background_color(ElementId(0), 0, 3, None),
            Err(HighlightError::OffsetOutOfRange { .. })
        ));
        assert!(matches!(
            doc.background_color(ElementId(4), 0),
            Err(HighlightError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_select_marks_atoms() {
        let mut doc = doc_with(&["one"]);
        let image = doc.push_atom("image");
        doc.select([(ElementId(0), Some((0, 1))), (image, None)])
            .unwrap();
        let selection = doc.selection().unwrap();
        assert!(selection.elements[0].is_text_bearing);
        assert!(!selection.elements[1].is_text_bearing);
        assert!(doc.select([(ElementId(9), None)]).is_err());
    }
}
