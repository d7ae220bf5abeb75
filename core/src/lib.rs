//! Highlight every occurrence of the selected phrase in a document.
//!
//! The document itself is reached through [`DocumentAccess`]; two hosts ship
//! with the crate, [`MemoryDocument`] and the collaborative [`YrsDocument`].

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod model;
pub mod notify;

pub use config::HighlightConfig;
pub use document::{DocumentAccess, MemoryDocument, YrsDocument};
pub use error::{HighlightError, Result};
pub use model::{
    Color, ColorPrompt, Directive, ElementId, HighlightOutcome, HighlightRequest, Match,
    RangeElement, Selection,
};
pub use notify::{Notifier, TracingNotifier};
