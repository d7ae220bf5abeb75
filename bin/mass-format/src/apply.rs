use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mass_format_core::editor::{prepare_color_prompt, process_highlight};
use mass_format_core::{HighlightOutcome, MemoryDocument};

use crate::opts::{ActionOpts, HighlightOpts, SelectionOpts};

/// `mass-format apply`: one highlight action against a JSON document file.
pub fn run(selection: SelectionOpts, action: ActionOpts) -> Result<()> {
    let outcome = apply_to_file(&selection, &action)?;
    tracing::debug!(count = outcome.count, "apply finished");
    Ok(())
}

/// `mass-format prompt`: what a color picker would be seeded with.
pub fn prompt(selection: SelectionOpts, highlight: HighlightOpts) -> Result<()> {
    let doc = load_selected(&selection)?;
    match prepare_color_prompt(&doc, &highlight.config()) {
        Ok(prompt) => println!("{}", serde_json::to_string_pretty(&prompt)?),
        Err(err) => println!("{}", err.notice()),
    }
    Ok(())
}

pub fn apply_to_file(selection: &SelectionOpts, action: &ActionOpts) -> Result<HighlightOutcome> {
    let mut doc = load_selected(selection)?;
    let notify = |message: &str| println!("{message}");
    let outcome = process_highlight(&mut doc, &notify, action.request());

    if action.write && outcome.count > 0 {
        save_document(&selection.document, &doc)?;
        tracing::info!(path = %selection.document.display(), "document written");
    }
    Ok(outcome)
}

fn load_selected(selection: &SelectionOpts) -> Result<MemoryDocument> {
    let mut doc = load_document(&selection.document)?;
    doc.select(selection.ranges())
        .context("selection does not fit the document")?;
    Ok(doc)
}

pub fn load_document(path: &Path) -> Result<MemoryDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid document", path.display()))
}

pub fn save_document(path: &Path, doc: &MemoryDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
