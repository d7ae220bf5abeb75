pub mod read;
pub mod write;

pub use read::{extract_current_background_color, extract_selection_text, prepare_color_prompt};
pub use write::{apply_highlight, highlight_selection, process_highlight};
