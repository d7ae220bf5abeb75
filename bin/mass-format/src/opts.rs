use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mass_format_core::config::{DEFAULT_BACKGROUND_ATTRIBUTE, DEFAULT_NO_HIGHLIGHT_COLOR};
use mass_format_core::{Color, ElementId, HighlightConfig, HighlightRequest};

#[derive(Debug, Clone, Parser)]
pub struct HttpOpts {
    /// Address/port for the HTTP listener
    #[arg(long, env = "MASS_FORMAT_HOST", default_value = "0.0.0.0:3030")]
    pub host: String,

    #[arg(
        long,
        value_delimiter = ';',
        default_value = "http://localhost:8080;http://127.0.0.1:8080;http://localhost:3000;http://127.0.0.1:3000",
        env = "MASS_FORMAT_CORS_ORIGINS"
    )]
    pub origins: Vec<String>,

    /// Plain-text file loaded into the shared document, one paragraph per line
    #[arg(long, env = "MASS_FORMAT_SEED", value_hint = ValueHint::FilePath)]
    pub seed: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct HighlightOpts {
    /// Color a host reports for text that was never highlighted
    #[arg(
        long,
        env = "MASS_FORMAT_DEFAULT_COLOR",
        default_value = DEFAULT_NO_HIGHLIGHT_COLOR
    )]
    pub default_color: String,

    /// Text formatting attribute that stores the background color
    #[arg(
        long,
        env = "MASS_FORMAT_BACKGROUND_ATTRIBUTE",
        default_value = DEFAULT_BACKGROUND_ATTRIBUTE
    )]
    pub background_attribute: String,
}

impl HighlightOpts {
    pub fn config(&self) -> HighlightConfig {
        HighlightConfig {
            default_color: Color::new(self.default_color.clone()),
            background_attribute: self.background_attribute.clone(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct SelectionOpts {
    /// JSON document file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub document: PathBuf,

    /// Selected element, `ELEMENT` for all of it or `ELEMENT:START-END` (inclusive)
    #[arg(long = "select", value_parser = parse_selected_range)]
    pub select: Vec<SelectedRange>,
}

impl SelectionOpts {
    pub fn ranges(&self) -> impl Iterator<Item = (ElementId, Option<(usize, usize)>)> + '_ {
        self.select.iter().map(|range| (range.element, range.range))
    }
}

#[derive(Debug, Clone, Parser)]
pub struct ActionOpts {
    /// Background color to apply
    #[arg(long, conflicts_with = "clear")]
    pub color: Option<String>,

    /// Remove the background color instead
    #[arg(long)]
    pub clear: bool,

    /// Write the updated document back to the file
    #[arg(long)]
    pub write: bool,
}

impl ActionOpts {
    pub fn request(&self) -> HighlightRequest {
        HighlightRequest {
            color: self.color.clone(),
            clear: self.clear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedRange {
    pub element: ElementId,
    pub range: Option<(usize, usize)>,
}

pub fn parse_selected_range(value: &str) -> Result<SelectedRange, String> {
    let (element, range) = match value.split_once(':') {
        Some((element, range)) => (element, Some(range)),
        None => (value, None),
    };
    let element = element
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid element index `{element}`: {e}"))?;

    let range = match range {
        None => None,
        Some(range) => {
            let (start, end) = range
                .split_once('-')
                .ok_or_else(|| format!("expected START-END, got `{range}`"))?;
            let start = start
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid start `{start}`: {e}"))?;
            let end = end
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid end `{end}`: {e}"))?;
            if start > end {
                return Err(format!("start {start} is after end {end}"));
            }
            Some((start, end))
        }
    };

    Ok(SelectedRange {
        element: ElementId(element),
        range,
    })
}
