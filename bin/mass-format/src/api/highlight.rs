use crate::api::{errors::Error, state::AppState};
use crate::model::{HighlightActionRequest, SelectionRequest, SelectionResponse};

use axum::{
    Router,
    extract::{Json, State},
    routing::post,
};
use mass_format_core::editor::{extract_selection_text, prepare_color_prompt, process_highlight};
use mass_format_core::{ColorPrompt, HighlightOutcome};
use tracing::instrument;
use validator::Validate;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/selection", post(selection_handler))
        .route("/highlight/prompt", post(prompt_handler))
        .route("/highlight", post(highlight_handler))
}

/// The phrase the given ranges currently refer to.
#[instrument(skip(state, req))]
pub async fn selection_handler(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, Error> {
    req.validate()?;
    let pattern = state.with_selection(&req.ranges, |editor| extract_selection_text(&*editor))??;
    Ok(Json(SelectionResponse { pattern }))
}

/// Seed values for the color picker.
#[instrument(skip(state, req))]
pub async fn prompt_handler(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<ColorPrompt>, Error> {
    req.validate()?;
    let prompt = state
        .with_selection(&req.ranges, |editor| prepare_color_prompt(&*editor, &state.config))??;
    Ok(Json(prompt))
}

/// Highlight or clear the selected phrase everywhere.
#[instrument(skip(state, req))]
pub async fn highlight_handler(
    State(state): State<AppState>,
    Json(req): Json<HighlightActionRequest>,
) -> Result<Json<HighlightOutcome>, Error> {
    req.validate()?;
    let HighlightActionRequest { ranges, highlight } = req;
    let notifier = state.notifier();
    let outcome =
        state.with_selection(&ranges, |editor| process_highlight(editor, &notifier, highlight))?;
    Ok(Json(outcome))
}
