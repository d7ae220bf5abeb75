use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mass_format_core::HighlightError;
use serde_json::json;
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Highlight(#[from] HighlightError),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::InvalidInput(errors.to_string())
    }
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Highlight(err) if err.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Highlight(
                HighlightError::ElementNotFound(_)
                | HighlightError::NotTextBearing(_)
                | HighlightError::OffsetOutOfRange { .. },
            ) => StatusCode::BAD_REQUEST,
            Error::Highlight(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let message = match &self {
            Error::Highlight(err) if err.is_user_error() => err.notice(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mass_format_core::ElementId;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::InvalidInput("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::from(HighlightError::NoSelection).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::from(HighlightError::ElementNotFound(ElementId(3))).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::from(HighlightError::Document("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
