use mass_format_core::{ElementId, HighlightRequest};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct SelectionRequest {
    #[validate(length(min = 1, message = "select at least one element"), nested)]
    pub ranges: Vec<SelectionRange>,
}

/// Whole element when both offsets are missing, otherwise `[start, end_inclusive]`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_range"))]
pub struct SelectionRange {
    pub element: usize,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end_inclusive: Option<usize>,
}

impl SelectionRange {
    pub fn as_pair(&self) -> (ElementId, Option<(usize, usize)>) {
        let range = self.start.zip(self.end_inclusive);
        (ElementId(self.element), range)
    }
}

fn validate_range(range: &SelectionRange) -> Result<(), ValidationError> {
    match (range.start, range.end_inclusive) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) if start <= end => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("start_after_end")),
        _ => Err(ValidationError::new("incomplete_range")),
    }
}

/// A highlight action together with the selection it applies to.
///
/// No `ranges` (or an empty list) means nothing is selected, which the action
/// reports as a notice rather than a validation failure.
#[derive(Debug, Deserialize, Validate)]
pub struct HighlightActionRequest {
    #[serde(default)]
    #[validate(nested)]
    pub ranges: Vec<SelectionRange>,
    #[serde(flatten)]
    pub highlight: HighlightRequest,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub pattern: String,
}

/// Text frames pushed to WebSocket clients next to the binary yjs updates.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    Notice { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_request_validation() {
        let ok: SelectionRequest = serde_json::from_str(
            r#"{"ranges":[{"element":0,"start":1,"end_inclusive":3},{"element":2}]}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.ranges[0].as_pair(), (ElementId(0), Some((1, 3))));
        assert_eq!(ok.ranges[1].as_pair(), (ElementId(2), None));

        let empty: SelectionRequest = serde_json::from_str(r#"{"ranges":[]}"#).unwrap();
        assert!(empty.validate().is_err());

        let reversed: SelectionRequest =
            serde_json::from_str(r#"{"ranges":[{"element":0,"start":4,"end_inclusive":1}]}"#)
                .unwrap();
        assert!(reversed.validate().is_err());

        let half: SelectionRequest =
            serde_json::from_str(r#"{"ranges":[{"element":0,"start":4}]}"#).unwrap();
        assert!(half.validate().is_err());
    }

    #[test]
    fn test_selection_range_json_shape() {
        let range = SelectionRange {
            element: 1,
            start: Some(0),
            end_inclusive: Some(2),
        };
        assert_eq!(
            serde_json::to_value(&range).unwrap(),
            serde_json::json!({"element": 1, "start": 0, "end_inclusive": 2})
        );
    }

    #[test]
    fn test_highlight_action_request() {
        let req: HighlightActionRequest = serde_json::from_str(
            r##"{"ranges":[{"element":0,"start":0,"end_inclusive":2}],"color":"#ffff00"}"##,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.highlight, HighlightRequest::color("#ffff00"));

        let bare: HighlightActionRequest = serde_json::from_str(r#"{"clear":true}"#).unwrap();
        assert!(bare.validate().is_ok());
        assert!(bare.ranges.is_empty());
        assert_eq!(bare.highlight, HighlightRequest::clear());

        let bad: HighlightActionRequest = serde_json::from_str(
            r#"{"ranges":[{"element":0,"start":5,"end_inclusive":1}],"clear":true}"#,
        )
        .unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_client_event_shape() {
        let event = ClientEvent::Notice {
            message: "hi".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"type": "notice", "message": "hi"})
        );
    }
}
