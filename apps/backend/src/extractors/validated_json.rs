use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Largest accepted request body. A report of the maximum length fits with
/// room to spare.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON body extractor that turns parse failures into a 400 problem response
/// with a sanitized detail instead of actix's default plain-text error.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();

        // Read the header up front so nothing borrows `req` across an await.
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("")
            .to_string();

        Box::pin(async move {
            let trace_id = trace_ctx::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %trace_id, error = %e, "Failed to read request body chunk");
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        format!("Request body exceeds {MAX_BODY_BYTES} bytes"),
                    ));
                }
                body.extend_from_slice(&chunk);
            }

            let parsed = serde_json::from_slice::<T>(&body).map_err(|e| {
                let detail = classify_json_error(&e);
                debug!(
                    trace_id = %trace_id,
                    error = %Redacted(&e.to_string()),
                    content_type = %content_type,
                    body_size = body.len(),
                    "JSON parsing failed"
                );
                AppError::bad_request(ErrorCode::BadRequest, detail)
            })?;

            Ok(ValidatedJson(parsed))
        })
    }
}

/// Sanitized description of a parse failure. Structural hints (unknown event
/// type, missing field) are passed through; field values never are.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("Invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            let msg = error.to_string();
            if msg.starts_with("unknown variant") {
                "Unknown event type".to_string()
            } else if let Some(field) = msg
                .strip_prefix("missing field `")
                .and_then(|rest| rest.split('`').next())
            {
                format!("Missing field '{field}'")
            } else {
                "Invalid JSON: wrong types for one or more fields".to_string()
            }
        }
        serde_json::error::Category::Io => "Invalid JSON: I/O error while reading body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::InboundEvent;

    fn detail_for(json: &str) -> String {
        let error = serde_json::from_str::<InboundEvent>(json).unwrap_err();
        classify_json_error(&error)
    }

    #[test]
    fn syntax_errors_report_line() {
        assert!(detail_for(r#"{"type": "dice.roll", "rollValue": }"#).contains("line 1"));
    }

    #[test]
    fn truncated_body_is_eof() {
        assert!(detail_for(r#"{"type": "dice.roll""#).contains("unexpected end of input"));
    }

    #[test]
    fn unknown_type_is_named_without_echoing_input() {
        let detail = detail_for(r#"{"type": "dice.reroll", "playerId": "alice"}"#);
        assert_eq!(detail, "Unknown event type");
    }

    #[test]
    fn missing_field_is_named() {
        let detail = detail_for(r#"{"type": "dice.roll", "playerId": "alice"}"#);
        assert_eq!(detail, "Missing field 'rollValue'");
    }

    #[test]
    fn wrong_types_hide_values() {
        let detail = detail_for(r#"{"type": "dice.roll", "playerId": "alice", "rollValue": "six"}"#);
        assert!(detail.contains("wrong types"));
        assert!(!detail.contains("six"));
    }
}
