/*
 * Responsibility
 * - the single failure path every post handler funnels through
 * - report the error to the process-level collaborator (tracing), then
 *   render 400 with the operation's failure envelope
 */
use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Serializes as `{}`, for envelopes whose failure slot is an empty object.
#[derive(Debug, Serialize)]
pub struct Empty {}

/// Human-readable message embedding the raw error, as clients expect it.
pub fn error_message(err: &dyn Display) -> String {
    format!("Error is: {err}")
}

pub fn report(operation: &'static str, err: &dyn Display) {
    tracing::error!(operation, error = %err, "request failed");
}

/// Report, then answer 400 with the per-operation failure body. Every
/// failure class (validation, malformed id, driver error) takes this path.
pub fn fail<B: Serialize>(operation: &'static str, err: &dyn Display, body: B) -> Response {
    report(operation, err);
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_embeds_the_raw_error() {
        assert_eq!(error_message(&"boom"), "Error is: boom");
    }

    #[test]
    fn empty_serializes_as_an_empty_object() {
        assert_eq!(serde_json::to_string(&Empty {}).unwrap(), "{}");
    }
}
