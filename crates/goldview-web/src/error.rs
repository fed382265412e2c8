use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use goldview_core::{ConfigError, SourceError};
use serde_json::json;
use thiserror::Error;

/// Request failure. Only the message crosses the HTTP boundary.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] SourceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.message() })),
        )
            .into_response()
    }
}

/// Startup and serve failures for the binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use goldview_core::GoldviewConfig;

    use super::*;

    #[test]
    fn config_failure_message_names_the_variable() {
        let config_error = GoldviewConfig::from_lookup(|var| {
            (var == "GOLDVIEW_TIMEOUT_MS").then(|| String::from("soon"))
        })
        .expect_err("non-numeric timeout");

        let message = ServerError::from(config_error).to_string();

        assert!(message.starts_with("configuration error: "));
        assert!(message.contains("GOLDVIEW_TIMEOUT_MS"));
    }
}
