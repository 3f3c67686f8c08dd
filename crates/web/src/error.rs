use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures while producing an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("failed to render template: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!("{self}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
    }
}
