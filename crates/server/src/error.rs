use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Unified API error type.
///
/// Produces `{"error": "<message>"}` JSON responses.
#[derive(Debug)]
pub struct ApiErr {
    status: StatusCode,
    message: String,
}

impl ApiErr {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(allpi_api::ApiError {
                error: self.message,
            }),
        )
            .into_response()
    }
}
