use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shift_core::ShiftError;

// ---------------------------------------------------------------------------
// Internal sentinels carried through the anyhow chain
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `ShiftError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Sentinel for a missing or unusable server-side configuration value
/// (the provider API key). The response body stays generic so the key
/// situation is never described to clients; the cause goes to the log.
#[derive(Debug)]
struct ConfigError(String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Sentinel for an upstream provider failure, answered with 500.
///
/// Each proxy endpoint supplies its own generic body (`public`); the
/// provider's actual status and message go to the log only.
#[derive(Debug)]
struct UpstreamError {
    public: &'static str,
    detail: String,
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for UpstreamError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 500 with a generic body; `detail` is logged only.
    pub fn config(detail: impl Into<String>) -> Self {
        Self(ConfigError(detail.into()).into())
    }

    /// Construct a 500 for a failed provider call. `public` is the body the
    /// client sees; `detail` is logged only.
    pub fn upstream(public: &'static str, detail: impl Into<String>) -> Self {
        Self(
            UpstreamError {
                public,
                detail: detail.into(),
            }
            .into(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Check for explicit sentinel types before falling through to ShiftError.
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }
        if let Some(c) = self.0.downcast_ref::<ConfigError>() {
            tracing::error!("configuration error: {}", c.0);
            let body = serde_json::json!({ "error": "Server configuration error" });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        }
        if let Some(u) = self.0.downcast_ref::<UpstreamError>() {
            tracing::error!("provider error: {}", u.detail);
            let body = serde_json::json!({ "error": u.public });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<ShiftError>() {
            match e {
                ShiftError::TaskNotFound(_) | ShiftError::TimelineNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ShiftError::LastTimeline | ShiftError::NothingToExport(_) => StatusCode::CONFLICT,
                ShiftError::EmptyTaskText
                | ShiftError::EmptyTimelineName
                | ShiftError::UnknownPlatform(_)
                | ShiftError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                ShiftError::Io(_) | ShiftError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
