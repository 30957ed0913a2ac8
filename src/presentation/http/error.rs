// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError, error::FieldErrors};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

#[derive(Debug)]
pub enum HttpError {
    /// 422 with per-field messages.
    Validation(FieldErrors),
    /// Everything else: a status and a single message.
    Plain(StatusCode, String),
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(fields) => Self::Validation(fields),
            ApplicationError::NotFound(msg) => Self::Plain(StatusCode::NOT_FOUND, msg),
            // The source system reports conflicts as plain bad requests.
            ApplicationError::Conflict(msg) => Self::Plain(StatusCode::BAD_REQUEST, msg),
            ApplicationError::Unauthorized(msg) => Self::Plain(StatusCode::UNAUTHORIZED, msg),
            ApplicationError::Forbidden(msg) => Self::Plain(StatusCode::FORBIDDEN, msg),
            ApplicationError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "request failed");
                Self::Plain(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".into(),
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "status": "error", "errors": errors })),
            )
                .into_response(),
            HttpError::Plain(status, message) => (
                status,
                Json(ErrorBody {
                    status: "error".into(),
                    message,
                }),
            )
                .into_response(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: String,
    message: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
