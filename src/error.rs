use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::borrow::Cow;

use crate::models::ClubStatus;

/// Failures the portal reports to its callers.
///
/// Anything that is not one of these (store I/O, token encoding) travels as a
/// plain [`anyhow::Error`] and surfaces as a 500.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(Cow<'static, str>),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(Cow<'static, str>),
    #[error("cannot {action} a {from} club")]
    InvalidTransition {
        from: ClubStatus,
        action: &'static str,
    },
    #[error("{0}")]
    Conflict(Cow<'static, str>),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) | Error::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    pub fn validation(msg: impl Into<Cow<'static, str>>) -> Self {
        Error::Validation(msg.into())
    }
}

/// Trims `value` and rejects it when nothing is left.
pub fn required(value: &str, field: &'static str) -> Result<String, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

pub enum AppError {
    InternalServerError(anyhow::Error),
    ResponseStatusError(StatusCode, Cow<'static, str>),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct AppErrorResponse {
            status: u16,
            error: Cow<'static, str>,
        }

        match self {
            AppError::InternalServerError(err) => {
                tracing::error!("request failed: {err:#}");
                AppError::from(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    .into_response()
            }
            AppError::ResponseStatusError(code, s) => (
                code,
                Json(AppErrorResponse {
                    status: code.as_u16(),
                    error: s,
                }),
            )
                .into_response(),
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> AppError {
        match e.into().downcast::<Error>() {
            Ok(err) => AppError::ResponseStatusError(err.status_code(), err.to_string().into()),
            Err(err) => AppError::InternalServerError(err),
        }
    }
}

impl AppError {
    pub fn from(code: StatusCode, s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::ResponseStatusError(code, s.into())
    }
}
