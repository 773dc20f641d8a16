//! Request body extractors whose failures answer in the portal's JSON error
//! shape instead of axum's plain-text rejections.

use axum::{
    async_trait,
    body::{Bytes, HttpBody},
    extract::{FromRequest, RequestParts},
    BoxError, Json,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Error};

/// A JSON request body. Bad syntax, wrongly typed fields and a missing
/// `Content-Type` all reject with a 400 validation error.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<T, B> FromRequest<B> for AppJson<T>
where
    T: DeserializeOwned,
    B: HttpBody + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req)
            .await
            .map_err(|e| Error::validation(e.to_string()))?;
        Ok(Self(value))
    }
}

/// A JSON body the client may leave out. Only an empty body counts as absent;
/// anything else must parse.
pub struct OptionalJson<T>(pub Option<T>);

#[async_trait]
impl<T, B> FromRequest<B> for OptionalJson<T>
where
    T: DeserializeOwned,
    B: HttpBody + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = AppError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req)
            .await
            .map_err(|e| Error::validation(e.to_string()))?;
        Ok(Self(parse_optional(&body)?))
    }
}

fn parse_optional<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| Error::validation(format!("invalid request body: {e}")))
}
