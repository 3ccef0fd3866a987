//! Custom Axum extractors
//!
//! Wrap the stock `Json`, `Query` and `Path` extractors so every decoding
//! failure surfaces as [`ApiError::Validation`] (422) with the JSON error body.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use medreq_core::ValidationError;

use super::error::ApiError;

/// JSON body, rejected with 422 on any syntax, type or value error
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::Malformed {
                location: "body",
                reason: rejection.body_text(),
            })
        })?;
        Ok(Self(value))
    }
}

/// Query string, rejected with 422 when a parameter fails to parse
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    location: "query",
                    reason: rejection.body_text(),
                })
            })?;
        Ok(Self(value))
    }
}

/// Path parameters, rejected with 422 when an id is not an integer
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    location: "path",
                    reason: rejection.body_text(),
                })
            })?;
        Ok(Self(value))
    }
}
