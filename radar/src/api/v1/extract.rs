use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::response::{ApiResponse, ErrorCode};

/// Query string extractor that deserializes then runs `validator` rules.
/// Both failures are reported as `invalid_request` envelopes.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiResponse<()>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("Invalid query string: {}", rejection.body_text()),
                )
            })?;
        value.validate()?;
        Ok(Self(value))
    }
}
