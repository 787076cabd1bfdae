//! Request body extractor accepting form or JSON bodies.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::web::error::ApiError;

/// A body extractor that accepts `application/x-www-form-urlencoded` and
/// JSON bodies alike.
///
/// Anything that is not declared as a form is decoded as JSON, whatever its
/// content type. An empty body yields `T::default()`. A body that cannot be
/// decoded is answered with the invalid-params outcome.
///
/// # Example
///
/// ```ignore
/// use listgate::web::dto::{MemberRequest, Payload};
///
/// async fn subscribe(Payload(request): Payload<MemberRequest>) -> Json<Outcome> {
///     // ...
/// }
/// ```
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
                tracing::debug!("Rejected form body: {}", e);
                ApiError::invalid_params()
            })?;
            return Ok(Payload(value));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Failed to read request body: {}", e);
            ApiError::invalid_params()
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes).map_err(|e| {
            tracing::debug!("Rejected JSON body: {}", e);
            ApiError::invalid_params()
        })?;
        Ok(Payload(value))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}
