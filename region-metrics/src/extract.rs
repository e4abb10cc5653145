use crate::error::MetricsError;
use axum::{
    async_trait,
    body::{Bytes, HttpBody},
    extract::FromRequest,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    BoxError, Json,
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// JSON body extractor that also parses bodies sent without a
/// `Content-Type` header. A header naming another media type is still
/// rejected with 415.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Rejection = MetricsError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        if req.headers().contains_key(CONTENT_TYPE) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            return Ok(JsonBody(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| MetricsError::InvalidRequest {
                status: rejection.status(),
                detail: rejection.body_text(),
            })?;
        let value = serde_json::from_slice(&bytes).map_err(|e| match e.classify() {
            Category::Data => MetricsError::InvalidRequest {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                detail: format!("Failed to deserialize the JSON body into the target type: {}", e),
            },
            _ => MetricsError::InvalidRequest {
                status: StatusCode::BAD_REQUEST,
                detail: format!("Failed to parse the request body as JSON: {}", e),
            },
        })?;
        Ok(JsonBody(value))
    }
}
