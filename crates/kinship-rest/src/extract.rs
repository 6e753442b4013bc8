//! Request extractors whose rejections use the `{"detail": ...}` error body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// `Json<T>` with a JSON error body on rejection.
///
/// Status codes are axum's: 415 without a JSON content type, 400 for
/// malformed JSON, 422 when the payload does not match `T`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(BodyRejection(rejection)),
        }
    }
}

#[derive(Debug)]
pub struct BodyRejection(JsonRejection);

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        let status = self.0.status();
        tracing::debug!(%status, "rejected request body: {}", self.0.body_text());
        (status, Json(serde_json::json!({"detail": self.0.body_text()}))).into_response()
    }
}

/// Parse an id taken from the URL. Any string is accepted as a path segment;
/// one that is not a UUID cannot name a stored record.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    #[derive(Debug, serde::Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        id: Uuid,
    }

    async fn extract(body: &str) -> Result<JsonBody<Payload>, BodyRejection> {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        JsonBody::<Payload>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_mismatched_payload_is_422_with_detail() {
        let rejection = extract(r#"{"id": "not-a-uuid"}"#).await.unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn test_broken_json_is_400() {
        let rejection = extract("{").await.unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id("not-a-uuid"), None);
        assert_eq!(parse_id(""), None);
    }
}
