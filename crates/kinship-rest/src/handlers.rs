use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::WWW_AUTHENTICATE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use kinship_core::error::Error as CoreError;
use kinship_core::model::SearchResults;
use kinship_core::model::admin::AdminCredentials;
use kinship_core::model::family::{Family, NewFamily};
use kinship_core::model::member::{Member, MemberInput};
use kinship_core::model::relationship::{NewRelationship, Relationship};
use kinship_core::query::KinshipEngine;

use crate::auth::AdminAuth;
use crate::extract::{JsonBody, parse_id};

type AppState = Arc<KinshipEngine>;

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(CoreError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self.0 {
            CoreError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            CoreError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            CoreError::Unauthorized(m) => {
                let body = Json(serde_json::json!({"detail": m}));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(WWW_AUTHENTICATE, "Basic")],
                    body,
                )
                    .into_response();
            }
            other => {
                tracing::error!("internal error: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({"detail": msg}))).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        AppError(e)
    }
}

fn member_not_found() -> CoreError {
    CoreError::NotFound("Member not found".to_string())
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": text}))
}

// ---------------------------------------------------------------------------
// Query helper structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/
pub async fn root_handler() -> Json<serde_json::Value> {
    message("Family Tree API")
}

/// GET /api/health
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/families
pub async fn list_families_handler(
    State(engine): State<AppState>,
) -> Result<Json<Vec<Family>>, AppError> {
    Ok(Json(engine.list_families().await?))
}

/// POST /api/families -- open to anyone.
pub async fn create_family_handler(
    State(engine): State<AppState>,
    JsonBody(input): JsonBody<NewFamily>,
) -> Result<Json<Family>, AppError> {
    Ok(Json(engine.create_family(input).await?))
}

/// GET /api/families/{id}
pub async fn get_family_handler(
    State(engine): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Family>, AppError> {
    let id = parse_id(&id).ok_or_else(|| CoreError::NotFound("Family not found".to_string()))?;
    Ok(Json(engine.get_family(id).await?))
}

/// GET /api/families/{id}/members
pub async fn family_members_handler(
    State(engine): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Member>>, AppError> {
    match parse_id(&id) {
        Some(id) => Ok(Json(engine.list_family_members(id).await?)),
        None => Ok(Json(Vec::new())),
    }
}

/// GET /api/members
pub async fn list_members_handler(
    State(engine): State<AppState>,
) -> Result<Json<Vec<Member>>, AppError> {
    Ok(Json(engine.list_members().await?))
}

/// POST /api/members -- admin only.
pub async fn create_member_handler(
    State(engine): State<AppState>,
    AdminAuth(admin): AdminAuth,
    JsonBody(input): JsonBody<MemberInput>,
) -> Result<Json<Member>, AppError> {
    Ok(Json(engine.create_member(&admin, input).await?))
}

/// PUT /api/members/{id} -- admin only, full replacement.
pub async fn update_member_handler(
    State(engine): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<MemberInput>,
) -> Result<Json<Member>, AppError> {
    let id = parse_id(&id).ok_or_else(member_not_found)?;
    Ok(Json(engine.update_member(&admin, id, input).await?))
}

/// DELETE /api/members/{id} -- admin only; also removes the member's relationships.
pub async fn delete_member_handler(
    State(engine): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id).ok_or_else(member_not_found)?;
    engine.delete_member(&admin, id).await?;
    Ok(message("Member deleted successfully"))
}

/// GET /api/members/{id}/relationships
pub async fn member_relationships_handler(
    State(engine): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Relationship>>, AppError> {
    match parse_id(&id) {
        Some(id) => Ok(Json(engine.list_member_relationships(id).await?)),
        None => Ok(Json(Vec::new())),
    }
}

/// GET /api/relationships
pub async fn list_relationships_handler(
    State(engine): State<AppState>,
) -> Result<Json<Vec<Relationship>>, AppError> {
    Ok(Json(engine.list_relationships().await?))
}

/// POST /api/relationships -- admin only.
pub async fn create_relationship_handler(
    State(engine): State<AppState>,
    AdminAuth(admin): AdminAuth,
    JsonBody(input): JsonBody<NewRelationship>,
) -> Result<Json<Relationship>, AppError> {
    Ok(Json(engine.create_relationship(&admin, input).await?))
}

/// DELETE /api/relationships/{id} -- admin only.
pub async fn delete_relationship_handler(
    State(engine): State<AppState>,
    AdminAuth(admin): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)
        .ok_or_else(|| CoreError::NotFound("Relationship not found".to_string()))?;
    engine.delete_relationship(&admin, id).await?;
    Ok(message("Relationship deleted successfully"))
}

/// GET /api/search?q=... -- a missing `q` searches for the empty string.
pub async fn search_handler(
    State(engine): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    let query = params.q.unwrap_or_default();
    Ok(Json(engine.search(&query).await?))
}

/// POST /api/admin/setup
pub async fn admin_setup_handler(
    State(engine): State<AppState>,
    JsonBody(credentials): JsonBody<AdminCredentials>,
) -> Result<Json<serde_json::Value>, AppError> {
    engine.setup_admin(credentials).await?;
    Ok(message("Admin user created successfully"))
}

/// GET /api/admin/verify
pub async fn admin_verify_handler(AdminAuth(admin): AdminAuth) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Admin verified",
        "username": admin.username(),
    }))
}

/// POST /api/initialize -- seed sample data into an empty store.
pub async fn initialize_handler(
    State(engine): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = engine.initialize_sample_data().await?;
    Ok(message(outcome.message()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: CoreError) -> (StatusCode, Option<String>, serde_json::Value) {
        let response = AppError(err).into_response();
        let status = response.status();
        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, challenge, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let (status, _, body) = render(CoreError::NotFound("Member not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Member not found");

        let (status, _, _) = render(CoreError::Validation("dup".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unauthorized_carries_basic_challenge() {
        let (status, challenge, body) =
            render(CoreError::Unauthorized("Invalid admin credentials".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(challenge.as_deref(), Some("Basic"));
        assert_eq!(body["detail"], "Invalid admin credentials");
    }

    #[tokio::test]
    async fn test_internal_errors_are_not_leaked() {
        let (status, _, body) = render(CoreError::Storage("disk on fire".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "internal server error");
    }
}
