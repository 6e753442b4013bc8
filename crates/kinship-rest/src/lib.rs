pub mod auth;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use kinship_core::query::KinshipEngine;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Environment variable holding the allowed CORS origins.
pub const CORS_ORIGINS_ENV: &str = "KINSHIP_CORS_ORIGINS";

/// Construct the full Axum router for the Kinship REST API.
///
/// All routes are nested under `/api/` and the router carries
/// `Arc<KinshipEngine>` as shared state.
///
/// Allowed CORS origins come from `KINSHIP_CORS_ORIGINS`: a comma-separated
/// list of origins, or `*` for any origin (the default when unset).
pub fn router(engine: Arc<KinshipEngine>) -> Router {
    let origins = std::env::var(CORS_ORIGINS_ENV).ok();
    router_with_origins(engine, origins.as_deref())
}

/// Same as [`router`] with the CORS origin list passed explicitly.
pub fn router_with_origins(engine: Arc<KinshipEngine>, origins: Option<&str>) -> Router {
    let cors = build_cors_layer(origins);

    Router::new()
        .route("/api", get(handlers::root_handler))
        .route("/api/", get(handlers::root_handler))
        .route("/api/health", get(handlers::health_handler))
        .route(
            "/api/families",
            get(handlers::list_families_handler).post(handlers::create_family_handler),
        )
        .route("/api/families/{id}", get(handlers::get_family_handler))
        .route(
            "/api/families/{id}/members",
            get(handlers::family_members_handler),
        )
        .route(
            "/api/members",
            get(handlers::list_members_handler).post(handlers::create_member_handler),
        )
        .route(
            "/api/members/{id}",
            put(handlers::update_member_handler).delete(handlers::delete_member_handler),
        )
        .route(
            "/api/members/{id}/relationships",
            get(handlers::member_relationships_handler),
        )
        .route(
            "/api/relationships",
            get(handlers::list_relationships_handler).post(handlers::create_relationship_handler),
        )
        .route(
            "/api/relationships/{id}",
            delete(handlers::delete_relationship_handler),
        )
        .route("/api/search", get(handlers::search_handler))
        .route("/api/admin/setup", post(handlers::admin_setup_handler))
        .route("/api/admin/verify", get(handlers::admin_verify_handler))
        .route("/api/initialize", post(handlers::initialize_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB max request body
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(engine)
}

fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    use axum::http::{HeaderName, HeaderValue, Method};

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
        ])
        .max_age(std::time::Duration::from_secs(3600));

    let entries: Vec<&str> = origins
        .unwrap_or("*")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() || entries.contains(&"*") {
        // Credentials cannot be combined with a wildcard origin.
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = entries
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = %s, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(origins).allow_credentials(true)
}
