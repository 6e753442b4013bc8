//! HTTP Basic authentication for admin-only routes.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use kinship_core::error::Error as CoreError;
use kinship_core::model::admin::AdminCredentials;
use kinship_core::query::{KinshipEngine, VerifiedAdmin};

use crate::handlers::AppError;

/// Extractor for admin-gated handlers.
///
/// Reads `Authorization: Basic ...` and verifies it against the stored
/// admin hash. Place it before any body extractor so a rejected request
/// never reaches the mutation.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub VerifiedAdmin);

impl FromRequestParts<Arc<KinshipEngine>> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        engine: &Arc<KinshipEngine>,
    ) -> Result<Self, Self::Rejection> {
        let credentials = basic_credentials(&parts.headers)?;
        let admin = engine.verify_admin(credentials).await?;
        Ok(AdminAuth(admin))
    }
}

/// Decode HTTP Basic credentials from request headers.
pub fn basic_credentials(headers: &HeaderMap) -> Result<AdminCredentials, CoreError> {
    let not_authenticated = || CoreError::Unauthorized("Not authenticated".to_string());
    let invalid = || CoreError::Unauthorized("Invalid authentication credentials".to_string());

    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(not_authenticated)?
        .to_str()
        .map_err(|_| invalid())?;

    let (scheme, encoded) = value.trim().split_once(' ').ok_or_else(not_authenticated)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(not_authenticated());
    }

    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| invalid())?;
    let decoded = String::from_utf8(decoded).map_err(|_| invalid())?;
    let (username, password) = decoded.split_once(':').ok_or_else(invalid)?;
    Ok(AdminCredentials::new(username, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_decodes_basic_credentials() {
        let encoded = STANDARD.encode("admin:admin123");
        let creds = basic_credentials(&headers_with(&format!("Basic {encoded}"))).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "admin123");
    }

    #[test]
    fn test_password_may_contain_colons() {
        let encoded = STANDARD.encode("admin:a:b:c");
        let creds = basic_credentials(&headers_with(&format!("basic {encoded}"))).unwrap();
        assert_eq!(creds.password, "a:b:c");
    }

    #[test]
    fn test_rejects_missing_and_malformed_headers() {
        assert!(matches!(
            basic_credentials(&HeaderMap::new()),
            Err(CoreError::Unauthorized(_))
        ));
        assert!(basic_credentials(&headers_with("Bearer abc")).is_err());
        assert!(basic_credentials(&headers_with("Basic !!!")).is_err());
        let no_colon = STANDARD.encode("adminonly");
        assert!(basic_credentials(&headers_with(&format!("Basic {no_colon}"))).is_err());
    }
}
