use crate::error::{Error, Result};
use crate::model::admin::{AdminCredentials, AdminUser};
use crate::password::{hash_password, verify_password};
use crate::query::KinshipEngine;

const INVALID_CREDENTIALS: &str = "Invalid admin credentials";

/// Proof that a caller presented valid admin credentials.
///
/// Only [`verify`] constructs this, so every engine operation that takes a
/// `&VerifiedAdmin` has been authenticated before it touches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAdmin {
    username: String,
}

impl VerifiedAdmin {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Create an admin account. Rejects a username that already exists.
pub async fn setup(engine: &KinshipEngine, credentials: AdminCredentials) -> Result<()> {
    if engine
        .storage
        .get_admin_user(&credentials.username)
        .await?
        .is_some()
    {
        return Err(Error::Validation("Admin user already exists".to_string()));
    }

    let AdminCredentials { username, password } = credentials;
    // PBKDF2 at 100k rounds is CPU-bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await?;

    let admin = AdminUser::new(username, password_hash);
    engine.storage.insert_admin_user(&admin).await?;
    tracing::info!(username = %admin.username, "admin user created");
    Ok(())
}

/// Check credentials against the stored salted hash.
pub async fn verify(
    engine: &KinshipEngine,
    credentials: AdminCredentials,
) -> Result<VerifiedAdmin> {
    let Some(admin) = engine.storage.get_admin_user(&credentials.username).await? else {
        tracing::warn!(username = %credentials.username, "admin login for unknown user");
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let AdminCredentials { password, .. } = credentials;
    let stored = admin.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?;
    if !valid {
        tracing::warn!(username = %admin.username, "admin login with wrong password");
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(VerifiedAdmin {
        username: admin.username,
    })
}
