use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A credential principal allowed to mutate members and relationships.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            username,
            password_hash,
            created_at: super::timestamp_now(),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let admin = AdminUser::new("admin".to_string(), "deadbeef".to_string());
        let json = serde_json::to_value(&admin).unwrap();
        assert_eq!(json["username"], "admin");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = AdminCredentials::new("admin", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
