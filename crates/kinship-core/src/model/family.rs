use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named household that owns zero or more members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFamily {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Family {
    /// Materialize a new family with a fresh id and the current time.
    pub fn create(input: NewFamily) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            created_at: super::timestamp_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_family_description_is_optional() {
        let input: NewFamily = serde_json::from_str(r#"{"name": "Gupta"}"#).unwrap();
        assert_eq!(input.name, "Gupta");
        assert!(input.description.is_none());
    }

    #[test]
    fn test_family_json_uses_iso8601_timestamp() {
        let family = Family::create(NewFamily::new("Sharma").with_description("farmers"));
        let json = serde_json::to_value(&family).unwrap();
        let ts = json["created_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
        assert_eq!(json["id"], family.id.to_string());
        assert_eq!(json["description"], "farmers");
    }
}
