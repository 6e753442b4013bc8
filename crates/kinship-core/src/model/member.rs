use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An individual person belonging to exactly one family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub age: Option<i32>,
    pub occupation: Option<String>,
    pub contact: Option<String>,
    pub photo_url: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Every caller-controlled member field. Used both to create a member and
/// to fully replace an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberInput {
    pub family_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl MemberInput {
    pub fn new(family_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            family_id,
            name: name.into(),
            age: None,
            occupation: None,
            contact: None,
            photo_url: None,
            gender: None,
        }
    }
}

impl Member {
    pub fn create(input: MemberInput) -> Self {
        Self::from_input(Uuid::now_v7(), input, super::timestamp_now())
    }

    pub fn from_input(id: Uuid, input: MemberInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            family_id: input.family_id,
            name: input.name,
            age: input.age,
            occupation: input.occupation,
            contact: input.contact,
            photo_url: input.photo_url,
            gender: input.gender,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_input_requires_family_and_name() {
        let missing_name = serde_json::json!({"family_id": Uuid::now_v7()});
        assert!(serde_json::from_value::<MemberInput>(missing_name).is_err());

        let minimal = serde_json::json!({"family_id": Uuid::now_v7(), "name": "Amit"});
        let input: MemberInput = serde_json::from_value(minimal).unwrap();
        assert_eq!(input.name, "Amit");
        assert!(input.age.is_none());
    }

    #[test]
    fn test_absent_optional_fields_serialize_as_null() {
        let member = Member::create(MemberInput::new(Uuid::now_v7(), "Priya"));
        let json = serde_json::to_value(&member).unwrap();
        assert!(json["occupation"].is_null());
        assert!(json["photo_url"].is_null());
        assert_eq!(json["family_id"], member.family_id.to_string());
    }
}
