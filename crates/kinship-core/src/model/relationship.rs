use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed pairing of two members. `relationship_type` is free text
/// ("father", "spouse", "friend", ...); no closed set is enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: Uuid,
    pub member1_id: Uuid,
    pub member2_id: Uuid,
    pub relationship_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelationship {
    pub member1_id: Uuid,
    pub member2_id: Uuid,
    pub relationship_type: String,
}

impl NewRelationship {
    pub fn new(member1_id: Uuid, member2_id: Uuid, relationship_type: impl Into<String>) -> Self {
        Self {
            member1_id,
            member2_id,
            relationship_type: relationship_type.into(),
        }
    }
}

impl Relationship {
    pub fn create(input: NewRelationship) -> Self {
        Self {
            id: Uuid::now_v7(),
            member1_id: input.member1_id,
            member2_id: input.member2_id,
            relationship_type: input.relationship_type,
            created_at: super::timestamp_now(),
        }
    }
}
