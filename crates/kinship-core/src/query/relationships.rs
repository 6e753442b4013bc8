use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::relationship::{NewRelationship, Relationship};
use crate::query::{KinshipEngine, VerifiedAdmin};

pub async fn list(engine: &KinshipEngine) -> Result<Vec<Relationship>> {
    engine.storage.list_relationships(engine.list_limit).await
}

/// Relationships in which `member_id` appears on either side.
pub async fn list_for_member(engine: &KinshipEngine, member_id: Uuid) -> Result<Vec<Relationship>> {
    engine
        .storage
        .list_relationships_for_member(member_id, engine.list_limit)
        .await
}

// No checks that the members exist, differ, or that the same typed pair is
// not already recorded.
pub async fn create(
    engine: &KinshipEngine,
    admin: &VerifiedAdmin,
    input: NewRelationship,
) -> Result<Relationship> {
    let relationship = Relationship::create(input);
    engine.storage.insert_relationship(&relationship).await?;
    tracing::info!(
        relationship_id = %relationship.id,
        relationship_type = %relationship.relationship_type,
        admin = admin.username(),
        "relationship created"
    );
    Ok(relationship)
}

pub async fn delete(engine: &KinshipEngine, admin: &VerifiedAdmin, id: Uuid) -> Result<()> {
    engine
        .storage
        .delete_relationship(id)
        .await
        .map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("Relationship not found".to_string()),
            other => other,
        })?;
    tracing::info!(relationship_id = %id, admin = admin.username(), "relationship deleted");
    Ok(())
}
