use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::member::{Member, MemberInput};
use crate::query::{KinshipEngine, VerifiedAdmin};

pub async fn list(engine: &KinshipEngine) -> Result<Vec<Member>> {
    engine.storage.list_members(engine.list_limit).await
}

pub async fn list_by_family(engine: &KinshipEngine, family_id: Uuid) -> Result<Vec<Member>> {
    engine
        .storage
        .list_members_by_family(family_id, engine.list_limit)
        .await
}

// `family_id` is stored as given; a member may point at a family that does
// not (or no longer) exist.
pub async fn create(
    engine: &KinshipEngine,
    admin: &VerifiedAdmin,
    input: MemberInput,
) -> Result<Member> {
    let member = Member::create(input);
    engine.storage.insert_member(&member).await?;
    tracing::info!(
        member_id = %member.id,
        family_id = %member.family_id,
        admin = admin.username(),
        "member created"
    );
    Ok(member)
}

/// Full replacement of a member's fields. The id and creation time are kept.
pub async fn update(
    engine: &KinshipEngine,
    admin: &VerifiedAdmin,
    id: Uuid,
    input: MemberInput,
) -> Result<Member> {
    let member = engine
        .storage
        .replace_member(id, &input)
        .await
        .map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("Member not found".to_string()),
            other => other,
        })?;
    tracing::info!(member_id = %id, admin = admin.username(), "member updated");
    Ok(member)
}

/// Delete a member together with every relationship that references it.
/// Returns how many relationships were removed.
pub async fn delete(engine: &KinshipEngine, admin: &VerifiedAdmin, id: Uuid) -> Result<usize> {
    let purged = engine
        .storage
        .delete_member_cascade(id)
        .await
        .map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("Member not found".to_string()),
            other => other,
        })?;
    tracing::info!(
        member_id = %id,
        relationships_removed = purged,
        admin = admin.username(),
        "member deleted"
    );
    Ok(purged)
}
