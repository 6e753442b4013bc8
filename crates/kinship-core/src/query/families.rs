use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::family::{Family, NewFamily};
use crate::query::KinshipEngine;

pub async fn list(engine: &KinshipEngine) -> Result<Vec<Family>> {
    engine.storage.list_families(engine.list_limit).await
}

pub async fn get(engine: &KinshipEngine, id: Uuid) -> Result<Family> {
    engine
        .storage
        .get_family(id)
        .await?
        .ok_or_else(|| Error::NotFound("Family not found".to_string()))
}

/// Family names are not unique; creating "Gupta" twice yields two families.
pub async fn create(engine: &KinshipEngine, input: NewFamily) -> Result<Family> {
    let family = Family::create(input);
    engine.storage.insert_family(&family).await?;
    tracing::info!(family_id = %family.id, name = %family.name, "family created");
    Ok(family)
}
