use crate::error::Result;
use crate::model::SearchResults;
use crate::query::KinshipEngine;

/// Case-insensitive literal substring search.
///
/// Members match on name or occupation, families on name. Each list is
/// capped at the engine's search limit. The empty query matches everything.
pub async fn execute(engine: &KinshipEngine, query: &str) -> Result<SearchResults> {
    let members = engine
        .storage
        .search_members(query, engine.search_limit)
        .await?;
    let families = engine
        .storage
        .search_families(query, engine.search_limit)
        .await?;
    tracing::debug!(
        query,
        members = members.len(),
        families = families.len(),
        "search"
    );
    Ok(SearchResults { members, families })
}
