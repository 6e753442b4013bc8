pub mod duckdb;
pub mod migrations;

use crate::error::Result;
use crate::model::admin::AdminUser;
use crate::model::family::Family;
use crate::model::member::{Member, MemberInput};
use crate::model::relationship::Relationship;
use uuid::Uuid;

/// A batch of records written together by [`StorageBackend::seed_if_empty`].
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub families: Vec<Family>,
    pub members: Vec<Member>,
    pub relationships: Vec<Relationship>,
}

/// Persistence seam for the record store.
///
/// List methods return records in creation order, truncated to `limit`.
/// Single-record writes are atomic. `delete_member_cascade` and
/// `seed_if_empty` are each atomic as a whole.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    // Families
    async fn insert_family(&self, family: &Family) -> Result<()>;
    async fn get_family(&self, id: Uuid) -> Result<Option<Family>>;
    async fn list_families(&self, limit: usize) -> Result<Vec<Family>>;

    // Members
    async fn insert_member(&self, member: &Member) -> Result<()>;
    /// Overwrite every mutable field of member `id`. Fails with `NotFound`
    /// when no such member exists; never inserts.
    async fn replace_member(&self, id: Uuid, input: &MemberInput) -> Result<Member>;
    async fn list_members(&self, limit: usize) -> Result<Vec<Member>>;
    async fn list_members_by_family(&self, family_id: Uuid, limit: usize) -> Result<Vec<Member>>;
    /// Remove every relationship touching `id`, then the member itself.
    /// Returns the number of relationships removed. When the member does not
    /// exist nothing is changed and `NotFound` is returned.
    async fn delete_member_cascade(&self, id: Uuid) -> Result<usize>;

    // Relationships
    async fn insert_relationship(&self, relationship: &Relationship) -> Result<()>;
    async fn list_relationships(&self, limit: usize) -> Result<Vec<Relationship>>;
    async fn list_relationships_for_member(
        &self,
        member_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Relationship>>;
    async fn delete_relationship(&self, id: Uuid) -> Result<()>;

    // Search (literal, case-insensitive substring)
    async fn search_members(&self, query: &str, limit: usize) -> Result<Vec<Member>>;
    async fn search_families(&self, query: &str, limit: usize) -> Result<Vec<Family>>;

    // Admin users
    async fn get_admin_user(&self, username: &str) -> Result<Option<AdminUser>>;
    /// Fails with `Validation` when the username is already taken.
    async fn insert_admin_user(&self, admin: &AdminUser) -> Result<()>;

    // Bulk seeding
    /// Write `data` only if there are no families yet. Returns whether
    /// anything was written.
    async fn seed_if_empty(&self, data: &SeedData) -> Result<bool>;
}
