pub mod admin;
pub mod families;
pub mod members;
pub mod relationships;
pub mod search;
pub mod seed;

use std::sync::Arc;

use uuid::Uuid;

use crate::config::{DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, KinshipConfig};
use crate::error::Result;
use crate::model::SearchResults;
use crate::model::admin::AdminCredentials;
use crate::model::family::{Family, NewFamily};
use crate::model::member::{Member, MemberInput};
use crate::model::relationship::{NewRelationship, Relationship};
use crate::storage::StorageBackend;

pub use admin::VerifiedAdmin;
pub use seed::SeedOutcome;

/// The record store. Holds the storage backend and result caps; shared by
/// every request handler as `Arc<KinshipEngine>`.
pub struct KinshipEngine {
    pub storage: Arc<dyn StorageBackend>,
    pub list_limit: usize,
    pub search_limit: usize,
}

impl KinshipEngine {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            list_limit: DEFAULT_LIST_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_config(mut self, config: &KinshipConfig) -> Self {
        self.list_limit = config.list_limit;
        self.search_limit = config.search_limit;
        self
    }

    // Families

    pub async fn list_families(&self) -> Result<Vec<Family>> {
        families::list(self).await
    }

    pub async fn get_family(&self, id: Uuid) -> Result<Family> {
        families::get(self, id).await
    }

    pub async fn create_family(&self, input: NewFamily) -> Result<Family> {
        families::create(self, input).await
    }

    // Members

    pub async fn list_members(&self) -> Result<Vec<Member>> {
        members::list(self).await
    }

    pub async fn list_family_members(&self, family_id: Uuid) -> Result<Vec<Member>> {
        members::list_by_family(self, family_id).await
    }

    pub async fn create_member(&self, admin: &VerifiedAdmin, input: MemberInput) -> Result<Member> {
        members::create(self, admin, input).await
    }

    pub async fn update_member(
        &self,
        admin: &VerifiedAdmin,
        id: Uuid,
        input: MemberInput,
    ) -> Result<Member> {
        members::update(self, admin, id, input).await
    }

    pub async fn delete_member(&self, admin: &VerifiedAdmin, id: Uuid) -> Result<usize> {
        members::delete(self, admin, id).await
    }

    // Relationships

    pub async fn list_relationships(&self) -> Result<Vec<Relationship>> {
        relationships::list(self).await
    }

    pub async fn list_member_relationships(&self, member_id: Uuid) -> Result<Vec<Relationship>> {
        relationships::list_for_member(self, member_id).await
    }

    pub async fn create_relationship(
        &self,
        admin: &VerifiedAdmin,
        input: NewRelationship,
    ) -> Result<Relationship> {
        relationships::create(self, admin, input).await
    }

    pub async fn delete_relationship(&self, admin: &VerifiedAdmin, id: Uuid) -> Result<()> {
        relationships::delete(self, admin, id).await
    }

    // Search

    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        search::execute(self, query).await
    }

    // Admin

    pub async fn setup_admin(&self, credentials: AdminCredentials) -> Result<()> {
        admin::setup(self, credentials).await
    }

    pub async fn verify_admin(&self, credentials: AdminCredentials) -> Result<VerifiedAdmin> {
        admin::verify(self, credentials).await
    }

    // Seeding

    pub async fn initialize_sample_data(&self) -> Result<SeedOutcome> {
        seed::initialize(self).await
    }
}
