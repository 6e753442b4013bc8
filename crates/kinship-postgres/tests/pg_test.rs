//! Runs only when `KINSHIP_TEST_POSTGRES_URL` points at a scratch database.

use kinship_core::error::Error;
use kinship_core::model::admin::AdminUser;
use kinship_core::model::family::{Family, NewFamily};
use kinship_core::model::member::{Member, MemberInput};
use kinship_core::model::relationship::{NewRelationship, Relationship};
use kinship_core::storage::StorageBackend;
use kinship_postgres::PgStorage;

async fn connect() -> Option<PgStorage> {
    let url = std::env::var("KINSHIP_TEST_POSTGRES_URL").ok()?;
    let storage = PgStorage::connect(&url).await.unwrap();
    let pool = sqlx::PgPool::connect(&url).await.unwrap();
    sqlx::query("TRUNCATE families, members, relationships, admin_users")
        .execute(&pool)
        .await
        .unwrap();
    Some(storage)
}

// Single test so the shared tables are not truncated under a concurrent run.
#[tokio::test]
async fn test_pg_storage_lifecycle() {
    let Some(storage) = connect().await else {
        eprintln!("KINSHIP_TEST_POSTGRES_URL not set, skipping");
        return;
    };

    let family = Family::create(NewFamily::new("शर्मा परिवार"));
    storage.insert_family(&family).await.unwrap();
    assert_eq!(storage.get_family(family.id).await.unwrap(), Some(family.clone()));

    let ram = Member::create(MemberInput::new(family.id, "राम"));
    let sita = Member::create(MemberInput::new(family.id, "सीता"));
    storage.insert_member(&ram).await.unwrap();
    storage.insert_member(&sita).await.unwrap();
    storage
        .insert_relationship(&Relationship::create(NewRelationship::new(ram.id, sita.id, "spouse")))
        .await
        .unwrap();

    let found = storage.search_members("%", 100).await.unwrap();
    assert!(found.is_empty());
    let found = storage.search_families("शर्मा", 100).await.unwrap();
    assert_eq!(found.len(), 1);

    let missing = uuid::Uuid::now_v7();
    assert!(matches!(
        storage.delete_member_cascade(missing).await,
        Err(Error::NotFound(_))
    ));
    assert_eq!(storage.list_relationships(100).await.unwrap().len(), 1);

    assert_eq!(storage.delete_member_cascade(ram.id).await.unwrap(), 1);
    assert!(storage.list_relationships(100).await.unwrap().is_empty());
    assert_eq!(storage.list_members(100).await.unwrap(), vec![sita]);

    let admin = AdminUser::new("admin".to_string(), "hash".to_string());
    storage.insert_admin_user(&admin).await.unwrap();
    let again = AdminUser::new("admin".to_string(), "other".to_string());
    assert!(matches!(
        storage.insert_admin_user(&again).await,
        Err(Error::Validation(_))
    ));
}
