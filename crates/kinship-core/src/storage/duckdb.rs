use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::types::Type;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::admin::AdminUser;
use crate::model::family::Family;
use crate::model::member::{Member, MemberInput};
use crate::model::relationship::Relationship;
use crate::storage::{SeedData, StorageBackend};

const FAMILY_COLUMNS: &str = "id, name, description, created_at";
const MEMBER_COLUMNS: &str =
    "id, family_id, name, age, occupation, contact, photo_url, gender, created_at";
const RELATIONSHIP_COLUMNS: &str = "id, member1_id, member2_id, relationship_type, created_at";

/// Embedded DuckDB record store. A single connection is shared behind a
/// mutex, so statements issued through one `DuckDbStorage` never interleave.
pub struct DuckDbStorage {
    conn: Arc<Mutex<duckdb::Connection>>,
}

impl DuckDbStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = duckdb::Connection::open(path)?;
        super::migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = duckdb::Connection::open_in_memory()?;
        super::migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(idx: usize, e: E) -> duckdb::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn get_uuid(row: &duckdb::Row<'_>, idx: usize) -> duckdb::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn get_timestamp(row: &duckdb::Row<'_>, idx: usize) -> duckdb::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn row_to_family(row: &duckdb::Row<'_>) -> duckdb::Result<Family> {
    Ok(Family {
        id: get_uuid(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: get_timestamp(row, 3)?,
    })
}

fn row_to_member(row: &duckdb::Row<'_>) -> duckdb::Result<Member> {
    Ok(Member {
        id: get_uuid(row, 0)?,
        family_id: get_uuid(row, 1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        occupation: row.get(4)?,
        contact: row.get(5)?,
        photo_url: row.get(6)?,
        gender: row.get(7)?,
        created_at: get_timestamp(row, 8)?,
    })
}

fn row_to_relationship(row: &duckdb::Row<'_>) -> duckdb::Result<Relationship> {
    Ok(Relationship {
        id: get_uuid(row, 0)?,
        member1_id: get_uuid(row, 1)?,
        member2_id: get_uuid(row, 2)?,
        relationship_type: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
    })
}

fn row_to_admin(row: &duckdb::Row<'_>) -> duckdb::Result<AdminUser> {
    Ok(AdminUser {
        id: get_uuid(row, 0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: get_timestamp(row, 3)?,
    })
}

fn collect_rows<T>(rows: impl Iterator<Item = duckdb::Result<T>>) -> Result<Vec<T>> {
    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| Error::Storage(e.to_string()))?);
    }
    Ok(results)
}

// Insert helpers take a plain connection so they run equally inside a
// transaction (which derefs to `Connection`).

fn insert_family_row(conn: &duckdb::Connection, family: &Family) -> Result<()> {
    conn.execute(
        "INSERT INTO families (id, name, description, created_at) VALUES (?, ?, ?, ?)",
        duckdb::params![
            family.id.to_string(),
            family.name,
            family.description,
            format_timestamp(&family.created_at),
        ],
    )?;
    Ok(())
}

fn insert_member_row(conn: &duckdb::Connection, member: &Member) -> Result<()> {
    conn.execute(
        "INSERT INTO members (id, family_id, name, age, occupation, contact, photo_url, gender, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        duckdb::params![
            member.id.to_string(),
            member.family_id.to_string(),
            member.name,
            member.age,
            member.occupation,
            member.contact,
            member.photo_url,
            member.gender,
            format_timestamp(&member.created_at),
        ],
    )?;
    Ok(())
}

fn insert_relationship_row(conn: &duckdb::Connection, relationship: &Relationship) -> Result<()> {
    conn.execute(
        "INSERT INTO relationships (id, member1_id, member2_id, relationship_type, created_at) VALUES (?, ?, ?, ?, ?)",
        duckdb::params![
            relationship.id.to_string(),
            relationship.member1_id.to_string(),
            relationship.member2_id.to_string(),
            relationship.relationship_type,
            format_timestamp(&relationship.created_at),
        ],
    )?;
    Ok(())
}

fn select_member(conn: &duckdb::Connection, id: Uuid) -> Result<Option<Member>> {
    let mut stmt = conn.prepare(&format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?"))?;
    match stmt.query_row([id.to_string()], row_to_member) {
        Ok(member) => Ok(Some(member)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::Storage(e.to_string())),
    }
}

fn count_rows(conn: &duckdb::Connection, table: &str) -> Result<usize> {
    let mut stmt = conn.prepare(&format!("SELECT COUNT(*) FROM {table}"))?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    Ok(count as usize)
}

#[async_trait::async_trait]
impl StorageBackend for DuckDbStorage {
    async fn insert_family(&self, family: &Family) -> Result<()> {
        let conn = self.conn.lock().await;
        insert_family_row(&conn, family)
    }

    async fn get_family(&self, id: Uuid) -> Result<Option<Family>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare(&format!("SELECT {FAMILY_COLUMNS} FROM families WHERE id = ?"))?;
        match stmt.query_row([id.to_string()], row_to_family) {
            Ok(family) => Ok(Some(family)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::Storage(e.to_string())),
        }
    }

    async fn list_families(&self, limit: usize) -> Result<Vec<Family>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FAMILY_COLUMNS} FROM families ORDER BY created_at ASC, id ASC LIMIT ?"
        ))?;
        let rows = stmt.query_map([limit as i64], row_to_family)?;
        collect_rows(rows)
    }

    async fn insert_member(&self, member: &Member) -> Result<()> {
        let conn = self.conn.lock().await;
        insert_member_row(&conn, member)
    }

    async fn replace_member(&self, id: Uuid, input: &MemberInput) -> Result<Member> {
        let conn = self.conn.lock().await;
        let affected = conn.execute(
            "UPDATE members SET family_id=?, name=?, age=?, occupation=?, contact=?, photo_url=?, gender=? WHERE id=?",
            duckdb::params![
                input.family_id.to_string(),
                input.name,
                input.age,
                input.occupation,
                input.contact,
                input.photo_url,
                input.gender,
                id.to_string(),
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("member {id} not found")));
        }
        select_member(&conn, id)?
            .ok_or_else(|| Error::NotFound(format!("member {id} not found")))
    }

    async fn list_members(&self, limit: usize) -> Result<Vec<Member>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY created_at ASC, id ASC LIMIT ?"
        ))?;
        let rows = stmt.query_map([limit as i64], row_to_member)?;
        collect_rows(rows)
    }

    async fn list_members_by_family(&self, family_id: Uuid, limit: usize) -> Result<Vec<Member>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE family_id = ? ORDER BY created_at ASC, id ASC LIMIT ?"
        ))?;
        let rows = stmt.query_map(
            duckdb::params![family_id.to_string(), limit as i64],
            row_to_member,
        )?;
        collect_rows(rows)
    }

    async fn delete_member_cascade(&self, id: Uuid) -> Result<usize> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let purged = tx.execute(
            "DELETE FROM relationships WHERE member1_id = ? OR member2_id = ?",
            duckdb::params![id.to_string(), id.to_string()],
        )?;
        let deleted = tx.execute(
            "DELETE FROM members WHERE id = ?",
            duckdb::params![id.to_string()],
        )?;
        if deleted == 0 {
            // Dropping the transaction rolls back the purge.
            return Err(Error::NotFound(format!("member {id} not found")));
        }
        tx.commit()?;
        Ok(purged)
    }

    async fn insert_relationship(&self, relationship: &Relationship) -> Result<()> {
        let conn = self.conn.lock().await;
        insert_relationship_row(&conn, relationship)
    }

    async fn list_relationships(&self, limit: usize) -> Result<Vec<Relationship>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships ORDER BY created_at ASC, id ASC LIMIT ?"
        ))?;
        let rows = stmt.query_map([limit as i64], row_to_relationship)?;
        collect_rows(rows)
    }

    async fn list_relationships_for_member(
        &self,
        member_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Relationship>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships WHERE member1_id = ? OR member2_id = ? ORDER BY created_at ASC, id ASC LIMIT ?"
        ))?;
        let rows = stmt.query_map(
            duckdb::params![member_id.to_string(), member_id.to_string(), limit as i64],
            row_to_relationship,
        )?;
        collect_rows(rows)
    }

    async fn delete_relationship(&self, id: Uuid) -> Result<()> {
        let conn = self.conn.lock().await;
        let affected = conn.execute(
            "DELETE FROM relationships WHERE id = ?",
            duckdb::params![id.to_string()],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(format!("relationship {id} not found")));
        }
        Ok(())
    }

    async fn search_members(&self, query: &str, limit: usize) -> Result<Vec<Member>> {
        let conn = self.conn.lock().await;
        // contains() is a literal match: '%' and '_' in the query are not wildcards.
        let mut stmt = conn.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE contains(lower(name), lower(?)) OR contains(lower(coalesce(occupation, '')), lower(?)) ORDER BY created_at ASC, id ASC LIMIT ?"
        ))?;
        let rows = stmt.query_map(duckdb::params![query, query, limit as i64], row_to_member)?;
        collect_rows(rows)
    }

    async fn search_families(&self, query: &str, limit: usize) -> Result<Vec<Family>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {FAMILY_COLUMNS} FROM families WHERE contains(lower(name), lower(?)) ORDER BY created_at ASC, id ASC LIMIT ?"
        ))?;
        let rows = stmt.query_map(duckdb::params![query, limit as i64], row_to_family)?;
        collect_rows(rows)
    }

    async fn get_admin_user(&self, username: &str) -> Result<Option<AdminUser>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, created_at FROM admin_users WHERE username = ?",
        )?;
        match stmt.query_row([username], row_to_admin) {
            Ok(admin) => Ok(Some(admin)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::Storage(e.to_string())),
        }
    }

    async fn insert_admin_user(&self, admin: &AdminUser) -> Result<()> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM admin_users WHERE username = ?")?;
        let existing: i64 = stmt.query_row([admin.username.as_str()], |row| row.get(0))?;
        if existing > 0 {
            return Err(Error::Validation("Admin user already exists".to_string()));
        }
        conn.execute(
            "INSERT INTO admin_users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
            duckdb::params![
                admin.id.to_string(),
                admin.username,
                admin.password_hash,
                format_timestamp(&admin.created_at),
            ],
        )?;
        Ok(())
    }

    async fn seed_if_empty(&self, data: &SeedData) -> Result<bool> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        if count_rows(&tx, "families")? > 0 {
            return Ok(false);
        }
        for family in &data.families {
            insert_family_row(&tx, family)?;
        }
        for member in &data.members {
            insert_member_row(&tx, member)?;
        }
        for relationship in &data.relationships {
            insert_relationship_row(&tx, relationship)?;
        }
        tx.commit()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::family::NewFamily;
    use crate::model::relationship::NewRelationship;

    #[tokio::test]
    async fn test_family_roundtrip_preserves_timestamp() {
        let storage = DuckDbStorage::open_in_memory().unwrap();
        let family = Family::create(NewFamily::new("Verma").with_description("artisans"));
        storage.insert_family(&family).await.unwrap();

        let fetched = storage.get_family(family.id).await.unwrap().unwrap();
        assert_eq!(fetched, family);
    }

    #[tokio::test]
    async fn test_cascade_rolls_back_when_member_missing() {
        let storage = DuckDbStorage::open_in_memory().unwrap();
        let ghost = Uuid::now_v7();
        let other = Uuid::now_v7();
        // A dangling relationship that references a member that was never stored.
        storage
            .insert_relationship(&Relationship::create(NewRelationship::new(
                ghost, other, "friend",
            )))
            .await
            .unwrap();

        let err = storage.delete_member_cascade(ghost).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(storage.list_relationships(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_treats_like_wildcards_literally() {
        let storage = DuckDbStorage::open_in_memory().unwrap();
        storage
            .insert_family(&Family::create(NewFamily::new("Gupta")))
            .await
            .unwrap();
        assert!(storage.search_families("%", 10).await.unwrap().is_empty());
        assert!(storage.search_families("_", 10).await.unwrap().is_empty());
        assert_eq!(storage.search_families("UPT", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_seed_if_empty_skips_populated_store() {
        let storage = DuckDbStorage::open_in_memory().unwrap();
        let data = SeedData {
            families: vec![Family::create(NewFamily::new("Sharma"))],
            ..SeedData::default()
        };
        assert!(storage.seed_if_empty(&data).await.unwrap());
        assert!(!storage.seed_if_empty(&data).await.unwrap());
        assert_eq!(storage.list_families(10).await.unwrap().len(), 1);
    }
}
