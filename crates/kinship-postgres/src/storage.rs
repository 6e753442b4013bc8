use kinship_core::error::{Error, Result};
use kinship_core::model::admin::AdminUser;
use kinship_core::model::family::Family;
use kinship_core::model::member::{Member, MemberInput};
use kinship_core::model::relationship::Relationship;
use kinship_core::storage::{SeedData, StorageBackend};
use sqlx::Row;
use uuid::Uuid;

/// PostgreSQL-backed storage for Kinship.
///
/// Wraps a `sqlx::PgPool` and runs schema migrations on construction.
/// Ids are native `UUID` columns and timestamps are `TIMESTAMPTZ`, which
/// keeps the microsecond precision the core model produces.
pub struct PgStorage {
    pool: sqlx::PgPool,
}

impl PgStorage {
    /// Connect to a PostgreSQL database and run migrations.
    ///
    /// `url` is a standard `postgres://` connection string.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = sqlx::PgPool::connect(url).await.map_err(map_sqlx)?;
        Self::from_pool(pool).await
    }

    /// Build a `PgStorage` from an existing pool (useful for tests).
    pub async fn from_pool(pool: sqlx::PgPool) -> Result<Self> {
        crate::migrations::run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn map_sqlx(e: sqlx::Error) -> Error {
    Error::Storage(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

const FAMILY_COLUMNS: &str = "id, name, description, created_at";
const MEMBER_COLUMNS: &str =
    "id, family_id, name, age, occupation, contact, photo_url, gender, created_at";
const RELATIONSHIP_COLUMNS: &str = "id, member1_id, member2_id, relationship_type, created_at";

fn row_to_family(row: &sqlx::postgres::PgRow) -> std::result::Result<Family, sqlx::Error> {
    Ok(Family {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_member(row: &sqlx::postgres::PgRow) -> std::result::Result<Member, sqlx::Error> {
    Ok(Member {
        id: row.try_get("id")?,
        family_id: row.try_get("family_id")?,
        name: row.try_get("name")?,
        age: row.try_get("age")?,
        occupation: row.try_get("occupation")?,
        contact: row.try_get("contact")?,
        photo_url: row.try_get("photo_url")?,
        gender: row.try_get("gender")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_relationship(
    row: &sqlx::postgres::PgRow,
) -> std::result::Result<Relationship, sqlx::Error> {
    Ok(Relationship {
        id: row.try_get("id")?,
        member1_id: row.try_get("member1_id")?,
        member2_id: row.try_get("member2_id")?,
        relationship_type: row.try_get("relationship_type")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_admin(row: &sqlx::postgres::PgRow) -> std::result::Result<AdminUser, sqlx::Error> {
    Ok(AdminUser {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_rows<T>(
    rows: Vec<sqlx::postgres::PgRow>,
    f: fn(&sqlx::postgres::PgRow) -> std::result::Result<T, sqlx::Error>,
) -> Result<Vec<T>> {
    rows.iter().map(|r| f(r).map_err(map_sqlx)).collect()
}

async fn insert_family_row<'e, E>(executor: E, family: &Family) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query("INSERT INTO families (id, name, description, created_at) VALUES ($1, $2, $3, $4)")
        .bind(family.id)
        .bind(&family.name)
        .bind(&family.description)
        .bind(family.created_at)
        .execute(executor)
        .await
        .map_err(map_sqlx)?;
    Ok(())
}

async fn insert_member_row<'e, E>(executor: E, member: &Member) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
INSERT INTO members (
    id, family_id, name, age, occupation, contact, photo_url, gender, created_at
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
"#,
    )
    .bind(member.id)
    .bind(member.family_id)
    .bind(&member.name)
    .bind(member.age)
    .bind(&member.occupation)
    .bind(&member.contact)
    .bind(&member.photo_url)
    .bind(&member.gender)
    .bind(member.created_at)
    .execute(executor)
    .await
    .map_err(map_sqlx)?;
    Ok(())
}

async fn insert_relationship_row<'e, E>(executor: E, relationship: &Relationship) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO relationships (id, member1_id, member2_id, relationship_type, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(relationship.id)
    .bind(relationship.member1_id)
    .bind(relationship.member2_id)
    .bind(&relationship.relationship_type)
    .bind(relationship.created_at)
    .execute(executor)
    .await
    .map_err(map_sqlx)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// StorageBackend implementation
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl StorageBackend for PgStorage {
    // -----------------------------------------------------------------------
    // Families
    // -----------------------------------------------------------------------

    async fn insert_family(&self, family: &Family) -> Result<()> {
        insert_family_row(&self.pool, family).await
    }

    async fn get_family(&self, id: Uuid) -> Result<Option<Family>> {
        let row = sqlx::query(&format!("SELECT {FAMILY_COLUMNS} FROM families WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.as_ref()
            .map(row_to_family)
            .transpose()
            .map_err(map_sqlx)
    }

    async fn list_families(&self, limit: usize) -> Result<Vec<Family>> {
        let rows = sqlx::query(&format!(
            "SELECT {FAMILY_COLUMNS} FROM families ORDER BY created_at ASC, id ASC LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        map_rows(rows, row_to_family)
    }

    // -----------------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------------

    async fn insert_member(&self, member: &Member) -> Result<()> {
        insert_member_row(&self.pool, member).await
    }

    async fn replace_member(&self, id: Uuid, input: &MemberInput) -> Result<Member> {
        let row = sqlx::query(&format!(
            r#"
UPDATE members
SET family_id = $1, name = $2, age = $3, occupation = $4,
    contact = $5, photo_url = $6, gender = $7
WHERE id = $8
RETURNING {MEMBER_COLUMNS}
"#
        ))
        .bind(input.family_id)
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.occupation)
        .bind(&input.contact)
        .bind(&input.photo_url)
        .bind(&input.gender)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        match row {
            Some(row) => row_to_member(&row).map_err(map_sqlx),
            None => Err(Error::NotFound(format!("member {id} not found"))),
        }
    }

    async fn list_members(&self, limit: usize) -> Result<Vec<Member>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY created_at ASC, id ASC LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        map_rows(rows, row_to_member)
    }

    async fn list_members_by_family(&self, family_id: Uuid, limit: usize) -> Result<Vec<Member>> {
        let rows = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE family_id = $1 ORDER BY created_at ASC, id ASC LIMIT $2"
        ))
        .bind(family_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        map_rows(rows, row_to_member)
    }

    async fn delete_member_cascade(&self, id: Uuid) -> Result<usize> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let purged =
            sqlx::query("DELETE FROM relationships WHERE member1_id = $1 OR member2_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?
                .rows_affected();
        let deleted = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?
            .rows_affected();
        if deleted == 0 {
            tx.rollback().await.map_err(map_sqlx)?;
            return Err(Error::NotFound(format!("member {id} not found")));
        }
        tx.commit().await.map_err(map_sqlx)?;
        Ok(purged as usize)
    }

    // -----------------------------------------------------------------------
    // Relationships
    // -----------------------------------------------------------------------

    async fn insert_relationship(&self, relationship: &Relationship) -> Result<()> {
        insert_relationship_row(&self.pool, relationship).await
    }

    async fn list_relationships(&self, limit: usize) -> Result<Vec<Relationship>> {
        let rows = sqlx::query(&format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships ORDER BY created_at ASC, id ASC LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        map_rows(rows, row_to_relationship)
    }

    async fn list_relationships_for_member(
        &self,
        member_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Relationship>> {
        let rows = sqlx::query(&format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM relationships WHERE member1_id = $1 OR member2_id = $1 ORDER BY created_at ASC, id ASC LIMIT $2"
        ))
        .bind(member_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        map_rows(rows, row_to_relationship)
    }

    async fn delete_relationship(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM relationships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("relationship {id} not found")));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    // strpos() is a literal match, unlike LIKE/ILIKE patterns.
    async fn search_members(&self, query: &str, limit: usize) -> Result<Vec<Member>> {
        let rows = sqlx::query(&format!(
            r#"
SELECT {MEMBER_COLUMNS} FROM members
WHERE strpos(lower(name), lower($1)) > 0
   OR strpos(lower(coalesce(occupation, '')), lower($1)) > 0
ORDER BY created_at ASC, id ASC
LIMIT $2
"#
        ))
        .bind(query)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        map_rows(rows, row_to_member)
    }

    async fn search_families(&self, query: &str, limit: usize) -> Result<Vec<Family>> {
        let rows = sqlx::query(&format!(
            "SELECT {FAMILY_COLUMNS} FROM families WHERE strpos(lower(name), lower($1)) > 0 ORDER BY created_at ASC, id ASC LIMIT $2"
        ))
        .bind(query)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        map_rows(rows, row_to_family)
    }

    // -----------------------------------------------------------------------
    // Admin users
    // -----------------------------------------------------------------------

    async fn get_admin_user(&self, username: &str) -> Result<Option<AdminUser>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM admin_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        row.as_ref()
            .map(row_to_admin)
            .transpose()
            .map_err(map_sqlx)
    }

    async fn insert_admin_user(&self, admin: &AdminUser) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO admin_users (id, username, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(admin.id)
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Err(Error::Validation("Admin user already exists".to_string()))
            }
            Err(e) => Err(map_sqlx(e)),
        }
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    async fn seed_if_empty(&self, data: &SeedData) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        // Serialize concurrent seeders; the second one sees the first's rows.
        sqlx::query("LOCK TABLE families IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM families")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        if existing > 0 {
            tx.rollback().await.map_err(map_sqlx)?;
            return Ok(false);
        }
        for family in &data.families {
            insert_family_row(&mut *tx, family).await?;
        }
        for member in &data.members {
            insert_member_row(&mut *tx, member).await?;
        }
        for relationship in &data.relationships {
            insert_relationship_row(&mut *tx, relationship).await?;
        }
        tx.commit().await.map_err(map_sqlx)?;
        tracing::debug!(
            families = data.families.len(),
            members = data.members.len(),
            "seeded postgres store"
        );
        Ok(true)
    }
}
