use kinship_core::error::{Error, Result};

/// Run all PostgreSQL schema migrations. Safe to call on every start.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    // 1. families
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS families (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL
)
"#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::Storage(format!("create families: {e}")))?;

    // 2. members
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS members (
    id UUID PRIMARY KEY,
    family_id UUID NOT NULL,
    name TEXT NOT NULL,
    age INTEGER,
    occupation TEXT,
    contact TEXT,
    photo_url TEXT,
    gender TEXT,
    created_at TIMESTAMPTZ NOT NULL
)
"#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::Storage(format!("create members: {e}")))?;

    // 3. relationships
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS relationships (
    id UUID PRIMARY KEY,
    member1_id UUID NOT NULL,
    member2_id UUID NOT NULL,
    relationship_type TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)
"#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::Storage(format!("create relationships: {e}")))?;

    // 4. admin_users
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS admin_users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)
"#,
    )
    .execute(pool)
    .await
    .map_err(|e| Error::Storage(format!("create admin_users: {e}")))?;

    let index_stmts: &[&str] = &[
        "CREATE INDEX IF NOT EXISTS idx_members_family ON members(family_id)",
        "CREATE INDEX IF NOT EXISTS idx_relationships_member1 ON relationships(member1_id)",
        "CREATE INDEX IF NOT EXISTS idx_relationships_member2 ON relationships(member2_id)",
    ];

    for stmt in index_stmts {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| Error::Storage(format!("create index: {e}")))?;
    }

    Ok(())
}
