pub const CREATE_FAMILIES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS families (
    id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    description VARCHAR,
    created_at VARCHAR NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_families_created_at ON families(created_at);
";

pub const CREATE_MEMBERS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS members (
    id VARCHAR PRIMARY KEY,
    family_id VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    age INTEGER,
    occupation VARCHAR,
    contact VARCHAR,
    photo_url VARCHAR,
    gender VARCHAR,
    created_at VARCHAR NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_members_family_id ON members(family_id);
CREATE INDEX IF NOT EXISTS idx_members_created_at ON members(created_at);
";

// member1_id / member2_id carry no foreign keys: references are not
// validated on write and may dangle.
pub const CREATE_RELATIONSHIPS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS relationships (
    id VARCHAR PRIMARY KEY,
    member1_id VARCHAR NOT NULL,
    member2_id VARCHAR NOT NULL,
    relationship_type VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_relationships_member1 ON relationships(member1_id);
CREATE INDEX IF NOT EXISTS idx_relationships_member2 ON relationships(member2_id);
";

pub const CREATE_ADMIN_USERS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS admin_users (
    id VARCHAR PRIMARY KEY,
    username VARCHAR NOT NULL UNIQUE,
    password_hash VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL
);
";

pub fn run_migrations(conn: &duckdb::Connection) -> duckdb::Result<()> {
    conn.execute_batch(CREATE_FAMILIES_TABLE)?;
    conn.execute_batch(CREATE_MEMBERS_TABLE)?;
    conn.execute_batch(CREATE_RELATIONSHIPS_TABLE)?;
    conn.execute_batch(CREATE_ADMIN_USERS_TABLE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_run_on_in_memory_db() {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        for table in ["families", "members", "relationships", "admin_users"] {
            let mut stmt = conn.prepare(&format!("SELECT COUNT(*) FROM {table}")).unwrap();
            let count: i64 = stmt.query_row([], |row| row.get(0)).unwrap();
            assert_eq!(count, 0, "table {table} should start empty");
        }
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
    }
}
