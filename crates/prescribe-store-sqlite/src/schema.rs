//! SQL schema for the assignment store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per visitor per site. Rows are never updated or deleted here;
-- the primary key is what arbitrates concurrent first inserts.
CREATE TABLE IF NOT EXISTS assignments (
    site           TEXT NOT NULL,
    visitor_id     TEXT NOT NULL,   -- lowercase hyphenated UUID
    assigned_group TEXT NOT NULL CHECK (assigned_group IN ('A', 'B', 'C')),
    PRIMARY KEY (site, visitor_id)
) WITHOUT ROWID;

PRAGMA user_version = 1;
";
