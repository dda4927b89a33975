//! [`SqliteStore`], the SQLite implementation of [`AssignmentStore`].

use std::path::Path;

use prescribe_core::{Assignment, AssignmentStore, InsertOutcome, SiteName};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawAssignment, encode_group, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An assignment store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. Every call
/// is one statement on the connection thread, so nothing stays checked out
/// between calls or after an error.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored assignments.
  pub async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM assignments", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.try_into().unwrap_or_default())
  }
}

/// True when `e` is the key violation raised by a duplicate
/// `(site, visitor_id)` insert. Other constraint failures (e.g. the group
/// `CHECK`) are real errors.
fn is_duplicate_key(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == rusqlite::ErrorCode::ConstraintViolation
        && matches!(
          err.extended_code,
          rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
  )
}

// ─── AssignmentStore impl ────────────────────────────────────────────────────

impl AssignmentStore for SqliteStore {
  type Error = crate::Error;

  async fn get(
    &self,
    site: &SiteName,
    visitor_id: Uuid,
  ) -> Result<Option<Assignment>> {
    let site_str = site.as_str().to_owned();
    let id_str   = encode_uuid(visitor_id);

    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT site, visitor_id, assigned_group
             FROM assignments
             WHERE site = ?1 AND visitor_id = ?2",
            rusqlite::params![site_str, id_str],
            |row| {
              Ok(RawAssignment {
                site:       row.get(0)?,
                visitor_id: row.get(1)?,
                group:      row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAssignment::into_assignment).transpose()
  }

  async fn insert_if_absent(
    &self,
    assignment: &Assignment,
  ) -> Result<InsertOutcome> {
    let site_str  = assignment.site.as_str().to_owned();
    let id_str    = encode_uuid(assignment.visitor_id);
    let group_str = encode_group(assignment.group);

    let outcome = self
      .conn
      .call(move |conn| {
        // A plain INSERT: the primary key rejects the loser of a race, and
        // that rejection is the only error treated as "already exists".
        match conn.execute(
          "INSERT INTO assignments (site, visitor_id, assigned_group)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![site_str, id_str, group_str],
        ) {
          Ok(_) => Ok(InsertOutcome::Inserted),
          Err(e) if is_duplicate_key(&e) => Ok(InsertOutcome::AlreadyExists),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(outcome)
  }
}
