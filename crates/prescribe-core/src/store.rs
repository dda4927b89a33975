//! The `AssignmentStore` trait: the persistence boundary the resolver
//! depends on.
//!
//! Implemented by storage backends (e.g. `prescribe-store-sqlite`). The
//! resolver relies on the backend, not on any locking of its own, to decide
//! which of several racing inserts wins.

use std::future::Future;

use uuid::Uuid;

use crate::assignment::{Assignment, SiteName};

/// Result of [`AssignmentStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
  /// The row was written; the caller's assignment is now the durable one.
  Inserted,
  /// A row for the same `(site, visitor_id)` already exists. Nothing was
  /// written.
  AlreadyExists,
}

/// Abstraction over an assignment store backend.
///
/// Backends must enforce uniqueness of `(site, visitor_id)` themselves, so
/// that two concurrent `insert_if_absent` calls for the same key cannot both
/// report [`InsertOutcome::Inserted`].
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AssignmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Point lookup by key. Must observe every committed insert.
  fn get(
    &self,
    site: &SiteName,
    visitor_id: Uuid,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send;

  /// Atomically insert `assignment` unless its key is taken.
  ///
  /// An existing row is never overwritten. A uniqueness conflict is reported
  /// as [`InsertOutcome::AlreadyExists`], not as `Err`.
  fn insert_if_absent(
    &self,
    assignment: &Assignment,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send;
}

impl<S: AssignmentStore> AssignmentStore for std::sync::Arc<S> {
  type Error = S::Error;

  fn get(
    &self,
    site: &SiteName,
    visitor_id: Uuid,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send {
    S::get(self, site, visitor_id)
  }

  fn insert_if_absent(
    &self,
    assignment: &Assignment,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send {
    S::insert_if_absent(self, assignment)
  }
}
