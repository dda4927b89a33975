//! [`Resolver`]: the get-or-create operation for assignments.
//!
//! Given a site, a visitor id and a set of weights, the resolver returns the
//! visitor's existing assignment or creates one. Creation draws a group with
//! [`choose_group`] and relies on [`AssignmentStore::insert_if_absent`] to pick
//! a single winner when several requests race for the same key.

use uuid::Uuid;

use crate::{
  Error, Result,
  assignment::{Assignment, SiteName, parse_visitor_id},
  catalog::SiteCatalog,
  store::{AssignmentStore, InsertOutcome},
  weights::{RandomSource, ThreadRandom, Weights, choose_group},
};

/// The outcome of [`Resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  pub assignment: Assignment,
  /// `true` only for the call whose insert created the row.
  pub created:    bool,
}

/// Resolves (site, visitor) pairs to durable group assignments.
///
/// Holds no mutable state of its own; share it behind an `Arc` and call
/// [`resolve`](Self::resolve) from as many tasks as needed.
pub struct Resolver<S, R = ThreadRandom> {
  store:   S,
  catalog: SiteCatalog,
  random:  R,
}

impl<S: AssignmentStore> Resolver<S> {
  pub fn new(store: S, catalog: SiteCatalog) -> Self {
    Self { store, catalog, random: ThreadRandom }
  }
}

impl<S, R> Resolver<S, R> {
  /// Replace the random source used on the creation path.
  pub fn with_random<R2: RandomSource>(self, random: R2) -> Resolver<S, R2> {
    Resolver { store: self.store, catalog: self.catalog, random }
  }

  pub fn catalog(&self) -> &SiteCatalog { &self.catalog }
}

impl<S, R> Resolver<S, R>
where
  S: AssignmentStore,
  R: RandomSource,
{
  /// Return the assignment for `(site, visitor_id)`, creating it on first
  /// sight.
  ///
  /// Input is validated before the store is touched: the site against the
  /// catalog, then the visitor id, then the weights. An existing row is
  /// returned as-is and `weights` is ignored for it.
  pub async fn resolve(
    &self,
    site: &str,
    visitor_id: &str,
    weights: &Weights,
  ) -> Result<Resolution> {
    let site = self.catalog.validate(site)?;
    let visitor_id = parse_visitor_id(visitor_id)?;
    weights.validate()?;

    if let Some(existing) = self.read(&site, visitor_id).await? {
      return Ok(Resolution { assignment: existing, created: false });
    }

    let group = choose_group(weights, &self.random)?;
    let assignment = Assignment { site, visitor_id, group };

    match self
      .store
      .insert_if_absent(&assignment)
      .await
      .map_err(store_error)?
    {
      InsertOutcome::Inserted => Ok(Resolution { assignment, created: true }),
      // Another caller committed first; theirs is the durable assignment.
      InsertOutcome::AlreadyExists => {
        let winner = self
          .read(&assignment.site, visitor_id)
          .await?
          .ok_or_else(|| {
            Error::StoreUnavailable(
              format!(
                "insert for {}/{visitor_id} conflicted but no row was found",
                assignment.site
              )
              .into(),
            )
          })?;
        Ok(Resolution { assignment: winner, created: false })
      }
    }
  }

  async fn read(
    &self,
    site: &SiteName,
    visitor_id: Uuid,
  ) -> Result<Option<Assignment>> {
    self.store.get(site, visitor_id).await.map_err(store_error)
  }
}

fn store_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::StoreUnavailable(Box::new(e))
}
