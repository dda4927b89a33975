//! Error types for `prescribe-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid site: {0:?} is not a known site")]
  InvalidSite(String),

  #[error("invalid visitor_id: {0:?} is not a valid UUID")]
  InvalidVisitorId(String),

  #[error("invalid weights: {0}")]
  InvalidWeights(String),

  #[error("unknown group: {0:?}")]
  UnknownGroup(String),

  /// The store failed a read or write. The boxed source carries the backend
  /// detail; it is meant for logs, not for clients.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// True for errors caused by caller input rather than by the store.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      Self::InvalidSite(_) | Self::InvalidVisitorId(_) | Self::InvalidWeights(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
