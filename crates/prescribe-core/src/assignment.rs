//! Assignment types: the durable record binding a visitor on a site to one
//! experiment group.
//!
//! An assignment is written once, the first time a (site, visitor) pair is
//! seen, and never updated afterwards.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Group ───────────────────────────────────────────────────────────────────

/// One arm of the experiment.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
pub enum Group {
  A,
  B,
  C,
}

impl Group {
  /// Every group, in selection order.
  pub const ALL: [Group; 3] = [Group::A, Group::B, Group::C];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::A => "A",
      Self::B => "B",
      Self::C => "C",
    }
  }

  /// Position of the group in [`Group::ALL`].
  pub(crate) fn index(self) -> usize {
    match self {
      Self::A => 0,
      Self::B => 1,
      Self::C => 2,
    }
  }
}

impl fmt::Display for Group {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Group {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "A" => Ok(Self::A),
      "B" => Ok(Self::B),
      "C" => Ok(Self::C),
      other => Err(Error::UnknownGroup(other.to_owned())),
    }
  }
}

// ─── SiteName ────────────────────────────────────────────────────────────────

/// A site identifier, e.g. `afro-la`.
///
/// Catalog membership is checked by
/// [`SiteCatalog::validate`](crate::catalog::SiteCatalog::validate), which is
/// the only way request input becomes a `SiteName`. Storage backends use
/// [`SiteName::new`] to rebuild names they previously persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteName(String);

impl SiteName {
  pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SiteName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for SiteName {
  fn as_ref(&self) -> &str { &self.0 }
}

// ─── Visitor id ──────────────────────────────────────────────────────────────

/// Parse a caller-supplied visitor id.
///
/// Accepts any textual UUID form understood by [`Uuid::parse_str`] (hyphenated
/// or simple). The canonical form is the lowercase hyphenated one produced by
/// `Uuid`'s `Display` and `Serialize` impls.
pub fn parse_visitor_id(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw).map_err(|_| Error::InvalidVisitorId(raw.to_owned()))
}

// ─── Assignment ──────────────────────────────────────────────────────────────

/// The group a visitor was placed in on a given site.
///
/// `(site, visitor_id)` is the key; at most one assignment exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub site:       SiteName,
  pub visitor_id: Uuid,
  pub group:      Group,
}
