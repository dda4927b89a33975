//! The site catalog: the closed set of site names the service accepts.

use std::collections::BTreeSet;

use crate::{Error, Result, assignment::SiteName};

/// Sites served when no catalog is configured.
pub const DEFAULT_SITES: [&str; 4] =
  ["the-19th", "open-vallejo", "dallas-free-press", "afro-la"];

/// A closed set of valid site names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCatalog {
  sites: BTreeSet<String>,
}

impl SiteCatalog {
  pub fn new<I, S>(sites: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self { sites: sites.into_iter().map(Into::into).collect() }
  }

  /// Check `raw` against the catalog, returning the validated name.
  pub fn validate(&self, raw: &str) -> Result<SiteName> {
    if self.sites.contains(raw) {
      Ok(SiteName::new(raw))
    } else {
      Err(Error::InvalidSite(raw.to_owned()))
    }
  }

  pub fn contains(&self, raw: &str) -> bool { self.sites.contains(raw) }

  pub fn len(&self) -> usize { self.sites.len() }

  pub fn is_empty(&self) -> bool { self.sites.is_empty() }
}

impl Default for SiteCatalog {
  fn default() -> Self { Self::new(DEFAULT_SITES) }
}
