//! Encoding and decoding helpers between domain types and the plain-text
//! values stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings; groups as their single
//! letter.

use prescribe_core::{Assignment, Group, SiteName};
use uuid::Uuid;

use crate::Result;

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_group(g: Group) -> &'static str { g.as_str() }

pub fn decode_group(s: &str) -> Result<Group> { Ok(s.parse()?) }

/// Raw strings read directly from an `assignments` row.
pub struct RawAssignment {
  pub site:       String,
  pub visitor_id: String,
  pub group:      String,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      site:       SiteName::new(self.site),
      visitor_id: decode_uuid(&self.visitor_id)?,
      group:      decode_group(&self.group)?,
    })
  }
}
