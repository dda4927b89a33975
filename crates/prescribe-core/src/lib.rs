//! Core types and the get-or-create resolver for prescription assignments.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::AssignmentStore`]; the HTTP layer drives
//! [`resolver::Resolver`].

// Native `async fn` in traits; the store trait spells out its `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod assignment;
pub mod catalog;
pub mod error;
pub mod resolver;
pub mod store;
pub mod weights;

pub use assignment::{Assignment, Group, SiteName};
pub use catalog::SiteCatalog;
pub use error::{Error, Result};
pub use resolver::{Resolution, Resolver};
pub use store::{AssignmentStore, InsertOutcome};
pub use weights::{RandomSource, SeededRandom, ThreadRandom, Weights};
