//! # EPU Store
//!
//! Persistence collaborator for the ingestion pipeline. The pipeline hands a
//! fully assembled [`epu_domain::Project`] to a [`ProjectRepository`] and
//! never touches a query language or schema itself.
//!
//! The only implementation shipped here is an in-memory repository used by
//! tests and the CLI; a real document store lives behind the same trait in
//! the surrounding system.

mod error;
mod memory;
mod repository;

pub use error::{Result, StoreError};
pub use memory::MemoryRepository;
pub use repository::{ProjectRepository, StoredProject};
