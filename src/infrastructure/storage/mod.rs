//! Storage backends
//!
//! The production backend is the SeaORM provider in `database::repositories`;
//! the in-memory provider here backs development and the service tests.

pub mod memory;

pub use memory::InMemoryRepositories;
