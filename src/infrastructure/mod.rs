//! External concerns: database, cache and storage backends

pub mod cache;
pub mod database;
pub mod storage;

pub use cache::ServiceCache;
pub use database::{init_database, DatabaseConfig};
pub use database::repositories::SeaOrmRepositoryProvider;
pub use storage::InMemoryRepositories;
