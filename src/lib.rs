//! # Calendar Service
//!
//! Meeting scheduling service: calendars own time slots, meetings bind
//! participants to exactly one slot.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, repository traits and errors
//! - **application**: Business logic services
//! - **infrastructure**: Database (SeaORM), in-memory storage, cache
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Cross-cutting types (pagination)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider, ServiceCache};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
