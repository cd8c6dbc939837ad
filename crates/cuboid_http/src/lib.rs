//! HTTP adapter for the cuboid storage service.
//!
//! # Responsibility
//! - Expose bag/cuboid use-cases from `cuboid_core` as a JSON REST API.
//! - Map service outcomes to conventional status codes.
//!
//! # Invariants
//! - Handlers never run SQLite work on async worker threads.
//! - Internal failures are logged and answered with a generic message.

pub mod error;
pub mod handlers;
pub mod payload;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use server::serve;
pub use state::AppState;
