//! Core domain logic for the cuboid storage service.
//! This crate is the single source of truth for the bag capacity invariant.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::bag::{
    Bag, BagId, BagValidationError, BagWithCuboids, CuboidWithBag, NewBag, MAX_BAG_VOLUME,
};
pub use model::cuboid::{Cuboid, CuboidId, CuboidValidationError, Dimensions, NewCuboid};
pub use repo::bag_repo::{BagRepository, SqliteBagRepository};
pub use repo::cuboid_repo::{CuboidRepository, SqliteCuboidRepository};
pub use repo::{RepoError, RepoResult};
pub use service::bag_service::{BagService, BagServiceError};
pub use service::capacity::{
    evaluate_capacity, validate_capacity, CapacityDecision, CapacityError, CapacityReport,
};
pub use service::cuboid_service::{CuboidService, CuboidServiceError};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
