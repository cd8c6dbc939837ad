//! Cuboid use-case service.
//!
//! # Responsibility
//! - Sequence input validation, capacity check and persistence for writes.
//! - Translate repository and capacity outcomes into caller-facing errors.
//!
//! # Invariants
//! - Create and update run check + write inside one write transaction.
//! - Update checks the *destination* bag and excludes the cuboid's own
//!   stored volume.
//! - A rejected write leaves storage untouched.
//! - Delete never consults capacity.

use crate::model::bag::{BagId, CuboidWithBag};
use crate::model::cuboid::{Cuboid, CuboidId, CuboidValidationError, NewCuboid};
use crate::repo::bag_repo::BagRepository;
use crate::repo::cuboid_repo::CuboidRepository;
use crate::repo::RepoError;
use crate::service::capacity::{validate_capacity, CapacityError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for cuboid use-cases.
#[derive(Debug)]
pub enum CuboidServiceError {
    /// Request dimensions failed validation.
    InvalidInput(CuboidValidationError),
    /// Target bag does not exist.
    BagNotFound(BagId),
    /// Target cuboid does not exist.
    CuboidNotFound(CuboidId),
    /// Write would push the bag above its volume.
    CapacityExceeded {
        bag_id: BagId,
        capacity: u64,
        requested_total: u128,
    },
    /// Write lock was contended; safe to retry.
    Conflict,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl CuboidServiceError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::BagNotFound(_) => "bag_not_found",
            Self::CuboidNotFound(_) => "cuboid_not_found",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Conflict => "conflict",
            Self::Repo(_) => "repo_error",
        }
    }
}

impl Display for CuboidServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::BagNotFound(id) => write!(f, "bag not found: {id}"),
            Self::CuboidNotFound(id) => write!(f, "cuboid not found: {id}"),
            Self::CapacityExceeded {
                bag_id,
                capacity,
                requested_total,
            } => write!(
                f,
                "insufficient capacity in bag {bag_id}: requested {requested_total}, capacity {capacity}"
            ),
            Self::Conflict => write!(f, "concurrent write conflict, retry the request"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CuboidServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CuboidValidationError> for CuboidServiceError {
    fn from(value: CuboidValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for CuboidServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidCuboid(err) => Self::InvalidInput(err),
            RepoError::BagNotFound(bag_id) => Self::BagNotFound(bag_id),
            RepoError::CuboidNotFound(cuboid_id) => Self::CuboidNotFound(cuboid_id),
            RepoError::Conflict(_) => Self::Conflict,
            other => Self::Repo(other),
        }
    }
}

impl From<CapacityError> for CuboidServiceError {
    fn from(value: CapacityError) -> Self {
        match value {
            CapacityError::BagNotFound(bag_id) => Self::BagNotFound(bag_id),
            CapacityError::CapacityExceeded {
                bag_id,
                capacity,
                requested_total,
            } => Self::CapacityExceeded {
                bag_id,
                capacity,
                requested_total,
            },
            CapacityError::Repo(err) => Self::from(err),
        }
    }
}

/// Cuboid service facade over repository implementations.
pub struct CuboidService<C: CuboidRepository, B: BagRepository> {
    cuboids: C,
    bags: B,
}

impl<C: CuboidRepository, B: BagRepository> CuboidService<C, B> {
    /// Creates a service from cuboid and bag repositories sharing one store.
    pub fn new(cuboids: C, bags: B) -> Self {
        Self { cuboids, bags }
    }

    /// Creates one cuboid if its bag has room for it.
    ///
    /// # Errors
    /// - `InvalidInput` for zero dimensions.
    /// - `BagNotFound` when `request.bag_id` does not exist.
    /// - `CapacityExceeded` when the bag would overflow.
    /// - `Conflict` when the write lock could not be taken.
    pub fn create_cuboid(&self, request: &NewCuboid) -> Result<Cuboid, CuboidServiceError> {
        let started_at = Instant::now();
        let result = self.try_create(request);
        log_write("cuboid_create", request.bag_id, started_at, &result);
        result
    }

    /// Replaces dimensions and bag of cuboid `id`.
    ///
    /// Capacity is checked against `request.bag_id` with `id` excluded from
    /// the occupied volume. The source bag is not re-checked when moving.
    ///
    /// # Errors
    /// - Same as [`Self::create_cuboid`], plus `CuboidNotFound`.
    pub fn update_cuboid(
        &self,
        id: CuboidId,
        request: &NewCuboid,
    ) -> Result<Cuboid, CuboidServiceError> {
        let started_at = Instant::now();
        let result = self.try_update(id, request);
        log_write("cuboid_update", request.bag_id, started_at, &result);
        result
    }

    /// Deletes one cuboid; deletion only frees capacity so nothing is checked.
    pub fn delete_cuboid(&self, id: CuboidId) -> Result<(), CuboidServiceError> {
        self.cuboids.delete_cuboid(id)?;
        info!("event=cuboid_delete module=service status=ok");
        Ok(())
    }

    /// Gets one cuboid by id.
    pub fn get_cuboid(&self, id: CuboidId) -> Result<Option<Cuboid>, CuboidServiceError> {
        Ok(self.cuboids.get_cuboid(id)?)
    }

    /// Lists the requested cuboids with embedded bags, in insertion order.
    pub fn list_cuboids(
        &self,
        ids: &[CuboidId],
    ) -> Result<Vec<CuboidWithBag>, CuboidServiceError> {
        Ok(self.cuboids.list_cuboids_with_bag(ids)?)
    }

    fn try_create(&self, request: &NewCuboid) -> Result<Cuboid, CuboidServiceError> {
        request.dimensions.validate()?;

        self.cuboids.in_write_transaction(|| {
            validate_capacity(&self.bags, request.bag_id, &request.dimensions, None)?;
            let cuboid = Cuboid::new(request);
            self.cuboids.create_cuboid(&cuboid)?;
            Ok(cuboid)
        })
    }

    fn try_update(
        &self,
        id: CuboidId,
        request: &NewCuboid,
    ) -> Result<Cuboid, CuboidServiceError> {
        request.dimensions.validate()?;

        self.cuboids.in_write_transaction(|| {
            if self.cuboids.get_cuboid(id)?.is_none() {
                return Err(CuboidServiceError::CuboidNotFound(id));
            }
            validate_capacity(&self.bags, request.bag_id, &request.dimensions, Some(id))?;
            let cuboid = Cuboid::with_id(id, request);
            self.cuboids.update_cuboid(&cuboid)?;
            Ok(cuboid)
        })
    }
}

fn log_write(
    event: &str,
    bag_id: BagId,
    started_at: Instant,
    result: &Result<Cuboid, CuboidServiceError>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={event} module=service status=ok bag_id={bag_id} duration_ms={duration_ms}"
        ),
        Err(err @ CuboidServiceError::Repo(_)) => warn!(
            "event={event} module=service status=error bag_id={bag_id} duration_ms={duration_ms} reason={} error={err}",
            err.reason()
        ),
        Err(err) => info!(
            "event={event} module=service status=rejected bag_id={bag_id} duration_ms={duration_ms} reason={}",
            err.reason()
        ),
    }
}
