//! Bag capacity validation.
//!
//! # Responsibility
//! - Decide whether writing a cuboid keeps its target bag within volume.
//!
//! # Invariants
//! - `occupied + candidate == capacity` is accepted; only strict excess fails.
//! - A missing bag is `BagNotFound`, never `CapacityExceeded`.
//! - Validation is read-only; callers persist only after `Ok`.

use crate::model::bag::BagId;
use crate::model::cuboid::{CuboidId, Dimensions};
use crate::repo::bag_repo::BagRepository;
use crate::repo::RepoError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of comparing a prospective total against a bag's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityDecision {
    Accept,
    Reject,
}

/// Accepted capacity check details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityReport {
    pub bag_id: BagId,
    pub capacity: u64,
    /// Volume already held, excluding the cuboid being replaced.
    pub occupied: u128,
    pub candidate_volume: u128,
    /// `occupied + candidate_volume`; never above `capacity`.
    pub total: u128,
}

impl CapacityReport {
    /// Capacity left after the candidate is written.
    pub fn remaining(&self) -> u128 {
        u128::from(self.capacity) - self.total
    }
}

/// Rejection or failure from [`validate_capacity`].
#[derive(Debug)]
pub enum CapacityError {
    BagNotFound(BagId),
    CapacityExceeded {
        bag_id: BagId,
        capacity: u64,
        requested_total: u128,
    },
    Repo(RepoError),
}

impl Display for CapacityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BagNotFound(id) => write!(f, "bag not found: {id}"),
            Self::CapacityExceeded {
                bag_id,
                capacity,
                requested_total,
            } => write!(
                f,
                "insufficient capacity in bag {bag_id}: requested {requested_total}, capacity {capacity}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CapacityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CapacityError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::BagNotFound(bag_id) => Self::BagNotFound(bag_id),
            other => Self::Repo(other),
        }
    }
}

/// Compares `occupied + candidate_volume` against `capacity`.
pub fn evaluate_capacity(
    capacity: u64,
    occupied: u128,
    candidate_volume: u128,
) -> CapacityDecision {
    if occupied + candidate_volume > u128::from(capacity) {
        CapacityDecision::Reject
    } else {
        CapacityDecision::Accept
    }
}

/// Checks whether `candidate` fits into bag `bag_id`.
///
/// `exclude` names the cuboid being replaced on update; its stored volume is
/// left out of the occupied sum.
///
/// # Errors
/// - `BagNotFound` when `bag_id` does not exist.
/// - `CapacityExceeded` when the resulting total is above the bag volume.
/// - `Repo` for storage failures.
pub fn validate_capacity<R>(
    bags: &R,
    bag_id: BagId,
    candidate: &Dimensions,
    exclude: Option<CuboidId>,
) -> Result<CapacityReport, CapacityError>
where
    R: BagRepository + ?Sized,
{
    let bag = bags
        .get_bag_with_cuboids(bag_id)?
        .ok_or(CapacityError::BagNotFound(bag_id))?;

    let capacity = bag.bag.volume;
    let occupied = bag.occupied_volume(exclude);
    let candidate_volume = candidate.volume();
    let total = occupied + candidate_volume;

    debug!(
        "event=capacity_check module=service bag_id={bag_id} capacity={capacity} occupied={occupied} candidate={candidate_volume} excluded={}",
        exclude.is_some()
    );

    match evaluate_capacity(capacity, occupied, candidate_volume) {
        CapacityDecision::Accept => Ok(CapacityReport {
            bag_id,
            capacity,
            occupied,
            candidate_volume,
            total,
        }),
        CapacityDecision::Reject => Err(CapacityError::CapacityExceeded {
            bag_id,
            capacity,
            requested_total: total,
        }),
    }
}
