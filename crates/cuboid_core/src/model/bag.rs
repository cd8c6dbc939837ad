//! Bag domain model.
//!
//! # Responsibility
//! - Define the bag record and its eager-loaded cuboid projection.
//! - Provide occupied/available volume arithmetic for capacity checks.
//!
//! # Invariants
//! - `volume` is positive and fits in SQLite `INTEGER` (`i64`).
//! - `volume` does not change after creation.

use crate::model::cuboid::{Cuboid, CuboidId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a bag.
pub type BagId = Uuid;

/// Largest volume the storage layer can represent.
pub const MAX_BAG_VOLUME: u64 = i64::MAX as u64;

/// Container with a fixed volume capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bag {
    pub id: BagId,
    pub title: Option<String>,
    pub volume: u64,
}

impl Bag {
    /// Creates a bag with a freshly generated id.
    pub fn new(volume: u64, title: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            volume,
        }
    }

    /// Checks capacity bounds before persistence.
    pub fn validate(&self) -> Result<(), BagValidationError> {
        if self.volume == 0 {
            return Err(BagValidationError::NonPositiveVolume);
        }
        if self.volume > MAX_BAG_VOLUME {
            return Err(BagValidationError::VolumeTooLarge(self.volume));
        }
        Ok(())
    }
}

/// Input validation failure for bag writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BagValidationError {
    NonPositiveVolume,
    VolumeTooLarge(u64),
}

impl Display for BagValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveVolume => write!(f, "bag volume must be a positive integer"),
            Self::VolumeTooLarge(volume) => {
                write!(f, "bag volume {volume} exceeds maximum {MAX_BAG_VOLUME}")
            }
        }
    }
}

impl Error for BagValidationError {}

/// Write request for creating a bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBag {
    pub title: Option<String>,
    pub volume: u64,
}

/// Bag together with every cuboid currently referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagWithCuboids {
    pub bag: Bag,
    pub cuboids: Vec<Cuboid>,
}

impl BagWithCuboids {
    /// Sums volumes of held cuboids, skipping `exclude` when given.
    pub fn occupied_volume(&self, exclude: Option<CuboidId>) -> u128 {
        self.cuboids
            .iter()
            .filter(|cuboid| Some(cuboid.id) != exclude)
            .map(Cuboid::volume)
            .sum()
    }

    /// Volume of every held cuboid.
    pub fn payload_volume(&self) -> u128 {
        self.occupied_volume(None)
    }

    /// Remaining capacity, saturating at zero for over-filled bags.
    pub fn available_volume(&self) -> u128 {
        u128::from(self.bag.volume).saturating_sub(self.payload_volume())
    }
}

/// Cuboid paired with its owning bag, as returned by list reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuboidWithBag {
    pub cuboid: Cuboid,
    pub bag: Bag,
}
