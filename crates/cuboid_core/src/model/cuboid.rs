//! Cuboid domain model.
//!
//! # Responsibility
//! - Define the cuboid record and its dimension triple.
//! - Derive volume from dimensions; volume is never stored.
//!
//! # Invariants
//! - Persisted cuboids have strictly positive dimensions.
//! - `bag_id` always references an existing bag once persisted.

use crate::model::bag::BagId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a cuboid.
pub type CuboidId = Uuid;

/// Width/height/depth triple of one cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Returns `width * height * depth`.
    ///
    /// `u32::MAX^3` fits in `u128`, so the product is exact for any input.
    pub fn volume(&self) -> u128 {
        u128::from(self.width) * u128::from(self.height) * u128::from(self.depth)
    }

    /// Checks that every dimension is strictly positive.
    ///
    /// # Errors
    /// - Returns the first zero-valued field in `width, height, depth` order.
    pub fn validate(&self) -> Result<(), CuboidValidationError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if value == 0 {
                return Err(CuboidValidationError::NonPositiveDimension { field });
            }
        }
        Ok(())
    }
}

/// Input validation failure for cuboid writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuboidValidationError {
    /// A dimension was zero.
    NonPositiveDimension { field: &'static str },
}

impl Display for CuboidValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveDimension { field } => {
                write!(f, "cuboid {field} must be a positive integer")
            }
        }
    }
}

impl Error for CuboidValidationError {}

/// Write request for creating or replacing a cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCuboid {
    pub dimensions: Dimensions,
    /// Target bag. On update this may differ from the current bag.
    pub bag_id: BagId,
}

impl NewCuboid {
    pub fn new(width: u32, height: u32, depth: u32, bag_id: BagId) -> Self {
        Self {
            dimensions: Dimensions::new(width, height, depth),
            bag_id,
        }
    }
}

/// Persisted cuboid record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cuboid {
    pub id: CuboidId,
    #[serde(flatten)]
    pub dimensions: Dimensions,
    pub bag_id: BagId,
}

impl Cuboid {
    /// Creates a cuboid with a freshly generated id.
    pub fn new(request: &NewCuboid) -> Self {
        Self::with_id(Uuid::new_v4(), request)
    }

    /// Creates a cuboid carrying an existing id, used for in-place updates.
    pub fn with_id(id: CuboidId, request: &NewCuboid) -> Self {
        Self {
            id,
            dimensions: request.dimensions,
            bag_id: request.bag_id,
        }
    }

    pub fn volume(&self) -> u128 {
        self.dimensions.volume()
    }
}
