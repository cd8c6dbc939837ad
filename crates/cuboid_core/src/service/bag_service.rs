//! Bag use-case service.
//!
//! # Responsibility
//! - Create bags with validated capacity.
//! - Read bags together with their cuboids and derived volumes.
//!
//! # Invariants
//! - Bag volume is fixed at creation; no API mutates it.
//! - Blank titles are stored as `None`.

use crate::model::bag::{Bag, BagId, BagValidationError, BagWithCuboids, NewBag};
use crate::repo::bag_repo::BagRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for bag use-cases.
#[derive(Debug)]
pub enum BagServiceError {
    InvalidInput(BagValidationError),
    Repo(RepoError),
}

impl Display for BagServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BagServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<BagValidationError> for BagServiceError {
    fn from(value: BagValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for BagServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidBag(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

/// Bag service facade over repository implementations.
pub struct BagService<R: BagRepository> {
    repo: R,
}

impl<R: BagRepository> BagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one empty bag.
    pub fn create_bag(&self, request: &NewBag) -> Result<Bag, BagServiceError> {
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string);
        let bag = Bag::new(request.volume, title);
        bag.validate()?;

        self.repo.create_bag(&bag)?;
        info!(
            "event=bag_create module=service status=ok bag_id={} volume={}",
            bag.id, bag.volume
        );
        Ok(bag)
    }

    /// Gets one bag with its cuboids.
    pub fn get_bag(&self, id: BagId) -> Result<Option<BagWithCuboids>, BagServiceError> {
        Ok(self.repo.get_bag_with_cuboids(id)?)
    }
}
