//! Core use-case services.
//!
//! # Responsibility
//! - Enforce the bag capacity invariant on cuboid writes.
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod bag_service;
pub mod capacity;
pub mod cuboid_service;
