//! Domain model for bags and the cuboids they hold.
//!
//! # Responsibility
//! - Define plain data entities shared by repositories, services and adapters.
//! - Own volume arithmetic so every layer computes it the same way.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID assigned at creation.
//! - Volumes are integers computed in `u128`; they never overflow or round.

pub mod bag;
pub mod cuboid;
