//! Infrastructure layer.
//!
//! Concrete implementations of the contracts defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Disk and in-memory link repositories
//! - [`id`] - Random id generation

pub mod id;
pub mod persistence;
