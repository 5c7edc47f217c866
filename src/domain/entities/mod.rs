//! Core domain entities.
//!
//! - [`Link`] - A short id mapped to a destination URL

pub mod link;

pub use link::Link;
