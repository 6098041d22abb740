//! Core data structures and traits for meshseq
//!
//! This crate holds the in-memory frame store of a mesh sequence, the rules
//! for discovering numbered frame files, and the [`Session`] that drives
//! loading, frame scrubbing and exporting through the capability traits in
//! [`traits`].

pub mod point;
pub mod frame;
pub mod naming;
pub mod sequence;
pub mod traits;
pub mod config;
pub mod session;
pub mod error;

pub use point::*;
pub use frame::*;
pub use naming::*;
pub use sequence::*;
pub use traits::*;
pub use config::*;
pub use session::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4};
