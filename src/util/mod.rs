//! Utility types and functions.
//!
//! This module contains fundamental types used throughout the library:
//! - [`ScalarType`] - Primitive field types and the scalar decoder
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod error;
mod math;
mod scalar;

pub use error::*;
pub use math::*;
pub use scalar::*;
