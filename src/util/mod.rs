//! Utility types and functions for photon.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and the [`Rgb`] colour alias

mod error;
mod math;

pub use error::*;
pub use math::*;
