//! `wardpop-spatial`: ward area and population density.
//!
//! Areas come from an ellipsoidal equal-area projection, so every unit is
//! measured in one frame regardless of where it lies in the country.

pub mod config;
pub mod derive;
pub mod error;
pub mod projection;

pub use config::SpatialConfig;
pub use derive::{derive, AreaStats};
pub use error::SpatialError;
pub use projection::LambertAzimuthalEqualArea;
