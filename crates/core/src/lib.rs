//! `wardpop-core`: shared data model.
//!
//! Plain data types passed between extraction, reconciliation and spatial
//! derivation. No IO, no matching logic.

pub mod geometry;
pub mod page;
pub mod population;

pub use geometry::{FeatureOrigin, GeometryUnit, JoinStrategy, ReconciledUnit};
pub use page::{Page, Row, Table};
pub use population::{PopulationCounts, PopulationRecord, UNKNOWN};
