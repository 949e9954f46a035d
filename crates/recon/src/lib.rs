//! `wardpop-recon`: joins census population records onto ward geometry.
//!
//! Pure engine crate: receives pre-loaded records and units, returns the
//! annotated units and an auditable match report. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;
pub mod normalize;

pub use config::{ExcludeConfig, NormalizeConfig, ReconConfig};
pub use engine::{reconcile, Reconciler};
pub use error::ReconError;
pub use model::{ReconOutcome, ReconReport, StrategyCount};
pub use normalize::{NormalizedKey, Normalizer};
