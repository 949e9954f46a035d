//! `wardpop-extract`: ward population tables from paginated census reports.
//!
//! Pure engine crate: receives pages (text + detected tables) in document
//! order and returns population records. Region and council attribution is
//! carried forward across pages, so pages must be supplied strictly in order.

pub mod config;
pub mod context;
pub mod error;
pub mod extractor;
pub mod row;
pub mod rules;
pub mod stats;

pub use config::ExtractConfig;
pub use context::ExtractionContext;
pub use error::ExtractError;
pub use extractor::{Extraction, Extractor, PageOutcome};
pub use row::RejectReason;
pub use stats::ExtractionStats;
