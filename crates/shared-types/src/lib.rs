//! Domain types shared across the ClauseLens workspace
//!
//! Everything that crosses a crate boundary lives here: the clause and entity
//! records returned by the ML service, the four risk tiers used for charting,
//! the cached analysis report and the metadata kept for an uploaded file.

pub mod document;
pub mod risk;
pub mod types;

pub use document::{DocumentFormat, UploadedFile};
pub use risk::{RiskBucket, RiskLevel};
pub use types::{AnalysisReport, Clause, Entity};
