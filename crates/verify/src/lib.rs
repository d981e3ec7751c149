//! Content integrity verification: hashing, fetch-and-compare with
//! timeout and retry, heuristic content analysis, and bounded-concurrency
//! batch runs.

pub mod analysis;
pub mod batch;
pub mod engine;
pub mod error;

pub use analysis::{analyze, ContentAnalysis};
pub use batch::{no_progress, BatchFailure, BatchItem, BatchReport};
pub use engine::{VerificationEngine, VerificationReport, VerifyOptions};
pub use error::{VerifyError, VerifyResult};
