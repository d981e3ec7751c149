//! Bounded-concurrency batch verification.

use crate::engine::{VerificationEngine, VerificationReport, VerifyOptions};
use crate::error::{VerifyError, VerifyResult};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};

/// One address to verify, with an optional expected hex digest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub address: String,
    pub expected: Option<String>,
}

impl BatchItem {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            expected: None,
        }
    }

    pub fn with_expected(address: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            expected: Some(expected.into()),
        }
    }
}

/// A batch item that could not produce a report at all.
///
/// Integrity mismatches are not failures; they land in
/// [`BatchReport::results`] with `hash_match == Some(false)`.
#[derive(Debug)]
pub struct BatchFailure {
    pub address: String,
    pub error: VerifyError,
}

/// Aggregated outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Reports for items whose verification completed, matching or not.
    pub results: Vec<VerificationReport>,
    /// Items whose verification errored out entirely.
    pub errors: Vec<BatchFailure>,
    /// Number of items submitted.
    pub total: usize,
}

impl BatchReport {
    /// Whether every item completed and matched its expectation.
    pub fn all_verified(&self) -> bool {
        self.errors.is_empty() && self.results.iter().all(|r| r.is_verified())
    }
}

impl VerificationEngine {
    /// Verify a set of addresses with bounded concurrency.
    ///
    /// Items run in fixed-size windows of [`batch_concurrency`] each; a
    /// window drains completely before the next one starts, so no more
    /// than that many fetches are ever in flight. One item failing never
    /// aborts the batch.
    ///
    /// `progress` is invoked after every completed item with the number
    /// of items finished so far, the batch total, and that item's
    /// outcome.
    ///
    /// [`batch_concurrency`]: VerificationEngine::batch_concurrency
    pub async fn verify_batch<F>(
        &self,
        items: &[BatchItem],
        options: VerifyOptions,
        mut progress: Option<F>,
    ) -> BatchReport
    where
        F: FnMut(usize, usize, &VerifyResult<VerificationReport>),
    {
        let total = items.len();
        let mut results = Vec::new();
        let mut errors = Vec::new();
        let mut completed = 0usize;

        for window in items.chunks(self.batch_concurrency()) {
            let mut in_flight = FuturesUnordered::new();
            for item in window {
                in_flight.push(async move {
                    let outcome = self
                        .verify(&item.address, item.expected.as_deref(), options)
                        .await;
                    (item.address.clone(), outcome)
                });
            }

            while let Some((address, outcome)) = in_flight.next().await {
                completed += 1;
                if let Some(callback) = progress.as_mut() {
                    callback(completed, total, &outcome);
                }
                match outcome {
                    Ok(report) => results.push(report),
                    Err(error) => {
                        tracing::warn!(address = %address, error = %error, "batch item failed");
                        errors.push(BatchFailure { address, error });
                    }
                }
            }
        }

        BatchReport {
            results,
            errors,
            total,
        }
    }
}

/// No-op progress callback for callers that do not track progress.
pub fn no_progress(_: usize, _: usize, _: &VerifyResult<VerificationReport>) {}
