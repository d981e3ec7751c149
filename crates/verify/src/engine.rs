//! Remote content verification with timeout, retry, and integrity reporting.

use crate::analysis::{analyze, ContentAnalysis};
use crate::error::{VerifyError, VerifyResult};
use moor_core::{ContentAddress, ContentDigest, HashAlgorithm, VerificationConfig};
use moor_store::{ContentStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options for a single verification.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerifyOptions {
    /// Digest algorithm; defaults to the configured one.
    pub algorithm: Option<HashAlgorithm>,
    /// Also run heuristic content analysis on the fetched bytes.
    pub analyze: bool,
}

/// Outcome of a verification.
///
/// `fetch_ok` and `hash_match` are deliberately separate: content can be
/// fetched successfully and still fail the integrity comparison, and the
/// two facts must never be conflated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationReport {
    /// The verified address.
    pub address: ContentAddress,
    /// Expected digest, hex, as supplied by the caller.
    pub expected: Option<String>,
    /// Actual digest of the fetched bytes, hex.
    pub actual: String,
    /// Whether the fetch succeeded.
    pub fetch_ok: bool,
    /// Whether the digest matched the expectation; `None` when no
    /// expectation was supplied.
    pub hash_match: Option<bool>,
    /// Algorithm used.
    pub algorithm: HashAlgorithm,
    /// Attempts the fetch consumed.
    pub attempts: u32,
    /// Fetched payload size in bytes.
    pub size: u64,
    /// Heuristic analysis, when requested.
    pub analysis: Option<ContentAnalysis>,
}

impl VerificationReport {
    /// Whether the content is fully verified: fetched and, if an
    /// expectation was given, matching.
    pub fn is_verified(&self) -> bool {
        self.fetch_ok && self.hash_match.unwrap_or(true)
    }
}

/// Verifies content integrity against a [`ContentStore`].
pub struct VerificationEngine {
    store: Arc<dyn ContentStore>,
    config: VerificationConfig,
}

impl VerificationEngine {
    /// Create an engine over a store.
    pub fn new(store: Arc<dyn ContentStore>, config: VerificationConfig) -> Self {
        Self { store, config }
    }

    /// Upper bound on in-flight verifications during batch runs.
    pub fn batch_concurrency(&self) -> usize {
        self.config.batch_concurrency.max(1)
    }

    /// Compute the digest of raw bytes with the given or default algorithm.
    ///
    /// Deterministic: identical bytes always produce identical digests.
    pub fn hash(&self, data: &[u8], algorithm: Option<HashAlgorithm>) -> ContentDigest {
        ContentDigest::compute(data, algorithm.unwrap_or(self.config.default_algorithm))
    }

    /// Compute the digest of a structured value via canonical serialization.
    pub fn hash_value(
        &self,
        value: &serde_json::Value,
        algorithm: Option<HashAlgorithm>,
    ) -> VerifyResult<ContentDigest> {
        ContentDigest::compute_value(value, algorithm.unwrap_or(self.config.default_algorithm))
            .map_err(VerifyError::Hashing)
    }

    /// Validate address structure without any I/O.
    pub fn validate_address_format(&self, address: &str) -> VerifyResult<ContentAddress> {
        ContentAddress::parse(address).map_err(VerifyError::MalformedAddress)
    }

    /// Verify content behind an address against an optional expected digest.
    ///
    /// The address is validated first; malformed input fails fast and is
    /// never retried. The fetch races a timeout and a timed-out attempt
    /// counts against the retry budget. Exhausting the budget surfaces a
    /// single terminal error wrapping the last failure.
    pub async fn verify(
        &self,
        address: &str,
        expected: Option<&str>,
        options: VerifyOptions,
    ) -> VerifyResult<VerificationReport> {
        let address = ContentAddress::parse(address).map_err(VerifyError::MalformedAddress)?;
        let algorithm = options.algorithm.unwrap_or(self.config.default_algorithm);
        let policy = self.config.retry;
        let timeout = self.config.timeout();

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let failure = match tokio::time::timeout(timeout, self.store.get(&address)).await {
                Ok(Ok(bytes)) => {
                    let digest = ContentDigest::compute(&bytes, algorithm);
                    let actual = digest.to_hex();
                    let hash_match =
                        expected.map(|want| want.eq_ignore_ascii_case(actual.as_str()));
                    if hash_match == Some(false) {
                        tracing::warn!(
                            address = %address,
                            expected = expected.unwrap_or_default(),
                            actual = %actual,
                            "integrity mismatch"
                        );
                    }
                    let analysis = options.analyze.then(|| analyze(&bytes));
                    return Ok(VerificationReport {
                        address,
                        expected: expected.map(str::to_string),
                        actual,
                        fetch_ok: true,
                        hash_match,
                        algorithm,
                        attempts: attempt,
                        size: bytes.len() as u64,
                        analysis,
                    });
                }
                Ok(Err(err)) => err,
                // The fetch future is dropped here; cancellation is
                // cooperative, the remote call is merely no longer awaited.
                Err(_elapsed) => StoreError::Timeout(timeout),
            };

            if attempt >= policy.max_attempts() {
                return Err(VerifyError::RetryExhausted {
                    attempts: attempt,
                    source: failure,
                });
            }
            tracing::warn!(
                address = %address,
                attempt,
                error = %failure,
                "fetch failed, retrying"
            );
            tokio::time::sleep(policy.delay_for(attempt)).await;
        }
    }
}
