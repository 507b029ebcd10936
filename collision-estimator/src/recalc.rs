//! Off-thread estimation for interactive front ends.
//!
//! Each input change submits a new calculation. Calculations are never cancelled;
//! instead every submission carries a sequence number and a finished calculation is
//! only published if nothing newer has been submitted or published since.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashu_int::UBig;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::DomainError;
use crate::estimator::{ProbabilityResult, estimate, estimate_specs};
use crate::input::{BucketSpec, HashSpec};
use crate::policy::NumericPolicy;

/// Runs [`estimate`] on tokio's blocking pool.
///
/// The exact path is CPU bound for up to `exact_cutoff` iterations, so it must not run
/// on an async worker thread.
pub async fn estimate_async(
    bucket_count: UBig,
    hash_count: UBig,
    policy: NumericPolicy,
) -> Result<ProbabilityResult, DomainError> {
    run_blocking(move || estimate(&bucket_count, &hash_count, &policy)).await
}

async fn run_blocking<F>(job: F) -> Result<ProbabilityResult, DomainError>
where
    F: FnOnce() -> Result<ProbabilityResult, DomainError> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result,
        // Blocking tasks are never aborted, so a join error is always a panic.
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

/// A published calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub sequence: u64,
    pub result: Result<ProbabilityResult, DomainError>,
}

/// Last-write-wins publisher of estimation results.
#[derive(Debug, Clone)]
pub struct Recalculator {
    latest: Arc<AtomicU64>,
    published: Arc<watch::Sender<Option<Outcome>>>,
}

impl Recalculator {
    /// Creates a recalculator and the receiver that observes its published outcomes.
    pub fn new() -> (Self, watch::Receiver<Option<Outcome>>) {
        let (tx, rx) = watch::channel(None);
        let recalculator = Self { latest: Arc::new(AtomicU64::new(0)), published: Arc::new(tx) };
        (recalculator, rx)
    }

    /// Sequence number of the most recent submission (0 before the first one).
    pub fn latest_sequence(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Starts a calculation that supersedes every earlier submission.
    ///
    /// The returned handle resolves to `true` if the outcome was published and `false`
    /// if a newer submission made it stale. Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        bucket_count: UBig,
        hash_count: UBig,
        policy: NumericPolicy,
    ) -> JoinHandle<bool> {
        self.submit_with(move || estimate(&bucket_count, &hash_count, &policy))
    }

    /// Like [`submit`](Self::submit), resolving both specs on the blocking pool so that
    /// resolution failures are ordered with the other outcomes.
    pub fn submit_specs(
        &self,
        buckets: BucketSpec,
        hashes: HashSpec,
        policy: NumericPolicy,
    ) -> JoinHandle<bool> {
        self.submit_with(move || estimate_specs(&buckets, &hashes, &policy))
    }

    /// Submits an arbitrary job producing an estimation result.
    pub fn submit_with<F>(&self, job: F) -> JoinHandle<bool>
    where
        F: FnOnce() -> Result<ProbabilityResult, DomainError> + Send + 'static,
    {
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.latest);
        let published = Arc::clone(&self.published);

        tokio::spawn(async move {
            let result = run_blocking(job).await;

            if latest.load(Ordering::SeqCst) != sequence {
                tracing::debug!(sequence, "dropping superseded result");
                return false;
            }

            published.send_if_modified(|slot| match slot {
                Some(current) if current.sequence > sequence => false,
                _ => {
                    *slot = Some(Outcome { sequence, result });
                    true
                }
            })
        })
    }
}
