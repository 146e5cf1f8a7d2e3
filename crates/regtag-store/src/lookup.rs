//! # Reverse Lookup
//!
//! Answers "which tags currently point at digest D?" without a reverse
//! index, by reading every tag's current link.
//!
//! ## Algorithm
//!
//! 1. Enumerate tags with [`TagStore::all`]. An untagged repository is an
//!    empty tag set, not an error.
//! 2. Read each tag's current link in its own task. A counting semaphore
//!    admits at most `lookup_concurrency` reads at a time; a task is only
//!    spawned once it holds a permit, and releases it when it finishes.
//! 3. A read that finds no link (the tag was removed after enumeration) is
//!    skipped. A read that matches the target contributes its tag.
//! 4. Any other read failure is fatal: dispatch stops, the shared
//!    [`CancellationToken`] is cancelled so in-flight reads stop early,
//!    and the first error observed is returned with no partial results.
//!
//! All spawned tasks have finished before `lookup` returns, on both the
//! success and the failure path.

use std::sync::Arc;

use regtag_core::{Descriptor, Digest};
use regtag_driver::DriverError;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::TagStoreError;
use crate::link::LinkStore;
use crate::paths::{path_for, PathSpec};
use crate::tags::TagStore;

/// Outcome of reading one tag's current link.
enum UnitOutcome {
    Matched(String),
    Skipped,
    Failed(DriverError),
}

/// Read one tag's current link and compare it with `target`.
async fn scan_tag(
    links: LinkStore,
    path: String,
    tag: String,
    target: Arc<Digest>,
    cancel: CancellationToken,
) -> UnitOutcome {
    if cancel.is_cancelled() {
        return UnitOutcome::Skipped;
    }

    let read = tokio::select! {
        biased;
        _ = cancel.cancelled() => return UnitOutcome::Skipped,
        read = links.read_link(&path) => read,
    };

    match read {
        Ok(digest) if digest == *target => {
            if cancel.is_cancelled() {
                UnitOutcome::Skipped
            } else {
                UnitOutcome::Matched(tag)
            }
        }
        Ok(_) => UnitOutcome::Skipped,
        Err(DriverError::PathNotFound { .. }) => {
            tracing::debug!(tag = %tag, path = %path, "tag vanished during lookup");
            UnitOutcome::Skipped
        }
        Err(e) => UnitOutcome::Failed(e),
    }
}

impl TagStore {
    /// Return every tag whose current link equals `desc.digest`.
    ///
    /// Order of the result is unspecified.
    pub async fn lookup(&self, desc: &Descriptor) -> Result<Vec<String>, TagStoreError> {
        let all_tags = match self.all().await {
            Ok(tags) => tags,
            Err(TagStoreError::RepositoryUnknown { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        tracing::debug!(
            repository = %self.repository,
            digest = %desc.digest,
            tags = all_tags.len(),
            "lookup started"
        );

        let target = Arc::new(desc.digest.clone());
        let limiter = Arc::new(Semaphore::new(
            self.config
                .lookup_concurrency
                .clamp(1, Semaphore::MAX_PERMITS),
        ));
        let cancel = CancellationToken::new();
        let mut units: JoinSet<UnitOutcome> = JoinSet::new();
        let mut pending = all_tags
            .into_iter()
            .map(|tag| {
                let path = path_for(PathSpec::TagCurrentLink {
                    name: &self.repository,
                    tag: &tag,
                })?;
                Ok((tag, path))
            })
            .collect::<Result<Vec<_>, TagStoreError>>()?
            .into_iter()
            .peekable();

        let mut matches = Vec::new();
        let mut failure: Option<DriverError> = None;

        loop {
            tokio::select! {
                biased;
                Some(joined) = units.join_next() => {
                    let outcome = match joined {
                        Ok(outcome) => outcome,
                        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                        // Units are never aborted, so cancellation is the only other
                        // join error and cannot happen here.
                        Err(_) => UnitOutcome::Skipped,
                    };
                    match outcome {
                        UnitOutcome::Matched(tag) => matches.push(tag),
                        UnitOutcome::Skipped => {}
                        UnitOutcome::Failed(e) => {
                            if failure.is_none() {
                                tracing::warn!(
                                    repository = %self.repository,
                                    error = %e,
                                    "lookup aborted by backend error"
                                );
                                cancel.cancel();
                                failure = Some(e);
                            }
                        }
                    }
                }
                Ok(permit) = limiter.clone().acquire_owned(),
                    if failure.is_none() && pending.peek().is_some() =>
                {
                    let Some((tag, path)) = pending.next() else { continue };
                    let links = self.links.clone();
                    let target = Arc::clone(&target);
                    let cancel = cancel.clone();
                    units.spawn(async move {
                        let _permit = permit;
                        scan_tag(links, path, tag, target, cancel).await
                    });
                }
                else => break,
            }
        }

        if let Some(e) = failure {
            return Err(TagStoreError::Backend(e));
        }
        tracing::debug!(
            repository = %self.repository,
            digest = %desc.digest,
            matches = matches.len(),
            "lookup finished"
        );
        Ok(matches)
    }
}
