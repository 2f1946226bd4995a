//! Backward pagination over the vault event stream.

use chrono::NaiveDate;
use tracing::{debug, info, info_span, warn};
use vaultline_core::{Bucket, CacheLayout, Cursor, Event, EventId};
use vaultline_publish::{Forwarder, PublishReceipt};
use vaultline_storage::{BucketStore, ManifestLog, RunLock, mark_delivered};
use vaultline_vault::{IdentityDirectory, VaultSession};

use crate::error::{PipelineError, PipelineResult};
use crate::policy::AgePolicy;

/// Dates a run is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    /// Reference date for event ages.
    pub today: NaiveDate,
    /// Date recorded in the manifest.
    pub run_date: NaiveDate,
}

impl RunContext {
    /// A run evaluated and recorded on `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self {
            today: date,
            run_date: date,
        }
    }

    /// A run on the host's local date.
    #[must_use]
    pub fn local() -> Self {
        Self::on(chrono::Local::now().date_naive())
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopReason {
    /// The vault had no older events.
    #[default]
    Exhausted,
    /// An event reached the age threshold.
    AgeThreshold {
        /// The event that triggered the stop. It was persisted.
        event_id: EventId,
        /// Its day partition.
        bucket: Bucket,
        /// Its age in days.
        age_days: i64,
    },
}

/// Result of processing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Fetch the next older page with this cursor.
    Continue(Cursor),
    /// End the run.
    Stop(StopReason),
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages fetched, including the final empty one.
    pub pages: usize,
    /// Events processed.
    pub events: usize,
    /// Event files written.
    pub files_written: usize,
    /// Events the endpoint accepted.
    pub published: usize,
    /// Events the endpoint rejected or could not be reached for.
    pub publish_failures: usize,
    /// Files removed after delivery.
    pub removed: usize,
    /// Why the run ended.
    pub stop: StopReason,
}

/// Drives one run: sign in, page backwards from the newest event, persist
/// and forward each event, and sign out on every path once signed in.
#[derive(Debug)]
pub struct PaginationDriver<S, F> {
    session: S,
    store: BucketStore,
    forwarder: Option<F>,
    policy: AgePolicy,
    context: RunContext,
}

impl<S, F> PaginationDriver<S, F>
where
    S: VaultSession,
    F: Forwarder,
{
    /// Create a driver that persists under `layout` and does not forward.
    #[must_use]
    pub fn new(session: S, layout: CacheLayout, policy: AgePolicy, context: RunContext) -> Self {
        Self {
            session,
            store: BucketStore::new(layout),
            forwarder: None,
            policy,
            context,
        }
    }

    /// Forward every stored event with `forwarder`.
    #[must_use]
    pub fn forward_to(mut self, forwarder: F) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    /// Execute the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be prepared or locked, the vault
    /// rejects authentication, a page cannot be fetched or parsed, or an
    /// event cannot be persisted. Publish failures are not errors.
    pub fn run(&mut self) -> PipelineResult<RunSummary> {
        let span = info_span!("run", run_date = %self.context.run_date);
        let _enter = span.enter();

        let layout = self.store.layout().clone();
        layout.ensure().map_err(|source| PipelineError::Bootstrap {
            path: layout.root().to_path_buf(),
            source,
        })?;
        let _lock = RunLock::acquire(&layout)?;
        let mut manifest = ManifestLog::open(&layout, self.context.run_date)?;

        self.session.sign_in()?;
        let result = self.paginate(&mut manifest);

        if let Err(e) = self.session.sign_out() {
            match &result {
                Ok(_) => warn!(error = %e, "sign-out failed"),
                Err(_) => debug!(error = %e, "sign-out failed after run error"),
            }
        }

        let summary = result?;
        info!(
            pages = summary.pages,
            events = summary.events,
            files_written = summary.files_written,
            published = summary.published,
            publish_failures = summary.publish_failures,
            removed = summary.removed,
            stop = ?summary.stop,
            "run complete"
        );
        Ok(summary)
    }

    fn paginate(&mut self, manifest: &mut ManifestLog) -> PipelineResult<RunSummary> {
        let directory = IdentityDirectory::from_users(self.session.list_users()?);
        info!(users = directory.len(), "identity directory built");

        let mut summary = RunSummary::default();
        let mut cursor = Cursor::Unset;
        loop {
            if !cursor.is_unset() {
                // Refresh the token so a long pagination never outlives it.
                self.session.sign_in()?;
            }
            let page = self.session.list_events(&cursor)?;
            summary.pages = summary.pages.saturating_add(1);
            debug!(cursor = %cursor, events = page.len(), "fetched page");

            match self.process_page(&page, &cursor, &directory, manifest, &mut summary)? {
                PageOutcome::Continue(next) => cursor = next,
                PageOutcome::Stop(reason) => {
                    summary.stop = reason;
                    return Ok(summary);
                },
            }
        }
    }

    /// Persist, record and forward each event of a page in vault order.
    fn process_page(
        &self,
        page: &[Event],
        cursor: &Cursor,
        directory: &IdentityDirectory,
        manifest: &mut ManifestLog,
        summary: &mut RunSummary,
    ) -> PipelineResult<PageOutcome> {
        let Some(last) = page.last() else {
            return Ok(PageOutcome::Stop(StopReason::Exhausted));
        };

        for event in page {
            let enriched = event.enrich(directory.resolve(event.actor_id.as_deref()));
            let path = self.store.write(&enriched)?;
            summary.files_written = summary.files_written.saturating_add(1);
            manifest.append(&enriched.bucket, &enriched.id, &path)?;
            summary.events = summary.events.saturating_add(1);

            self.publish(&path, summary);

            let age_days = enriched.bucket.age_days(self.context.today);
            if self.policy.is_exceeded(age_days) {
                info!(
                    event_id = %enriched.id,
                    bucket = %enriched.bucket,
                    age_days,
                    older_days = self.policy.older_days(),
                    "age threshold reached"
                );
                return Ok(PageOutcome::Stop(StopReason::AgeThreshold {
                    event_id: enriched.id,
                    bucket: enriched.bucket,
                    age_days,
                }));
            }
        }

        if cursor.event_id() == Some(&last.id) {
            warn!(event_id = %last.id, "vault returned the cursor event again, stopping");
            return Ok(PageOutcome::Stop(StopReason::Exhausted));
        }
        Ok(PageOutcome::Continue(Cursor::Before(last.id.clone())))
    }

    fn publish(&self, path: &std::path::Path, summary: &mut RunSummary) {
        let Some(forwarder) = &self.forwarder else {
            return;
        };
        match forwarder.forward(path) {
            Ok(PublishReceipt::Delivered { removed }) => {
                summary.published = summary.published.saturating_add(1);
                if removed {
                    summary.removed = summary.removed.saturating_add(1);
                } else if let Err(e) = mark_delivered(path) {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "delivered event not marked, a sweep will resend it"
                    );
                }
            },
            Ok(PublishReceipt::Rejected { status }) => {
                warn!(path = %path.display(), status, "endpoint rejected event, kept for retry");
                summary.publish_failures = summary.publish_failures.saturating_add(1);
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "publish failed, kept for retry");
                summary.publish_failures = summary.publish_failures.saturating_add(1);
            },
        }
    }
}
