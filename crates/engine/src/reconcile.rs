//! Reconciliation
//!
//! Composes resolution, merge, change detection and projection into the
//! two flows the service runs:
//!
//! - an upstream run completed: find the draft run, merge the new facts
//!   into its payload and, only if something changed, publish an update;
//! - the execution engine reported a state change: project it onto the
//!   run and publish it.
//!
//! The reconciler holds no state between calls. The update event is
//! projected before anything is written, so a projection failure leaves the
//! store untouched. When a [`PayloadCommitter`] is attached, the changed
//! payload is committed with compare-and-set and then the update is
//! published; a `Conflict` means the caller should re-run the reconciliation
//! against the fresh payload. Once a commit has landed a retried merge is a
//! no-op, so a publish failure after the commit is reported as
//! [`ReconcileOutcome::Unpublished`] carrying the event to republish.

use draftrun_core::{
    DetailType, Error, EventEnvelope, EventSink, LibraryRef, Payload, PayloadCommitter,
    PortalRunId, Result, RunStatus, RunStore, SelectionCriteria, StateChangeEvent, ValueMap,
    WorkflowRun,
};
use tracing::{debug, info, warn};

use crate::compare::{diff, has_changed};
use crate::merge::{merge_with_report, MergePolicy};
use crate::projector::EventProjector;
use crate::resolver::RunResolver;

/// Result of an upstream reconciliation
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// No draft run matched the criteria
    NoDraftRun,
    /// The merge added nothing; no event was published
    Unchanged {
        /// The resolved run
        run: WorkflowRun,
    },
    /// The payload changed and an update was published
    Updated {
        /// The resolved run
        run: WorkflowRun,
        /// The published update
        event: StateChangeEvent,
    },
    /// The payload was committed but publishing the update failed
    Unpublished {
        /// The resolved run
        run: WorkflowRun,
        /// The update still to be published, see [`Reconciler::publish_update`]
        event: StateChangeEvent,
        /// Why publishing failed
        error: Error,
    },
}

/// Latest payload of a run without store bookkeeping fields.
///
/// A missing payload is `Ok(None)`.
pub fn fetch_draft_payload(
    store: &dyn RunStore,
    portal_run_id: &PortalRunId,
) -> Result<Option<Payload>> {
    let run = match store.get_run_by_portal_run_id(portal_run_id) {
        Ok(run) => run,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e),
    };
    match store.get_latest_payload(&run.orcabus_id) {
        Ok(payload) => Ok(Some(payload.without_store_fields())),
        Err(e) if e.is_not_found() => {
            debug!(target: "draftrun::reconcile", %portal_run_id, "No draft payload");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Runs the reconciliation flows against borrowed collaborators
pub struct Reconciler<'a> {
    store: &'a dyn RunStore,
    sink: &'a dyn EventSink,
    committer: Option<&'a dyn PayloadCommitter>,
    policy: &'a MergePolicy,
    projector: &'a EventProjector,
    source: &'a str,
}

impl<'a> Reconciler<'a> {
    /// Reconciler publishing events with the given `source`
    pub fn new(
        store: &'a dyn RunStore,
        sink: &'a dyn EventSink,
        policy: &'a MergePolicy,
        projector: &'a EventProjector,
        source: &'a str,
    ) -> Self {
        Reconciler {
            store,
            sink,
            committer: None,
            policy,
            projector,
            source,
        }
    }

    /// Commit changed payloads through `committer` before publishing
    pub fn with_committer(mut self, committer: &'a dyn PayloadCommitter) -> Self {
        self.committer = Some(committer);
        self
    }

    fn publish(&self, detail_type: DetailType, event: &StateChangeEvent) -> Result<()> {
        self.sink.publish(EventEnvelope {
            source: self.source.to_string(),
            detail_type,
            detail: event.clone(),
        })
    }

    /// Merge upstream `facts` into the draft run selected by `criteria`.
    ///
    /// The update event keeps the run's current status.
    pub fn reconcile_upstream(
        &self,
        criteria: &SelectionCriteria,
        facts: &ValueMap,
    ) -> Result<ReconcileOutcome> {
        self.reconcile_upstream_with(criteria, facts, None)
    }

    /// Like [`reconcile_upstream`](Self::reconcile_upstream); `libraries`,
    /// when given, replace the run's libraries on the update event.
    pub fn reconcile_upstream_with(
        &self,
        criteria: &SelectionCriteria,
        facts: &ValueMap,
        libraries: Option<&[LibraryRef]>,
    ) -> Result<ReconcileOutcome> {
        let run = match RunResolver::new(self.store).resolve(criteria)? {
            Some(run) => run,
            None => {
                info!(target: "draftrun::reconcile", workflow = %criteria.workflow_name, "No draft run to update");
                return Ok(ReconcileOutcome::NoDraftRun);
            }
        };

        let previous = self.store.get_latest_payload(&run.orcabus_id)?;
        let report = merge_with_report(&previous, facts, self.policy);

        let old_view = previous.to_value();
        let new_view = report.payload.to_value();
        if !has_changed(&old_view, &new_view) {
            info!(
                target: "draftrun::reconcile",
                run_id = %run.orcabus_id,
                skipped = report.skipped.len(),
                "Payload unchanged, update suppressed"
            );
            return Ok(ReconcileOutcome::Unchanged { run });
        }

        for change in diff(&old_view, &new_view) {
            debug!(target: "draftrun::compare", path = %change.path, kind = ?change.kind, "Payload changed");
        }

        let mut event = self.projector.project(&run, run.status(), &report.payload)?;
        if let Some(libraries) = libraries {
            event.libraries = libraries.to_vec();
        }

        match self.committer {
            Some(committer) => {
                committer.commit_payload(&run.orcabus_id, &previous, report.payload)?;
                if let Err(error) = self.publish_update(&event) {
                    warn!(
                        target: "draftrun::reconcile",
                        run_id = %run.orcabus_id,
                        %error,
                        "Payload committed but update not published"
                    );
                    return Ok(ReconcileOutcome::Unpublished { run, event, error });
                }
            }
            None => self.publish_update(&event)?,
        }

        info!(
            target: "draftrun::reconcile",
            run_id = %run.orcabus_id,
            applied = ?report.applied,
            "Draft payload updated"
        );
        Ok(ReconcileOutcome::Updated { run, event })
    }

    /// Publish `event` as a `WorkflowRunUpdate`
    pub fn publish_update(&self, event: &StateChangeEvent) -> Result<()> {
        self.publish(DetailType::WorkflowRunUpdate, event)
    }

    /// Project an engine-reported status onto the run with `portal_run_id`
    /// and publish it.
    pub fn project_engine_event(
        &self,
        portal_run_id: &PortalRunId,
        status: RunStatus,
    ) -> Result<StateChangeEvent> {
        let run = self.store.get_run_by_portal_run_id(portal_run_id)?;
        let payload = self.store.get_latest_payload(&run.orcabus_id)?;
        let event = self.projector.project(&run, status, &payload)?;
        self.publish(DetailType::WorkflowRunStateChange, &event)?;
        Ok(event)
    }
}
