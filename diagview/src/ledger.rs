//! Bookkeeping for diagram renders across a page lifetime.
//!
//! Each render job carries a generation stamped from a page-wide counter.
//! A record only accepts the result whose generation matches the one it
//! holds, so restamping a record (on theme change) turns every in-flight
//! job for it stale without cancelling anything.
//!
//! The rendering runtime has a single global theme setting, so at most one
//! themed batch runs at a time: a re-render for another theme requested
//! while jobs are in flight is queued and starts once they have all settled.

use serde::Serialize;

use crate::model::{DiagramStatus, Theme};

pub type DiagramId = usize;
pub type Generation = u64;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiagramRecord {
    pub source: String,
    pub status: DiagramStatus,
    pub generation: Generation,
    /// A successfully rendered image is on the page.
    pub displayed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderJob {
    pub id: DiagramId,
    pub generation: Generation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchPlan {
    /// Nothing to render.
    Idle,
    /// Queued behind jobs still in flight for another theme.
    Deferred,
    Start { theme: Theme, jobs: Vec<RenderJob> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Show the new image and attach a fresh viewport.
    Display,
    /// A newer generation superseded this job; drop its output.
    Discard,
    /// Render failed but an earlier image is showing; keep it.
    KeepPrevious,
    /// Render failed with nothing to fall back to; show the source again.
    Revert,
}

#[derive(Debug, Default)]
pub struct RenderLedger {
    records: Vec<DiagramRecord>,
    next_generation: Generation,
    in_flight: usize,
    active_theme: Option<Theme>,
    queued: Option<Theme>,
}

impl RenderLedger {
    pub fn new() -> RenderLedger { RenderLedger::default() }

    pub fn register(&mut self, source: impl Into<String>) -> DiagramId {
        self.records.push(DiagramRecord {
            source: source.into(),
            status: DiagramStatus::Unprocessed,
            generation: 0,
            displayed: false,
        });
        self.records.len() - 1
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn get(&self, id: DiagramId) -> Option<&DiagramRecord> { self.records.get(id) }
    pub fn records(&self) -> &[DiagramRecord] { &self.records }
    pub fn in_flight(&self) -> usize { self.in_flight }
    pub fn queued(&self) -> Option<Theme> { self.queued }

    pub fn has_rendered(&self) -> bool {
        self.records.iter().any(|r| matches!(r.status, DiagramStatus::Rendered | DiagramStatus::Pending))
    }

    /// Plans a render pass. `force` re-renders diagrams already on the page
    /// (theme change); otherwise only unprocessed blocks are picked up.
    pub fn request_batch(&mut self, theme: Theme, force: bool) -> BatchPlan {
        let targets: Vec<DiagramId> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| match r.status {
                DiagramStatus::Unprocessed => !force,
                DiagramStatus::Rendered | DiagramStatus::Pending => force,
                DiagramStatus::Error => false,
            })
            .map(|(id, _)| id)
            .collect();
        if targets.is_empty() {
            log::trace!("render batch (force {force}) has no targets");
            return BatchPlan::Idle;
        }

        if self.in_flight > 0 && self.active_theme != Some(theme) {
            for id in targets {
                self.stamp(id);
            }
            log::debug!("deferring {} render until in-flight jobs settle", theme.as_str());
            self.queued = Some(theme);
            return BatchPlan::Deferred;
        }

        self.active_theme = Some(theme);
        self.queued = None;
        let jobs: Vec<RenderJob> = targets.into_iter().map(|id| self.stamp(id)).collect();
        self.in_flight += jobs.len();
        BatchPlan::Start { theme, jobs }
    }

    /// Whether `job` is still the newest render for its diagram.
    pub fn is_current(&self, job: RenderJob) -> bool {
        self.records.get(job.id).is_some_and(|r| r.generation == job.generation)
    }

    /// Records the outcome of one render job.
    pub fn complete(&mut self, job: RenderJob, succeeded: bool) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Some(record) = self.records.get_mut(job.id) else { return Completion::Discard };
        if record.generation != job.generation {
            return Completion::Discard;
        }
        if succeeded {
            record.status = DiagramStatus::Rendered;
            record.displayed = true;
            Completion::Display
        } else if record.displayed {
            record.status = DiagramStatus::Rendered;
            Completion::KeepPrevious
        } else {
            record.status = DiagramStatus::Error;
            Completion::Revert
        }
    }

    /// `jobs` will never complete: the runtime never became available or
    /// the page was torn down. Current ones go back to unprocessed (or stay
    /// rendered when an image is showing).
    pub fn abandon(&mut self, jobs: &[RenderJob]) {
        self.in_flight = self.in_flight.saturating_sub(jobs.len());
        for job in jobs {
            if let Some(record) = self.records.get_mut(job.id) {
                if record.generation == job.generation {
                    record.status = if record.displayed { DiagramStatus::Rendered } else { DiagramStatus::Unprocessed };
                }
            }
        }
    }

    /// A queued theme, once nothing is in flight any more.
    pub fn take_queued(&mut self) -> Option<Theme> {
        if self.in_flight == 0 { self.queued.take() } else { None }
    }

    fn stamp(&mut self, id: DiagramId) -> RenderJob {
        self.next_generation += 1;
        let generation = self.next_generation;
        let record = &mut self.records[id];
        record.generation = generation;
        record.status = DiagramStatus::Pending;
        RenderJob { id, generation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs(plan: BatchPlan) -> Vec<RenderJob> {
        match plan {
            BatchPlan::Start { jobs, .. } => jobs,
            other => panic!("expected a started batch, got {other:?}"),
        }
    }

    #[test]
    fn generations_increase_across_batches() {
        let mut l = RenderLedger::new();
        l.register("graph TD; A-->B");
        l.register("graph TD; C-->D");
        let first = jobs(l.request_batch(Theme::Default, false));
        assert_eq!(first.len(), 2);
        assert!(first[0].generation < first[1].generation);
        for j in &first {
            assert_eq!(l.complete(*j, true), Completion::Display);
        }
        let second = jobs(l.request_batch(Theme::Dark, true));
        assert!(second[0].generation > first[1].generation);
    }

    #[test]
    fn unforced_batch_skips_processed_records() {
        let mut l = RenderLedger::new();
        l.register("a");
        let j = jobs(l.request_batch(Theme::Default, false));
        l.complete(j[0], true);
        assert_eq!(l.request_batch(Theme::Default, false), BatchPlan::Idle);
        l.register("b");
        let j = jobs(l.request_batch(Theme::Default, false));
        assert_eq!(j, vec![RenderJob { id: 1, generation: 2 }]);
    }

    #[test]
    fn runtime_failure_leaves_blocks_unprocessed() {
        let mut l = RenderLedger::new();
        l.register("a");
        let j = jobs(l.request_batch(Theme::Default, false));
        l.abandon(&j);
        assert_eq!(l.get(0).unwrap().status, DiagramStatus::Unprocessed);
        assert_eq!(l.in_flight(), 0);
    }

    #[test]
    fn abandoning_a_rerender_keeps_the_displayed_image() {
        let mut l = RenderLedger::new();
        l.register("a");
        let j = jobs(l.request_batch(Theme::Default, false));
        l.complete(j[0], true);
        let j = jobs(l.request_batch(Theme::Dark, true));
        l.abandon(&j);
        assert_eq!(l.get(0).unwrap().status, DiagramStatus::Rendered);
        assert_eq!(l.in_flight(), 0);
    }

    #[test]
    fn error_records_are_not_rerendered_on_theme_change() {
        let mut l = RenderLedger::new();
        l.register("bad");
        let j = jobs(l.request_batch(Theme::Default, false));
        assert_eq!(l.complete(j[0], false), Completion::Revert);
        assert_eq!(l.request_batch(Theme::Dark, true), BatchPlan::Idle);
    }

    #[test]
    fn restamping_makes_older_jobs_stale() {
        let mut l = RenderLedger::new();
        l.register("a");
        let first = jobs(l.request_batch(Theme::Default, false));
        assert!(l.is_current(first[0]));
        let second = jobs(l.request_batch(Theme::Default, true));
        assert!(!l.is_current(first[0]));
        assert!(l.is_current(second[0]));
        assert!(!l.is_current(RenderJob { id: 9, generation: 1 }));
    }
}
