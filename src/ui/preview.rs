/// Picture area bookkeeping
///
/// Decides what the picture area shows after the pipeline changed, and
/// coalesces slider moves so a burst of drag events renders once.

use crate::state::pipeline::ApplyOutcome;

/// What the picture area should show next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewChoice {
    /// The freshly rendered output
    Processed,
    /// The picked image, unfiltered
    Source,
    /// Whatever is on screen now
    Keep,
}

/// Pick the display for an apply outcome
///
/// A declined render leaves a stale output in place. Only when there is no
/// output at all does the unfiltered pick show, so the pick is visible.
pub fn choose(outcome: ApplyOutcome, has_processed: bool) -> PreviewChoice {
    match outcome {
        ApplyOutcome::Rendered => PreviewChoice::Processed,
        ApplyOutcome::Declined if !has_processed => PreviewChoice::Source,
        ApplyOutcome::Declined | ApplyOutcome::NoSource => PreviewChoice::Keep,
    }
}

/// Slider value waiting to be rendered
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingIntensity {
    value: Option<f32>,
    scheduled: bool,
}

impl PendingIntensity {
    /// Record a slider value
    ///
    /// Returns true when no commit is queued yet and the caller must
    /// schedule one.
    pub fn push(&mut self, value: f32) -> bool {
        self.value = Some(value);
        !std::mem::replace(&mut self.scheduled, true)
    }

    /// The latest value since the last commit, if any
    pub fn take(&mut self) -> Option<f32> {
        self.scheduled = false;
        self.value.take()
    }

    pub fn value(&self) -> Option<f32> {
        self.value
    }
}
