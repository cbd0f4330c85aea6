//! Ordered compensation stack for saga steps.

use futures_util::future::BoxFuture;

use crate::error::Result;

struct Compensation {
    label: String,
    undo: BoxFuture<'static, Result<()>>,
}

/// An ordered list of compensating actions, unwound in reverse on failure.
///
/// Each completed saga step that must be undone on a later failure pushes
/// its compensation here. When a step fails, [`unwind`] runs the recorded
/// compensations newest-first; a compensation that itself fails is logged
/// and counted but never halts the unwind or masks the original error.
/// Once a saga passes its last compensable step, [`disarm`] drops the stack
/// without running anything.
///
/// [`unwind`]: CompensationStack::unwind
/// [`disarm`]: CompensationStack::disarm
#[derive(Default)]
pub struct CompensationStack {
    steps: Vec<Compensation>,
}

impl CompensationStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a compensation for a just-completed step.
    pub fn push(&mut self, label: impl Into<String>, undo: BoxFuture<'static, Result<()>>) {
        self.steps.push(Compensation {
            label: label.into(),
            undo,
        });
    }

    /// Returns the number of recorded compensations.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no compensations are recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs all recorded compensations in reverse order.
    pub async fn unwind(self) {
        for step in self.steps.into_iter().rev() {
            match step.undo.await {
                Ok(()) => {
                    tracing::debug!(step = %step.label, "compensation applied");
                }
                Err(e) => {
                    metrics::counter!("compensation_failures_total").increment(1);
                    tracing::warn!(step = %step.label, error = %e, "compensation step failed");
                }
            }
        }
    }

    /// Drops all recorded compensations without running them.
    pub fn disarm(mut self) {
        self.steps.clear();
    }
}
