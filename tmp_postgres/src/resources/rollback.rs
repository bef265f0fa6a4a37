//! Stack of cleanup steps unwound when a later acquisition step fails.

use tracing::{debug, warn};

use crate::{TmpPostgresError, TmpPostgresResult};

type Step<'a> = Box<dyn FnOnce() -> TmpPostgresResult<()> + 'a>;

/// Cleanup steps registered after each successful acquisition.
///
/// Steps run in reverse registration order. Dropping an armed stack (for
/// example while unwinding a panic) runs the remaining steps and logs their
/// failures.
pub(crate) struct Rollback<'a> {
    steps: Vec<(&'static str, Step<'a>)>,
}

impl<'a> Rollback<'a> {
    pub(crate) const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Register the cleanup for a resource that was just acquired.
    pub(crate) fn push<F>(&mut self, label: &'static str, step: F)
    where
        F: FnOnce() -> TmpPostgresResult<()> + 'a,
    {
        self.steps.push((label, Box::new(step)));
    }

    /// Keep every acquired resource; nothing is rolled back.
    pub(crate) fn disarm(mut self) {
        self.steps.clear();
    }

    /// Run every step, newest first, reporting the first failure.
    pub(crate) fn unwind(mut self) -> TmpPostgresResult<()> {
        self.run_all()
    }

    /// Unwind after `cause`, returning the error to surface to the caller.
    pub(crate) fn fail(self, cause: TmpPostgresError) -> TmpPostgresError {
        debug!(error = %cause, "acquisition failed; rolling back");
        match self.unwind() {
            Ok(()) => cause,
            Err(rollback) => TmpPostgresError::Rollback {
                cause: Box::new(cause),
                rollback: Box::new(rollback),
            },
        }
    }

    fn run_all(&mut self) -> TmpPostgresResult<()> {
        let mut first = None;
        while let Some((label, step)) = self.steps.pop() {
            debug!(label, "rolling back");
            if let Err(err) = step() {
                if first.is_none() {
                    first = Some(err);
                } else {
                    warn!(label, error = %err, "rollback step failed");
                }
            }
        }
        first.map_or(Ok(()), Err)
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.run_all() {
            warn!(error = %err, "rollback during drop failed");
        }
    }
}
