//! Gated, single-shot asynchronous actions over a weakly held unit.

use std::{
    future::Future,
    sync::{Arc, Weak},
};

use async_trait::async_trait;
use shared::domain::{Operation, Outcome};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{error::PresentationError, lifecycle::Settlement, state::PresentationState};

/// Caller-supplied work that actually shows or hides a unit.
#[async_trait]
pub trait Procedure<U: ?Sized + Send + Sync + 'static>: Send + Sync {
    async fn perform(&self, unit: Arc<U>, animated: bool) -> anyhow::Result<()>;
}

/// Adapts a closure returning a future into a [`Procedure`].
pub struct FnProcedure<F>(F);

impl<F> FnProcedure<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<U, F, Fut> Procedure<U> for FnProcedure<F>
where
    U: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<U>, bool) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn perform(&self, unit: Arc<U>, animated: bool) -> anyhow::Result<()> {
        (self.0)(unit, animated).await
    }
}

/// An action whose availability is driven by the owning presentation's
/// lifecycle.
///
/// Executing while disabled is not an error: it resolves immediately with
/// [`Outcome::NotEnabled`] and changes nothing.
pub struct CompletableAction<U: ?Sized + Send + Sync + 'static> {
    operation: Operation,
    unit: Weak<U>,
    procedure: Arc<dyn Procedure<U>>,
    state: Arc<PresentationState>,
    executing: watch::Sender<bool>,
}

impl<U: ?Sized + Send + Sync + 'static> CompletableAction<U> {
    pub(crate) fn new(
        operation: Operation,
        unit: Weak<U>,
        procedure: Arc<dyn Procedure<U>>,
        state: Arc<PresentationState>,
    ) -> Self {
        let (executing, _) = watch::channel(false);
        Self {
            operation,
            unit,
            procedure,
            state,
            executing,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Enablement as a stream of distinct values.
    pub fn enabled(&self) -> watch::Receiver<bool> {
        self.state.enabled(self.operation)
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled(self.operation)
    }

    pub fn executing(&self) -> watch::Receiver<bool> {
        self.executing.subscribe()
    }

    pub fn is_executing(&self) -> bool {
        *self.executing.borrow()
    }

    pub async fn execute(&self, animated: bool) -> Result<Outcome, PresentationError> {
        let presentation = self.state.id();
        let operation = self.operation;

        let Some(execution) = Execution::begin(operation, &self.state, &self.executing) else {
            debug!(%presentation, %operation, "action not enabled; ignoring");
            return Ok(Outcome::NotEnabled);
        };

        let Some(unit) = self.unit.upgrade() else {
            debug!(%presentation, %operation, "unit no longer available; completing as no-op");
            execution.settle(Settlement::Succeeded);
            return Ok(Outcome::UnitUnavailable);
        };

        match self.procedure.perform(unit, animated).await {
            Ok(()) => {
                execution.settle(Settlement::Succeeded);
                Ok(Outcome::Completed)
            }
            Err(source) => {
                warn!(%presentation, %operation, error = %format!("{source:#}"), "procedure failed");
                execution.settle(Settlement::Failed);
                Err(PresentationError::ProcedureFailed { operation, source })
            }
        }
    }
}

/// A started operation; settles it as abandoned if dropped unsettled.
struct Execution<'a> {
    operation: Operation,
    state: &'a PresentationState,
    executing: &'a watch::Sender<bool>,
    settled: bool,
}

impl<'a> Execution<'a> {
    fn begin(
        operation: Operation,
        state: &'a PresentationState,
        executing: &'a watch::Sender<bool>,
    ) -> Option<Self> {
        state.try_begin(operation, executing).then_some(Self {
            operation,
            state,
            executing,
            settled: false,
        })
    }

    fn settle(mut self, settlement: Settlement) {
        self.state.settle(self.operation, settlement, self.executing);
        self.settled = true;
    }
}

impl Drop for Execution<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(
                presentation = %self.state.id(),
                operation = %self.operation,
                "execution dropped before the procedure resolved"
            );
            self.state.settle(self.operation, Settlement::Abandoned, self.executing);
        }
    }
}

#[cfg(test)]
#[path = "tests/action_tests.rs"]
mod tests;
