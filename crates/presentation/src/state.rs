//! Shared lifecycle state: the single lock every transition goes through,
//! plus the observers derived from it.

use parking_lot::Mutex;
use shared::domain::{FinishCause, Operation, Phase, PresentationId};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, trace};

use crate::{
    hidden::HiddenWatch,
    lifecycle::{Lifecycle, Settlement},
};

pub(crate) struct PresentationState {
    id: PresentationId,
    inner: Mutex<Inner>,
    can_present: watch::Sender<bool>,
    can_dismiss: watch::Sender<bool>,
}

struct Inner {
    lifecycle: Lifecycle,
    /// Dropped right after the terminal event is sent so subscribers see exactly one value.
    finished_tx: Option<broadcast::Sender<FinishCause>>,
    hidden_watch: Option<HiddenWatch>,
}

impl PresentationState {
    pub(crate) fn new(id: PresentationId) -> Self {
        let lifecycle = Lifecycle::new();
        let (can_present, _) = watch::channel(lifecycle.can_present());
        let (can_dismiss, _) = watch::channel(lifecycle.can_dismiss());
        let (finished_tx, _) = broadcast::channel(1);

        Self {
            id,
            inner: Mutex::new(Inner {
                lifecycle,
                finished_tx: Some(finished_tx),
                hidden_watch: None,
            }),
            can_present,
            can_dismiss,
        }
    }

    pub(crate) fn id(&self) -> PresentationId {
        self.id
    }

    pub(crate) fn phase(&self) -> Phase {
        self.inner.lock().lifecycle.phase()
    }

    pub(crate) fn finish_cause(&self) -> Option<FinishCause> {
        self.inner.lock().lifecycle.finish_cause()
    }

    pub(crate) fn enabled(&self, operation: Operation) -> watch::Receiver<bool> {
        self.enablement(operation).subscribe()
    }

    pub(crate) fn is_enabled(&self, operation: Operation) -> bool {
        *self.enablement(operation).borrow()
    }

    pub(crate) fn attach_hidden_watch(&self, watch: HiddenWatch) {
        let mut inner = self.inner.lock();
        // The source may already have fired before the handle got here.
        if !inner.lifecycle.phase().is_finished() {
            inner.hidden_watch = Some(watch);
        }
    }

    pub(crate) fn subscribe_finished(&self) -> broadcast::Receiver<FinishCause> {
        match &self.inner.lock().finished_tx {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    /// Starts `operation` if enabled. `executing` is updated under the same
    /// lock and before enablement is published.
    pub(crate) fn try_begin(&self, operation: Operation, executing: &watch::Sender<bool>) -> bool {
        let mut inner = self.inner.lock();
        if !inner.lifecycle.begin(operation) {
            return false;
        }
        executing.send_replace(true);
        self.publish(&inner.lifecycle);
        debug!(presentation = %self.id, %operation, "operation started");
        true
    }

    pub(crate) fn settle(
        &self,
        operation: Operation,
        settlement: Settlement,
        executing: &watch::Sender<bool>,
    ) {
        let mut inner = self.inner.lock();
        let finished = inner.lifecycle.settle(operation, settlement);
        executing.send_replace(false);
        self.publish(&inner.lifecycle);
        debug!(
            presentation = %self.id,
            %operation,
            ?settlement,
            phase = ?inner.lifecycle.phase(),
            "operation settled"
        );
        if let Some(cause) = finished {
            self.fire_finished(&mut inner, cause);
        }
    }

    pub(crate) fn hide(&self) -> bool {
        let mut inner = self.inner.lock();
        if !inner.lifecycle.hide() {
            trace!(presentation = %self.id, "hidden event after finish ignored");
            return false;
        }
        self.publish(&inner.lifecycle);
        self.fire_finished(&mut inner, FinishCause::Hidden);
        true
    }

    fn fire_finished(&self, inner: &mut Inner, cause: FinishCause) {
        if let Some(tx) = inner.finished_tx.take() {
            let _ = tx.send(cause);
        }
        inner.hidden_watch = None;
        info!(presentation = %self.id, ?cause, "presentation finished");
    }

    fn publish(&self, lifecycle: &Lifecycle) {
        publish_distinct(&self.can_present, lifecycle.can_present());
        publish_distinct(&self.can_dismiss, lifecycle.can_dismiss());
    }

    fn enablement(&self, operation: Operation) -> &watch::Sender<bool> {
        match operation {
            Operation::Present => &self.can_present,
            Operation::Dismiss => &self.can_dismiss,
        }
    }
}

fn publish_distinct(sender: &watch::Sender<bool>, value: bool) {
    sender.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        *current = value;
        true
    });
}
