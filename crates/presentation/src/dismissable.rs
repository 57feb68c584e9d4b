use std::{
    future::{self, Future},
    sync::{Arc, Weak},
};

use futures::{stream::BoxStream, Stream, StreamExt};
use shared::domain::{FinishCause, Operation, Phase, PresentationId};
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use crate::{
    action::{CompletableAction, FnProcedure, Procedure},
    error::SetupError,
    hidden::HiddenWatch,
    state::PresentationState,
};

/// Yields the terminal [`FinishCause`] at most once, then ends.
pub type FinishedEvents = BoxStream<'static, FinishCause>;

/// Something that can be shown.
///
/// Kept to the bare capability so other presentation styles can satisfy it
/// without sharing an implementation.
pub trait Presentation<U: ?Sized + Send + Sync + 'static>: Send + Sync {
    /// The presented unit, if it is still alive.
    fn unit(&self) -> Option<Arc<U>>;

    fn present(&self) -> &CompletableAction<U>;
}

/// A dismissable presentation (navigation push, modal sheet, ...).
///
/// Presentations are single use: `present` is enabled only until it first
/// starts, `dismiss` only after `present` completed, and both stay disabled
/// once the presentation finished. Finishing happens exactly once, on
/// whichever comes first of a successful dismiss or the hidden event.
///
/// The unit is held weakly. If it is gone when an action runs, the action
/// completes without calling its procedure.
///
/// Construction spawns the hidden-event subscription onto the current Tokio
/// runtime and fails with [`SetupError::NoRuntime`] outside of one. Dropping
/// the presentation releases that subscription.
pub struct DismissablePresentation<U: ?Sized + Send + Sync + 'static> {
    unit: Weak<U>,
    present: CompletableAction<U>,
    dismiss: CompletableAction<U>,
    state: Arc<PresentationState>,
}

impl<U: ?Sized + Send + Sync + 'static> DismissablePresentation<U> {
    pub fn new<P, PFut, D, DFut, H>(
        unit: &Arc<U>,
        present: P,
        dismiss: D,
        hidden: H,
    ) -> Result<Self, SetupError>
    where
        P: Fn(Arc<U>, bool) -> PFut + Send + Sync + 'static,
        PFut: Future<Output = anyhow::Result<()>> + Send + 'static,
        D: Fn(Arc<U>, bool) -> DFut + Send + Sync + 'static,
        DFut: Future<Output = anyhow::Result<()>> + Send + 'static,
        H: Stream<Item = ()> + Send + 'static,
    {
        Self::with_procedures(
            unit,
            Arc::new(FnProcedure::new(present)),
            Arc::new(FnProcedure::new(dismiss)),
            hidden,
        )
    }

    pub fn with_procedures<H>(
        unit: &Arc<U>,
        present: Arc<dyn Procedure<U>>,
        dismiss: Arc<dyn Procedure<U>>,
        hidden: H,
    ) -> Result<Self, SetupError>
    where
        H: Stream<Item = ()> + Send + 'static,
    {
        let id = PresentationId::new();
        let state = Arc::new(PresentationState::new(id));
        state.attach_hidden_watch(HiddenWatch::spawn(Arc::downgrade(&state), hidden)?);

        let unit = Arc::downgrade(unit);
        debug!(presentation = %id, "presentation created");

        let present =
            CompletableAction::new(Operation::Present, unit.clone(), present, state.clone());
        let dismiss =
            CompletableAction::new(Operation::Dismiss, unit.clone(), dismiss, state.clone());
        Ok(Self {
            unit,
            present,
            dismiss,
            state,
        })
    }

    pub fn id(&self) -> PresentationId {
        self.state.id()
    }

    pub fn present(&self) -> &CompletableAction<U> {
        &self.present
    }

    pub fn dismiss(&self) -> &CompletableAction<U> {
        &self.dismiss
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn can_present(&self) -> bool {
        self.present.is_enabled()
    }

    pub fn can_dismiss(&self) -> bool {
        self.dismiss.is_enabled()
    }

    pub fn is_finished(&self) -> bool {
        self.finish_cause().is_some()
    }

    pub fn finish_cause(&self) -> Option<FinishCause> {
        self.state.finish_cause()
    }

    /// Subscribes to the terminal event.
    ///
    /// Every subscription taken before the presentation finishes receives the
    /// cause once. Subscriptions taken afterwards, or outliving a presentation
    /// dropped before finishing, end without an item.
    pub fn finished(&self) -> FinishedEvents {
        BroadcastStream::new(self.state.subscribe_finished())
            .filter_map(|event| future::ready(event.ok()))
            .take(1)
            .boxed()
    }

    /// Waits for the terminal event. `None` if it already fired before the call.
    pub async fn wait_finished(&self) -> Option<FinishCause> {
        self.finished().next().await
    }
}

impl<U: ?Sized + Send + Sync + 'static> Presentation<U> for DismissablePresentation<U> {
    fn unit(&self) -> Option<Arc<U>> {
        self.unit.upgrade()
    }

    fn present(&self) -> &CompletableAction<U> {
        &self.present
    }
}
