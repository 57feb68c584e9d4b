//! External "became hidden" event sources.
//!
//! Any `Stream<Item = ()>` can act as a source; only its first item matters.
//! [`hidden_channel`] is the ready-made variant for callers that observe
//! disappearance through callbacks.

use std::sync::Weak;

use futures::{Stream, StreamExt};
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::trace;

use crate::{error::SetupError, state::PresentationState};

pub type HiddenEvents = UnboundedReceiverStream<()>;

#[derive(Debug, Clone)]
pub struct HiddenTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl HiddenTrigger {
    /// Reports that the unit became hidden. Returns false once nothing listens anymore.
    pub fn fire(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    /// Resolves when the listening side has been released.
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

pub fn hidden_channel() -> (HiddenTrigger, HiddenEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (HiddenTrigger { tx }, UnboundedReceiverStream::new(rx))
}

/// Background subscription to a hidden-event source. Aborted on drop.
pub(crate) struct HiddenWatch {
    handle: JoinHandle<()>,
}

impl HiddenWatch {
    /// Spawns onto the current runtime; fails outside of one.
    pub(crate) fn spawn<S>(state: Weak<PresentationState>, events: S) -> Result<Self, SetupError>
    where
        S: Stream<Item = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(SetupError::NoRuntime)?;
        let handle = runtime.spawn(async move {
            let mut events = Box::pin(events);
            if events.next().await.is_none() {
                trace!("hidden-event source ended without firing");
                return;
            }
            match state.upgrade() {
                Some(state) => {
                    state.hide();
                }
                None => trace!("hidden event arrived after presentation was dropped"),
            }
        });
        Ok(Self { handle })
    }
}

impl Drop for HiddenWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
