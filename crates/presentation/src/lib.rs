//! Single-use presentation lifecycle coordination.
//!
//! A [`DismissablePresentation`] wraps a presentable unit together with
//! caller-supplied present/dismiss procedures and an external hidden-event
//! source. It gates both operations through one lifecycle state machine and
//! emits a single terminal event, whichever of dismissal or disappearance
//! happens first.

pub mod action;
pub mod dismissable;
pub mod error;
pub mod hidden;
pub mod lifecycle;
mod state;

pub use action::{CompletableAction, FnProcedure, Procedure};
pub use dismissable::{DismissablePresentation, FinishedEvents, Presentation};
pub use error::{PresentationError, SetupError};
pub use hidden::{hidden_channel, HiddenEvents, HiddenTrigger};
pub use lifecycle::{Lifecycle, Settlement};
pub use shared::domain::{FinishCause, Operation, Outcome, Phase, PresentationId};
