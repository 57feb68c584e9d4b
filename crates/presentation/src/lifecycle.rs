//! Pure presentation lifecycle state machine.
//!
//! ```text
//! Idle --begin(present)--> Presenting --ok--> Presented --begin(dismiss)--> Dismissing --ok--> Finished(Dismissed)
//!                              |                                                 |
//!                              +--err--> Faulted(Present)                        +--err--> Faulted(Dismiss)
//!
//! any phase except Finished --hide--> Finished(Hidden)
//! ```
//!
//! `Finished` has no outgoing transitions. `can_present` holds only in `Idle`
//! and `can_dismiss` only in `Presented`, so a failed dismiss disables dismiss
//! for good.

use shared::domain::{FinishCause, Operation, Phase};

/// How an in-flight operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Succeeded,
    Failed,
    /// The execution was dropped before the procedure resolved.
    Abandoned,
}

impl Settlement {
    fn succeeded(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    phase: Phase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn can_present(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn can_dismiss(&self) -> bool {
        self.phase == Phase::Presented
    }

    pub fn can(&self, operation: Operation) -> bool {
        match operation {
            Operation::Present => self.can_present(),
            Operation::Dismiss => self.can_dismiss(),
        }
    }

    pub fn finish_cause(&self) -> Option<FinishCause> {
        match self.phase {
            Phase::Finished(cause) => Some(cause),
            _ => None,
        }
    }

    /// Starts `operation` if it is currently enabled.
    pub fn begin(&mut self, operation: Operation) -> bool {
        let next = match (operation, self.phase) {
            (Operation::Present, Phase::Idle) => Phase::Presenting,
            (Operation::Dismiss, Phase::Presented) => Phase::Dismissing,
            _ => return false,
        };
        self.phase = next;
        true
    }

    /// Records the end of an operation started with [`Lifecycle::begin`].
    ///
    /// Returns the finish cause when this settlement ended the lifecycle.
    pub fn settle(&mut self, operation: Operation, settlement: Settlement) -> Option<FinishCause> {
        match (operation, self.phase) {
            (Operation::Present, Phase::Presenting) => {
                self.phase = if settlement.succeeded() {
                    Phase::Presented
                } else {
                    Phase::Faulted(Operation::Present)
                };
                None
            }
            (Operation::Dismiss, Phase::Dismissing) => {
                if settlement.succeeded() {
                    self.phase = Phase::Finished(FinishCause::Dismissed);
                    Some(FinishCause::Dismissed)
                } else {
                    self.phase = Phase::Faulted(Operation::Dismiss);
                    None
                }
            }
            // Already finished by the hidden event while the operation ran.
            _ => None,
        }
    }

    /// Records the external hidden event. Returns false if already finished.
    pub fn hide(&mut self) -> bool {
        if self.phase.is_finished() {
            return false;
        }
        self.phase = Phase::Finished(FinishCause::Hidden);
        true
    }
}

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod tests;
