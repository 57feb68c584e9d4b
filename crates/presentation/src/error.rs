use shared::{
    domain::Operation,
    error::{ErrorCode, FailureReport},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("{operation} procedure failed: {source}")]
    ProcedureFailed {
        operation: Operation,
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("presentation must be created inside a Tokio runtime")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}

impl PresentationError {
    pub fn operation(&self) -> Operation {
        match self {
            Self::ProcedureFailed { operation, .. } => *operation,
        }
    }
}

impl From<&PresentationError> for FailureReport {
    fn from(value: &PresentationError) -> Self {
        match value {
            PresentationError::ProcedureFailed { operation, source } => {
                FailureReport::new(ErrorCode::ProcedureFailed, *operation, format!("{source:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn failure_report_keeps_operation_and_cause_chain() {
        let err = PresentationError::ProcedureFailed {
            operation: Operation::Dismiss,
            source: anyhow!("navigation stack empty").context("pop failed"),
        };

        assert_eq!(err.operation(), Operation::Dismiss);
        assert_eq!(err.to_string(), "dismiss procedure failed: pop failed");

        let report = FailureReport::from(&err);
        assert_eq!(report.code, ErrorCode::ProcedureFailed);
        assert_eq!(report.operation, Operation::Dismiss);
        assert_eq!(report.message, "pop failed: navigation stack empty");
    }
}
