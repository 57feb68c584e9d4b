use serde::{Deserialize, Serialize};

use crate::domain::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ProcedureFailed,
}

/// Serializable form of a failed presentation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub code: ErrorCode,
    pub operation: Operation,
    pub message: String,
}

impl FailureReport {
    pub fn new(code: ErrorCode, operation: Operation, message: impl Into<String>) -> Self {
        Self {
            code,
            operation,
            message: message.into(),
        }
    }
}
