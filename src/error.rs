//! Error types for outcome capture and transaction control flow.
//!
//! Outcome *failure* is a value-level verdict and never surfaces as an error.
//! Errors here are the exceptional paths: a bang capture observing a failed
//! child, the rollback/halt control signals, and failures surfaced by the
//! transactional receiver itself.

use crate::attrs::BACKTRACE_ATTR;
use serde_json::Value;
use thiserror::Error;

/// Error returned by bang-capture operations (`try_capture*`) when the
/// captured child outcome failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CaptureError {
    /// Human-readable message, taken from the child's `exception` or
    /// `description` attribute.
    pub message: String,

    /// Origin trace carried by the child's `backtrace` attribute, if any.
    pub backtrace: Vec<String>,
}

impl CaptureError {
    /// Build from an `exception` attribute value.
    ///
    /// A string value is used verbatim as the message. An object value may
    /// carry `message` and `backtrace` fields. Anything else is rendered as
    /// JSON.
    pub(crate) fn from_exception_value(value: &Value) -> Self {
        match value {
            Value::String(message) => CaptureError {
                message: message.clone(),
                backtrace: Vec::new(),
            },
            Value::Object(fields) => CaptureError {
                message: fields
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                backtrace: fields
                    .get(BACKTRACE_ATTR)
                    .map(backtrace_lines)
                    .unwrap_or_default(),
            },
            other => CaptureError {
                message: other.to_string(),
                backtrace: Vec::new(),
            },
        }
    }

    /// Render this error as an `exception` attribute value, so a failure
    /// outcome built from an error reads back through
    /// [`Self::from_exception_value`].
    pub fn to_exception_value(&self) -> Value {
        let mut fields = crate::Attrs::new();
        fields.insert("message".to_string(), Value::String(self.message.clone()));
        fields.insert(
            BACKTRACE_ATTR.to_string(),
            Value::Array(
                self.backtrace
                    .iter()
                    .map(|line| Value::String(line.clone()))
                    .collect(),
            ),
        );
        Value::Object(fields)
    }
}

/// Read a `backtrace` attribute value as trace lines.
pub(crate) fn backtrace_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(lines) => lines
            .iter()
            .map(|line| match line {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(line) => vec![line.clone()],
        _ => Vec::new(),
    }
}

/// Errors and control signals flowing through transaction blocks.
///
/// `Rollback` and `Halt` are internally distinguished signals intercepted at
/// exactly one place, the boundary of [`Transaction::call`]; they are produced
/// by [`Scope::rollback`] and [`Scope::halt`] and should only be propagated
/// with `?`, never constructed to report an ordinary failure.
///
/// [`Transaction::call`]: crate::transaction::Transaction::call
/// [`Scope::rollback`]: crate::transaction::Scope::rollback
/// [`Scope::halt`]: crate::transaction::Scope::halt
#[derive(Debug, Error)]
pub enum Error {
    /// Rollback signal: the receiver's unit of work aborts, the transaction
    /// returns normally to its caller.
    #[error("transaction rolled back")]
    Rollback,

    /// Halt signal: remaining block statements are skipped, the receiver's
    /// unit of work commits normally.
    #[error("transaction halted")]
    Halt,

    /// A bang capture observed a failed child outcome.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Failure surfaced by the transactional receiver itself.
    #[error("transaction receiver error: {0}")]
    Receiver(String),
}
