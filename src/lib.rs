//! Upshot: Composable Outcome Trees
//!
//! An outcome is a success/failure verdict plus an attribute bag and owned
//! child outcomes. Operations "capture" arbitrary values or the results of
//! nested units of work as children, and the parent's effective verdict folds
//! in every descendant. Transactions layer rollback/halt control flow over an
//! external transactional receiver without losing accumulated outcomes.

pub mod aggregate;
pub mod attrs;
pub mod error;
pub mod outcome;
pub mod transaction;

pub use attrs::Attrs;
pub use error::{CaptureError, Error};
pub use outcome::capture::IntoOutcome;
pub use outcome::{Outcome, Verdict};
pub use transaction::{Scope, Transaction, TransactionReceiver};

// Re-exported so `attrs!` call sites resolve values without a direct
// serde_json dependency.
pub use serde_json::{json, Value};
