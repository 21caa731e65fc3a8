//! Outcome Trees
//!
//! An [`Outcome`] is one node of a result tree: its own verdict fixed at
//! construction, an ordered attribute bag, and an append-only sequence of
//! exclusively-owned child outcomes. The *effective* verdict folds in every
//! descendant: a node succeeds only when its own verdict is success and every
//! child succeeds, recursively.

pub mod capture;
pub mod query;

use crate::attrs::{
    self, Attrs, BACKTRACE_ATTR, DESCRIPTION_ATTR, EXCEPTION_ATTR, HALTED_ATTR,
    RESERVED_PREFIX, ROLLED_BACK_ATTR,
};
use crate::error::{backtrace_lines, CaptureError};
use serde_json::Value;
use std::cell::Cell;

/// A node's own success/failure flag, fixed at construction.
///
/// Distinct from *effective* success ([`Outcome::is_success`]), which also
/// requires every descendant to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure,
}

/// A success/failure verdict plus attributes and owned child outcomes.
#[derive(Debug, Clone)]
pub struct Outcome {
    verdict: Verdict,
    attributes: Attrs,
    children: Vec<Outcome>,
    // Memoized effective success; None means dirty. Invalidated exactly on
    // child append. Children are only reachable by shared reference once
    // appended, so no other mutation path can stale this.
    effective: Cell<Option<bool>>,
}

impl Outcome {
    fn new(verdict: Verdict, attributes: Attrs) -> Self {
        Outcome {
            verdict,
            attributes,
            children: Vec::new(),
            effective: Cell::new(None),
        }
    }

    /// Build an outcome whose own verdict is success.
    pub fn success(attributes: Attrs) -> Self {
        Outcome::new(Verdict::Success, attributes)
    }

    /// Build an outcome whose own verdict is failure.
    pub fn failure(attributes: Attrs) -> Self {
        Outcome::new(Verdict::Failure, attributes)
    }

    /// Build a success outcome, yield it to `block`, return it.
    pub fn tap<F>(attributes: Attrs, block: F) -> Self
    where
        F: FnOnce(&mut Outcome),
    {
        let mut outcome = Outcome::success(attributes);
        block(&mut outcome);
        outcome
    }

    /// The node's own verdict, ignoring children.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Effective success: own verdict AND every child's effective success.
    pub fn is_success(&self) -> bool {
        if let Some(memoized) = self.effective.get() {
            return memoized;
        }
        let effective =
            self.verdict == Verdict::Success && self.children.iter().all(Outcome::is_success);
        self.effective.set(Some(effective));
        effective
    }

    /// Exact negation of [`Self::is_success`].
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Merge-assign attributes, last write wins. Returns `self` for chaining.
    pub fn set(&mut self, attributes: Attrs) -> &mut Self {
        attrs::merge(&mut self.attributes, attributes);
        self
    }

    /// Read an attribute by name. Reserved-prefix names are readable here
    /// even though they are excluded from enumeration.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The attribute bag, excluding reserved-prefix bookkeeping names.
    pub fn attributes(&self) -> Attrs {
        self.attributes
            .iter()
            .filter(|(name, _)| !name.starts_with(RESERVED_PREFIX))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Attribute names, excluding reserved-prefix bookkeeping names.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes
            .keys()
            .map(String::as_str)
            .filter(|name| !name.starts_with(RESERVED_PREFIX))
            .collect()
    }

    /// The `description` attribute, when set to a string.
    pub fn description(&self) -> Option<&str> {
        self.get(DESCRIPTION_ATTR).and_then(Value::as_str)
    }

    /// The `backtrace` attribute as trace lines, empty when unset.
    pub fn backtrace(&self) -> Vec<String> {
        self.get(BACKTRACE_ATTR)
            .map(backtrace_lines)
            .unwrap_or_default()
    }

    /// The raw `exception` attribute, if any.
    pub fn exception(&self) -> Option<&Value> {
        self.get(EXCEPTION_ATTR)
    }

    /// The error a bang capture raises for this outcome.
    ///
    /// Prefers an `exception` attribute verbatim; otherwise synthesizes a
    /// generic error from the `description` and `backtrace` attributes.
    pub fn capture_exception(&self) -> CaptureError {
        if let Some(value) = self.exception() {
            return CaptureError::from_exception_value(value);
        }
        CaptureError {
            message: self
                .description()
                .unwrap_or("captured outcome failed")
                .to_string(),
            backtrace: self.backtrace(),
        }
    }

    /// Direct children, in append order.
    pub fn children(&self) -> &[Outcome] {
        &self.children
    }

    /// Whether a transaction owning this outcome was rolled back.
    pub fn is_rolled_back(&self) -> bool {
        matches!(self.get(ROLLED_BACK_ATTR), Some(Value::Bool(true)))
    }

    /// Whether a transaction owning this outcome was halted.
    pub fn is_halted(&self) -> bool {
        matches!(self.get(HALTED_ATTR), Some(Value::Bool(true)))
    }

    /// Append a child and invalidate the memoized effective verdict, as one
    /// unit. All capture operations land here.
    pub(crate) fn append(&mut self, child: Outcome) -> &Outcome {
        let index = self.children.len();
        self.children.push(child);
        self.effective.set(None);
        &self.children[index]
    }
}

impl std::fmt::Display for Outcome {
    /// One-line summary: effective verdict, description, child count.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            if self.is_success() { "SUCCESS" } else { "FAILURE" }
        )?;
        if let Some(description) = self.description() {
            write!(f, " {description:?}")?;
        }
        write!(f, " ({} children)", self.children.len())
    }
}
