//! Capture Protocol
//!
//! Conversion rules turning arbitrary values, or existing outcomes, into
//! [`Outcome`]s, and the capture operations that append the converted value
//! as a child and re-derive the parent's verdict.
//!
//! The coercion is two-case: an existing [`Outcome`] converts to itself with
//! the given attributes merged in (identity, not copy); any other value is
//! judged by the boolean/absent rule, where `false` and the absent value are
//! failures and everything else is success.

use crate::attrs::{Attrs, EXCEPTION_ATTR};
use crate::error::CaptureError;
use crate::outcome::Outcome;
use serde_json::Value;
use std::fmt::Display;
use tracing::debug;

/// Conversion into an [`Outcome`], merging in the given attributes.
///
/// This is the "convert to outcome" capability every capture operation goes
/// through. Implement it for domain types that know their own verdict.
pub trait IntoOutcome {
    fn into_outcome(self, attributes: Attrs) -> Outcome;
}

/// Identity conversion: merges `attributes` into the same outcome.
///
/// Merge semantics are last-write-wins: attributes given at capture time
/// overwrite previously-set same-named attributes. This is a deliberate
/// choice, documented rather than inherited.
impl IntoOutcome for Outcome {
    fn into_outcome(mut self, attributes: Attrs) -> Outcome {
        self.set(attributes);
        self
    }
}

impl IntoOutcome for bool {
    fn into_outcome(self, attributes: Attrs) -> Outcome {
        if self {
            Outcome::success(attributes)
        } else {
            Outcome::failure(attributes)
        }
    }
}

/// The absent value is a failure; a present value converts on its own terms.
impl<T: IntoOutcome> IntoOutcome for Option<T> {
    fn into_outcome(self, attributes: Attrs) -> Outcome {
        match self {
            Some(value) => value.into_outcome(attributes),
            None => Outcome::failure(attributes),
        }
    }
}

/// `Null` and `Bool(false)` fail; every other value succeeds.
impl IntoOutcome for Value {
    fn into_outcome(self, attributes: Attrs) -> Outcome {
        match self {
            Value::Null => Outcome::failure(attributes),
            Value::Bool(flag) => flag.into_outcome(attributes),
            _ => Outcome::success(attributes),
        }
    }
}

/// `Err` converts to a failure carrying the error as its `exception`
/// attribute, so a later bang capture surfaces it verbatim.
impl<T: IntoOutcome, E: Display> IntoOutcome for Result<T, E> {
    fn into_outcome(self, attributes: Attrs) -> Outcome {
        match self {
            Ok(value) => value.into_outcome(attributes),
            Err(error) => {
                let mut outcome = Outcome::failure(attributes);
                if outcome.get(EXCEPTION_ATTR).is_none() {
                    outcome.set(crate::attrs! {
                        EXCEPTION_ATTR => error.to_string(),
                    });
                }
                outcome
            }
        }
    }
}

// Any other plain value is a success; the value itself is not stored.
macro_rules! impl_into_outcome_success {
    ($($ty:ty),+ $(,)?) => {
        $(impl IntoOutcome for $ty {
            fn into_outcome(self, attributes: Attrs) -> Outcome {
                Outcome::success(attributes)
            }
        })+
    };
}

impl_into_outcome_success!((), &str, String, i64, u64, f64);

impl Outcome {
    /// Coerce `value` into an outcome via the capture protocol.
    pub fn for_value<V: IntoOutcome>(value: V, attributes: Attrs) -> Outcome {
        value.into_outcome(attributes)
    }

    /// Coerce `value`, append it as a child, and re-derive this node's
    /// verdict. Returns the appended child.
    pub fn capture_for<V: IntoOutcome>(&mut self, value: V, attributes: Attrs) -> &Outcome {
        let child = Outcome::for_value(value, attributes);
        debug!(child_verdict = ?child.verdict(), "captured child outcome");
        self.append(child)
    }

    /// Like [`Self::capture_for`], but errors when the captured child failed.
    /// The child is appended before the error is raised.
    pub fn try_capture_for<V: IntoOutcome>(
        &mut self,
        value: V,
        attributes: Attrs,
    ) -> Result<&Outcome, CaptureError> {
        let child = self.capture_for(value, attributes);
        if child.is_failure() {
            return Err(child.capture_exception());
        }
        Ok(child)
    }

    /// Capture every value in `values`, each with a copy of `attributes`.
    /// Returns the appended children, in input order.
    pub fn capture_for_all<I>(&mut self, values: I, attributes: Attrs) -> &[Outcome]
    where
        I: IntoIterator,
        I::Item: IntoOutcome,
    {
        let start = self.children().len();
        for value in values {
            self.capture_for(value, attributes.clone());
        }
        &self.children()[start..]
    }

    /// Like [`Self::capture_for_all`], but errors with the first failed
    /// child. Every value is appended before failures are examined.
    pub fn try_capture_for_all<I>(
        &mut self,
        values: I,
        attributes: Attrs,
    ) -> Result<&[Outcome], CaptureError>
    where
        I: IntoIterator,
        I::Item: IntoOutcome,
    {
        let start = self.children().len();
        self.capture_for_all(values, attributes);
        let captured = &self.children()[start..];
        if let Some(failed) = captured.iter().find(|child| child.is_failure()) {
            return Err(failed.capture_exception());
        }
        Ok(captured)
    }

    /// Run `work` and capture its return value.
    pub fn capture<F, V>(&mut self, attributes: Attrs, work: F) -> &Outcome
    where
        F: FnOnce() -> V,
        V: IntoOutcome,
    {
        self.capture_for(work(), attributes)
    }

    /// Run `work` and capture its return value, erroring when the captured
    /// child failed.
    pub fn try_capture<F, V>(&mut self, attributes: Attrs, work: F) -> Result<&Outcome, CaptureError>
    where
        F: FnOnce() -> V,
        V: IntoOutcome,
    {
        self.try_capture_for(work(), attributes)
    }

    /// Run `work` and capture every value it returns.
    pub fn capture_all<F, I>(&mut self, attributes: Attrs, work: F) -> &[Outcome]
    where
        F: FnOnce() -> I,
        I: IntoIterator,
        I::Item: IntoOutcome,
    {
        self.capture_for_all(work(), attributes)
    }

    /// Run `work` and capture every value it returns, erroring with the
    /// first failed child.
    pub fn try_capture_all<F, I>(
        &mut self,
        attributes: Attrs,
        work: F,
    ) -> Result<&[Outcome], CaptureError>
    where
        F: FnOnce() -> I,
        I: IntoIterator,
        I::Item: IntoOutcome,
    {
        self.try_capture_for_all(work(), attributes)
    }
}
