//! Outcome Tree Queries
//!
//! Partition accessors over direct children and over the flattened
//! self-plus-descendants view, plus the aggregation accessors that read one
//! attribute off every member of a view and merge the values through
//! [`crate::aggregate`].

use crate::aggregate;
use crate::outcome::Outcome;
use serde_json::Value;

impl Outcome {
    /// Direct children whose effective verdict is success.
    pub fn success_children(&self) -> Vec<&Outcome> {
        self.children()
            .iter()
            .filter(|child| child.is_success())
            .collect()
    }

    /// Direct children whose effective verdict is failure.
    pub fn failure_children(&self) -> Vec<&Outcome> {
        self.children()
            .iter()
            .filter(|child| child.is_failure())
            .collect()
    }

    /// Self plus every descendant, depth-first in append order.
    pub fn all_outcomes(&self) -> Vec<&Outcome> {
        let mut outcomes = vec![self];
        for child in self.children() {
            outcomes.extend(child.all_outcomes());
        }
        outcomes
    }

    /// The members of [`Self::all_outcomes`] whose effective verdict is
    /// success. Self appears iff its own effective success holds, independent
    /// of where individual descendants land.
    pub fn all_success_outcomes(&self) -> Vec<&Outcome> {
        let mut outcomes = Vec::new();
        if self.is_success() {
            outcomes.push(self);
        }
        for child in self.children() {
            outcomes.extend(child.all_success_outcomes());
        }
        outcomes
    }

    /// The members of [`Self::all_outcomes`] whose effective verdict is
    /// failure.
    pub fn all_failure_outcomes(&self) -> Vec<&Outcome> {
        let mut outcomes = Vec::new();
        if self.is_failure() {
            outcomes.push(self);
        }
        for child in self.children() {
            outcomes.extend(child.all_failure_outcomes());
        }
        outcomes
    }

    /// Aggregate attribute `name` across all direct children.
    pub fn get_for_children(&self, name: &str) -> Value {
        aggregate_attribute(self.children().iter(), name)
    }

    /// Aggregate attribute `name` across successful direct children.
    pub fn get_for_success_children(&self, name: &str) -> Value {
        aggregate_attribute(self.success_children().into_iter(), name)
    }

    /// Aggregate attribute `name` across failed direct children.
    pub fn get_for_failure_children(&self, name: &str) -> Value {
        aggregate_attribute(self.failure_children().into_iter(), name)
    }

    /// Aggregate attribute `name` across self and every descendant.
    pub fn get_for_all_outcomes(&self, name: &str) -> Value {
        aggregate_attribute(self.all_outcomes().into_iter(), name)
    }

    /// Aggregate attribute `name` across the successful members of the
    /// flattened view.
    pub fn get_for_all_success_outcomes(&self, name: &str) -> Value {
        aggregate_attribute(self.all_success_outcomes().into_iter(), name)
    }

    /// Aggregate attribute `name` across the failed members of the flattened
    /// view.
    pub fn get_for_all_failure_outcomes(&self, name: &str) -> Value {
        aggregate_attribute(self.all_failure_outcomes().into_iter(), name)
    }
}

/// Read `name` off every outcome (missing contributes explicit null) and
/// merge the sequence.
fn aggregate_attribute<'a, I>(outcomes: I, name: &str) -> Value
where
    I: Iterator<Item = &'a Outcome>,
{
    aggregate::call(
        outcomes.map(|outcome| outcome.get(name).cloned().unwrap_or(Value::Null)),
    )
}
