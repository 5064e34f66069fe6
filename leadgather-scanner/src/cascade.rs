//! Ordered fallback rules.
//!
//! Both block location and every field lookup follow the same shape: a list of
//! rules from most to least specific, evaluated in order, stopping at the first
//! one that produces something. [`Cascade`] holds such a list; the caller decides
//! what "applying" a rule means.

use tracing::trace;

pub struct Cascade<R> {
    label: &'static str,
    rules: Vec<R>,
}

impl<R> Cascade<R> {
    pub fn new(label: &'static str, rules: Vec<R>) -> Self {
        Self { label, rules }
    }

    pub fn rules(&self) -> &[R] {
        &self.rules
    }

    /// Apply rules in order and return the first outcome together with the rule
    /// that produced it. Later rules are never evaluated once one succeeds.
    pub fn first<O>(&self, mut apply: impl FnMut(&R) -> Option<O>) -> Option<(&R, O)> {
        for (position, rule) in self.rules.iter().enumerate() {
            if let Some(outcome) = apply(rule) {
                trace!("{}: rule #{} matched", self.label, position);
                return Some((rule, outcome));
            }
        }
        None
    }
}
