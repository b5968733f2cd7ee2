//! Rewrite-rule protocol over operator trees
//!
//! Rules are supplied by callers; this module only fixes how they are
//! applied.

use crate::algebra::Operator;

/// A local rewrite: return a replacement for `op`, or `op` unchanged
pub trait Rule {
    /// Rule name (used for logging and display)
    fn name(&self) -> &'static str;
    /// Rewrite one node
    fn fire(&self, op: Operator) -> Operator;
}

/// Apply each rule in order, top-down over the whole tree.
///
/// A rule fires on a node first, then descends into the children of
/// whatever the node was replaced with.
pub fn optimize_by_rules(plan: Operator, rules: &[&dyn Rule]) -> Operator {
    rules
        .iter()
        .fold(plan, |plan, rule| apply_top_down(plan, *rule))
}

fn apply_top_down(op: Operator, rule: &dyn Rule) -> Operator {
    let mut op = rule.fire(op);
    op.apply(|child| apply_top_down(child, rule));
    op
}

/// Ordered collection of rules
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule, in order, over `plan`
    pub fn run(&self, plan: Operator) -> Operator {
        self.rules.iter().fold(plan, |plan, rule| {
            log::debug!("Applying rule {}", rule.name());
            let before = log::log_enabled!(log::Level::Debug).then(|| plan.clone());
            let after = apply_top_down(plan, rule.as_ref());
            if before.is_some_and(|before| before != after) {
                log::debug!("Rule {} rewrote plan to {}", rule.name(), after);
            }
            after
        })
    }
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
