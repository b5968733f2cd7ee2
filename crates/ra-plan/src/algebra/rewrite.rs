//! Tree rewrites shared by rules and the CFG optimizer

use super::operator::{OpKind, Operator};
use super::recursion::RecursionSlot;
use crate::error::{PlanError, PlanResult};
use ra_core::{Expression, Scheme};
use std::collections::{BTreeSet, HashMap};

impl Operator {
    /// Check that `col0` and `col1` address one column from each input of
    /// a two-input join.
    pub fn check_equijoin_columns(&self, col0: usize, col1: usize) -> PlanResult<()> {
        let (left, right) = match self.kind() {
            OpKind::CrossProduct { left, right } | OpKind::Join { left, right, .. } => {
                (left, right)
            }
            _ => {
                return Err(PlanError::Unsupported {
                    operation: "add_equijoin_condition",
                    op: self.name().to_string(),
                })
            }
        };
        let left_len = left.scheme()?.len();
        let total = left_len + right.scheme()?.len();
        let in_range = col0 < total && col1 < total;
        if !in_range || (col0 < left_len) == (col1 < left_len) {
            return Err(PlanError::EquijoinColumns {
                col0,
                col1,
                left_len,
                total,
            });
        }
        Ok(())
    }

    /// Add `$col0 = $col1` as a join predicate.
    ///
    /// A `CrossProduct` becomes a `Join` on that condition; a `Join` has it
    /// conjoined onto its existing condition. Any other variant, including
    /// `ProjectingJoin`, is rejected.
    pub fn add_equijoin_condition(self, col0: usize, col1: usize) -> PlanResult<Operator> {
        self.check_equijoin_columns(col0, col1)?;
        let condition = Expression::eq_attrs(col0, col1);
        let mut op = self;
        if let OpKind::Join {
            condition: existing,
            ..
        } = op.kind_mut()
        {
            *existing = Expression::and(existing.clone(), condition);
            return Ok(op);
        }
        let name = op.name();
        match op.into_kind() {
            OpKind::CrossProduct { left, right } => Ok(Operator::join(condition, *left, *right)),
            _ => Err(PlanError::Unsupported {
                operation: "add_equijoin_condition",
                op: name.to_string(),
            }),
        }
    }

    /// Names of every `ScanTemp` in this subtree
    pub fn referenced_temps(&self) -> BTreeSet<String> {
        self.iter_preorder()
            .filter_map(|op| match op.kind() {
                OpKind::ScanTemp { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Replace every `ScanTemp(name)` with a copy of `replacement`.
    ///
    /// Returns the number of substitutions made.
    pub fn substitute_temp(&mut self, name: &str, replacement: &Operator) -> usize {
        if let OpKind::ScanTemp { name: temp, .. } = self.kind() {
            if temp == name {
                *self = replacement.copy();
                return 1;
            }
            return 0;
        }
        self.children_mut()
            .into_iter()
            .map(|child| child.substitute_temp(name, replacement))
            .sum()
    }

    /// Fill in empty `ScanTemp` schemes from `temps`.
    ///
    /// Fails if a temp is read without a known scheme.
    pub fn bind_temp_schemes(&mut self, temps: &HashMap<String, Scheme>) -> PlanResult<()> {
        if let OpKind::ScanTemp { name, scheme } = self.kind_mut() {
            if scheme.is_empty() {
                *scheme = temps.get(name.as_str()).cloned().ok_or_else(|| {
                    PlanError::Program {
                        message: format!("temp '{name}' is read before it is assigned"),
                    }
                })?;
            }
            return Ok(());
        }
        for child in self.children_mut() {
            child.bind_temp_schemes(temps)?;
        }
        Ok(())
    }

    /// Bind the body of a `Fixpoint` and publish its scheme to the
    /// fixpoint's `State` operators.
    ///
    /// A body whose scheme depends on an unbound `State` leaves the binding
    /// unpublished; `State` reads keep failing with a recursion error.
    pub fn loop_body(&mut self, plan: Operator) -> PlanResult<()> {
        let name = self.name();
        let OpKind::Fixpoint { body, slot } = self.kind_mut() else {
            return Err(PlanError::Unsupported {
                operation: "loop_body",
                op: name.to_string(),
            });
        };
        match plan.scheme() {
            Ok(scheme) => slot.publish(Some(scheme)),
            Err(err) => {
                log::debug!("Fixpoint body scheme unresolved: {err}");
                slot.publish(None);
            }
        }
        *body = Some(Box::new(plan));
        Ok(())
    }

    /// Publish a `Fixpoint`'s body scheme into its slot, if it resolves
    pub(crate) fn publish_fixpoint_scheme(&self) {
        if let OpKind::Fixpoint {
            body: Some(body),
            slot,
        } = self.kind()
        {
            match body.scheme() {
                Ok(scheme) => slot.publish(Some(scheme)),
                Err(err) => log::debug!("Fixpoint body scheme unresolved: {err}"),
            }
        }
    }

    /// Give every `Fixpoint` in this tree its own slot and point the
    /// `State`s in this tree that read it at the new slot. States bound to
    /// fixpoints outside the tree are left alone.
    pub(crate) fn relink_recursion(&mut self) {
        let relinked: Vec<(RecursionSlot, RecursionSlot)> = self
            .iter_preorder()
            .filter_map(|op| match op.kind() {
                OpKind::Fixpoint { slot, .. } => Some((slot.clone(), slot.detach())),
                _ => None,
            })
            .collect();
        if !relinked.is_empty() {
            self.relink_slots(&relinked);
        }
    }

    fn relink_slots(&mut self, relinked: &[(RecursionSlot, RecursionSlot)]) {
        match self.kind_mut() {
            OpKind::Fixpoint { slot, .. } => {
                let fresh = relinked
                    .iter()
                    .find(|(old, _)| old.same_cell(slot))
                    .map(|(_, fresh)| fresh.clone());
                if let Some(fresh) = fresh {
                    *slot = fresh;
                }
            }
            OpKind::State { fixpoint, .. } => {
                let fresh = relinked
                    .iter()
                    .find(|(old, _)| fixpoint.is_bound_to(old))
                    .map(|(_, fresh)| fresh.handle());
                if let Some(fresh) = fresh {
                    *fixpoint = fresh;
                }
            }
            _ => {}
        }
        for child in self.children_mut() {
            child.relink_slots(relinked);
        }
    }

    /// A `State` operator reading this `Fixpoint`
    pub fn state_for(&self, name: impl Into<String>) -> PlanResult<Operator> {
        match self.kind() {
            OpKind::Fixpoint { slot, .. } => Ok(Operator::new(OpKind::State {
                name: name.into(),
                fixpoint: slot.handle(),
            })),
            _ => Err(PlanError::Unsupported {
                operation: "state_for",
                op: self.name().to_string(),
            }),
        }
    }
}
