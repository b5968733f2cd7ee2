//! Fixpoint/State binding cells

use crate::error::{PlanError, PlanResult};
use ra_core::Scheme;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Scheme cell owned by a `Fixpoint`.
///
/// Holds the scheme of the loop body once one has been bound. `State`
/// operators observe it through a non-owning [`StateHandle`].
#[derive(Debug, Clone, Default)]
pub struct RecursionSlot(Rc<RefCell<Option<Scheme>>>);

impl RecursionSlot {
    /// Create an unbound slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or clear) the body scheme
    pub fn publish(&self, scheme: Option<Scheme>) {
        *self.0.borrow_mut() = scheme;
    }

    /// Currently published scheme, if any
    pub fn scheme(&self) -> Option<Scheme> {
        self.0.borrow().clone()
    }

    /// Non-owning handle for a `State` operator
    pub fn handle(&self) -> StateHandle {
        StateHandle(Rc::downgrade(&self.0))
    }

    /// Whether both slots are the same cell
    pub fn same_cell(&self, other: &RecursionSlot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// New cell holding the current binding
    pub fn detach(&self) -> RecursionSlot {
        let fresh = RecursionSlot::new();
        fresh.publish(self.scheme());
        fresh
    }
}

// Binding cells never participate in structural equality.
impl PartialEq for RecursionSlot {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// Back-reference from a `State` to the `Fixpoint` that defines it
#[derive(Debug, Clone, Default)]
pub struct StateHandle(Weak<RefCell<Option<Scheme>>>);

impl StateHandle {
    /// Whether this handle observes `slot`
    pub fn is_bound_to(&self, slot: &RecursionSlot) -> bool {
        Weak::ptr_eq(&self.0, &Rc::downgrade(&slot.0))
    }

    /// Scheme of the owning fixpoint's body
    pub fn scheme(&self, state: &str) -> PlanResult<Scheme> {
        let cell = self.0.upgrade().ok_or_else(|| PlanError::Recursion {
            message: format!("State '{state}' is not attached to a live Fixpoint"),
        })?;
        let scheme = cell.borrow().clone();
        scheme.ok_or_else(|| PlanError::Recursion {
            message: format!("State '{state}' read before its Fixpoint body was bound"),
        })
    }
}

impl PartialEq for StateHandle {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}
