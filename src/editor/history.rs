//! Undo/redo history.
//!
//! Every edit is an [`UndoableAction`]: a redo step and an undo step over
//! some state `S`. The history keeps two stacks:
//!
//! - performing an action runs its redo step, pushes it onto the undo stack
//!   and clears the redo stack
//! - `undo` pops the undo stack, runs the undo step, pushes onto redo
//! - `redo` pops the redo stack, runs the redo step, pushes onto undo
//!
//! Undo and redo on an empty stack are no-ops that return `false`. A step
//! that fails after its counterpart succeeded means the history no longer
//! matches the state, and panics.

use log::debug;

/// Identifier of an action in one history.
///
/// Ids are assigned in the order actions are performed and never reused,
/// so the id on top of the undo stack identifies the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u64);

impl ActionId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action({})", self.0)
    }
}

/// One step of an action. Returns whether the state changed.
pub type Step<S> = Box<dyn Fn(&mut S) -> bool>;

/// A paired forward/reverse edit.
///
/// Steps capture by value everything they need, so the action can be
/// replayed any number of times.
pub struct UndoableAction<S> {
    description: String,
    redo: Step<S>,
    undo: Step<S>,
}

impl<S> UndoableAction<S> {
    pub fn new(
        description: impl Into<String>,
        redo: impl Fn(&mut S) -> bool + 'static,
        undo: impl Fn(&mut S) -> bool + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            redo: Box::new(redo),
            undo: Box::new(undo),
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the forward step.
    pub fn redo(&self, state: &mut S) -> bool {
        (self.redo)(state)
    }

    /// Run the reverse step.
    pub fn undo(&self, state: &mut S) -> bool {
        (self.undo)(state)
    }
}

impl<S> std::fmt::Debug for UndoableAction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoableAction")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Undo and redo stacks for one editing session.
pub struct History<S> {
    undo_stack: Vec<(ActionId, UndoableAction<S>)>,
    redo_stack: Vec<(ActionId, UndoableAction<S>)>,
    next_id: u64,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            next_id: 0,
        }
    }
}

impl<S> History<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` and record it.
    ///
    /// An action whose redo step reports no change is dropped, and the redo
    /// stack is left alone. Returns the result of the redo step.
    pub fn perform(&mut self, state: &mut S, action: UndoableAction<S>) -> bool {
        if !action.redo(state) {
            debug!("{}: nothing changed", action.description());
            return false;
        }

        let id = ActionId(self.next_id);
        self.next_id += 1;
        debug!("performed {} ({})", action.description(), id);
        self.redo_stack.clear();
        self.undo_stack.push((id, action));
        true
    }

    /// Build an action from two steps, run it and record it.
    pub fn perform_action(
        &mut self,
        state: &mut S,
        description: impl Into<String>,
        redo: impl Fn(&mut S) -> bool + 'static,
        undo: impl Fn(&mut S) -> bool + 'static,
    ) -> bool {
        self.perform(state, UndoableAction::new(description, redo, undo))
    }

    /// Undo the most recent action.
    ///
    /// # Panics
    ///
    /// Panics if the action's undo step fails.
    pub fn undo(&mut self, state: &mut S) -> bool {
        let Some((id, action)) = self.undo_stack.pop() else {
            return false;
        };
        assert!(
            action.undo(state),
            "undo of {} ({id}) failed after a successful redo",
            action.description()
        );
        debug!("undid {} ({})", action.description(), id);
        self.redo_stack.push((id, action));
        true
    }

    /// Redo the most recently undone action.
    ///
    /// # Panics
    ///
    /// Panics if the action's redo step fails.
    pub fn redo(&mut self, state: &mut S) -> bool {
        let Some((id, action)) = self.redo_stack.pop() else {
            return false;
        };
        assert!(
            action.redo(state),
            "redo of {} ({id}) failed after a successful undo",
            action.description()
        );
        debug!("redid {} ({})", action.description(), id);
        self.undo_stack.push((id, action));
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the action `undo` would reverse.
    #[must_use]
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|(_, a)| a.description())
    }

    /// Description of the action `redo` would repeat.
    #[must_use]
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|(_, a)| a.description())
    }

    /// Id of the action on top of the undo stack.
    #[must_use]
    pub fn top(&self) -> Option<ActionId> {
        self.undo_stack.last().map(|&(id, _)| id)
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all actions.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl<S> std::fmt::Debug for History<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("undo", &self.undo_len())
            .field("redo", &self.redo_len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
