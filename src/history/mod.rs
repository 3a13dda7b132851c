//! Statement-level undo and redo.
//!
//! [`UndoRedo`] wraps an inner reducer. A new history entry is only
//! created when the inner reducer hands out a new instruction id, so a
//! single undo always reverts exactly one statement.

use std::{marker::PhantomData, sync::Arc};

use tracing::debug;

use crate::{action::Action, state::InterpreterState, tokens::InstructionId};


/// States that can tell how many statements they've seen.
pub trait Statements {
    fn next_instruction_id(&self) -> InstructionId;
}

impl Statements for InterpreterState {
    fn next_instruction_id(&self) -> InstructionId {
        self.next_instruction_id
    }
}

/// Past, present and future of some state.
///
/// Entries are shared via [`Arc`]; moving between them never copies a state.
#[derive(Debug, PartialEq)]
pub struct History<S> {
    pub past: Vec<Arc<S>>,
    pub present: Arc<S>,
    pub future: Vec<Arc<S>>,
}

impl<S> Clone for History<S> {
    fn clone(&self) -> Self {
        Self {
            past: self.past.clone(),
            present: Arc::clone(&self.present),
            future: self.future.clone(),
        }
    }
}

impl<S> History<S> {
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

/// Wraps the reducer of some state `S` with undo and redo.
pub struct UndoRedo<S, R> {
    inner: R,
    _state: PhantomData<fn() -> S>,
}

impl<S, R> UndoRedo<S, R>
where
    S: Statements,
    R: Fn(Option<&Arc<S>>, &Action) -> Arc<S>,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            _state: PhantomData,
        }
    }

    pub fn init(&self, action: &Action) -> History<S> {
        History {
            past: Vec::new(),
            present: (self.inner)(None, action),
            future: Vec::new(),
        }
    }

    pub fn reduce(&self, history: &mut History<S>, action: &Action) {
        match action {
            Action::Undo => {
                if let Some(prev) = history.past.pop() {
                    let present = std::mem::replace(&mut history.present, prev);
                    history.future.push(present);
                }
            }
            Action::Redo => {
                if let Some(next) = history.future.pop() {
                    let present = std::mem::replace(&mut history.present, next);
                    history.past.push(present);
                }
            }
            _ => {
                let next = (self.inner)(Some(&history.present), action);
                let advanced =
                    next.next_instruction_id() != history.present.next_instruction_id();
                let present = std::mem::replace(&mut history.present, next);
                if advanced {
                    debug!(depth = history.past.len() + 1, "history advanced");
                    history.past.push(present);
                    history.future.clear();
                }
            }
        }
    }
}
