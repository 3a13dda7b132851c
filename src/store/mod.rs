use std::sync::Arc;

use tracing::debug;

use crate::{
    action::Action,
    history::{History, UndoRedo},
    parser::parse_statement,
    state::InterpreterState,
};


type ScriptReducer = fn(Option<&Arc<InterpreterState>>, &Action) -> Arc<InterpreterState>;

/// The interpreter part of the reducer pipeline.
///
/// Returns the very same `Arc` for actions that don't concern the script.
pub fn script_reducer(
    state: Option<&Arc<InterpreterState>>,
    action: &Action,
) -> Arc<InterpreterState> {
    let Some(state) = state else {
        return Arc::new(InterpreterState::default());
    };
    match action {
        Action::SubmitEditLine { text } => Arc::new(parse_statement(state, text)),
        Action::SubmitScriptName { text } => Arc::new(InterpreterState {
            name: text.clone(),
            ..(**state).clone()
        }),
        Action::Reset => Arc::new(InterpreterState::default()),
        _ => Arc::clone(state),
    }
}

/// Sharing and watching status as seen by the user interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub is_sharing: bool,
    pub sharing_url: Option<String>,
    pub is_watching: bool,
}

impl Environment {
    fn reduce(&mut self, action: &Action) {
        match action {
            Action::StartedSharing { url } => {
                self.is_sharing = true;
                self.sharing_url = Some(url.clone());
            }
            Action::StoppedSharing => {
                self.is_sharing = false;
                self.sharing_url = None;
            }
            Action::StartedWatching => self.is_watching = true,
            Action::StoppedWatching => self.is_watching = false,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub script: History<InterpreterState>,
    pub environment: Environment,
}

/// Holds the application state and runs actions through the reducers.
pub struct Store {
    script: UndoRedo<InterpreterState, ScriptReducer>,
    state: AppState,
}

impl Store {
    pub fn new() -> Self {
        let script = UndoRedo::new(script_reducer as ScriptReducer);
        let state = AppState {
            script: script.init(&Action::Reset),
            environment: Environment::default(),
        };
        Self { script, state }
    }

    /// Start from a restored script, e.g. one loaded from a snapshot.
    pub fn with_script(present: InterpreterState) -> Self {
        let mut this = Self::new();
        this.state.script.present = Arc::new(present);
        this
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn present(&self) -> &InterpreterState {
        &self.state.script.present
    }

    pub fn dispatch(&mut self, action: &Action) {
        debug!(?action, "dispatch");
        self.script.reduce(&mut self.state.script, action);
        self.state.environment.reduce(action);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
