use serde::{Deserialize, Serialize};

/// Everything that can happen to a client.
///
/// Actions are plain data so they can be relayed over the wire and
/// replayed by observers. They serialize as `{"type": "SUBMIT_EDIT_LINE", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    SubmitEditLine {
        text: String,
    },
    SubmitScriptName {
        text: String,
    },
    Undo,
    Redo,
    Reset,
    StartSharing {
        #[serde(default)]
        reset: bool,
    },
    StopSharing,
    StartedSharing {
        url: String,
    },
    StoppedSharing,
    TryStartWatching {
        url: String,
    },
    StopWatching,
    StartedWatching,
    StoppedWatching,
    ShareNewAction {
        inner_action: Box<Action>,
    },
}

impl Action {
    pub fn submit(text: impl Into<String>) -> Self {
        Action::SubmitEditLine { text: text.into() }
    }
}
