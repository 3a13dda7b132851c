use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Messages sent from clients to the relay.
///
/// The relay itself doesn't need to understand the relayed actions,
/// so it uses `WireMessage<serde_json::Value>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum WireMessage<A = Action> {
    StartSharing,
    StartWatching { id: String },
    NewAction { inner_action: A },
}

/// The relay's answer to [`WireMessage::StartSharing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAssigned {
    pub id: String,
}
