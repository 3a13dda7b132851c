use std::{collections::HashMap, sync::Arc};

use futures::{FutureExt as _, future::BoxFuture};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    Connector,
    channel::{Channel, ChannelError, ChannelSender},
    message::{SessionAssigned, WireMessage},
};

#[derive(Default)]
struct RelaySession {
    /// every action relayed so far, replayed to late watchers
    log: Vec<String>,
    watchers: Vec<ChannelSender>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub actions: usize,
    pub watchers: usize,
}

/// Fans the actions of presenters out to their watchers.
///
/// The relay is transport agnostic: every connection is handed to
/// [`Relay::serve`] as a [`Channel`]. The first message decides whether
/// the connection belongs to a presenter or a watcher.
#[derive(Clone, Default)]
pub struct Relay {
    sessions: Arc<Mutex<HashMap<String, RelaySession>>>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn serve(&self, mut channel: Channel) {
        match channel.recv_json::<WireMessage<Value>>().await {
            Ok(WireMessage::StartSharing) => self.serve_presenter(channel).await,
            Ok(WireMessage::StartWatching { id }) => self.serve_watcher(id, channel).await,
            Ok(WireMessage::NewAction { .. }) => warn!("action received before START_SHARING"),
            Err(why) => debug!(%why, "connection closed before handshake"),
        }
    }

    async fn serve_presenter(&self, channel: Channel) {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .insert(id.clone(), RelaySession::default());
        let (sender, mut receiver) = channel.split();
        let assigned = sender
            .ok_or(ChannelError::Closed)
            .and_then(|s| s.send(&SessionAssigned { id: id.clone() }));
        if assigned.is_ok() {
            info!(%id, "session started");
            while let Some(text) = receiver.recv().await {
                match serde_json::from_str::<WireMessage<Value>>(&text) {
                    Ok(WireMessage::NewAction { inner_action }) => {
                        self.publish(&id, inner_action.to_string())
                    }
                    Ok(other) => warn!(%id, ?other, "unexpected message from presenter"),
                    Err(why) => warn!(%id, %why, "malformed message from presenter"),
                }
            }
        }
        self.sessions.lock().remove(&id);
        info!(%id, "session ended");
    }

    fn publish(&self, id: &str, action: String) {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.get_mut(id) else {
            return;
        };
        session
            .watchers
            .retain(|watcher| watcher.send_text(action.clone()).is_ok());
        session.log.push(action);
    }

    async fn serve_watcher(&self, id: String, channel: Channel) {
        let (sender, mut receiver) = channel.split();
        let Some(sender) = sender else {
            return;
        };
        {
            let mut sessions = self.sessions.lock();
            let Some(session) = sessions.get_mut(&id) else {
                warn!(%id, "watcher asked for unknown session");
                return;
            };
            for action in &session.log {
                if sender.send_text(action.clone()).is_err() {
                    return;
                }
            }
            session.watchers.push(sender);
            info!(%id, watchers = session.watchers.len(), "watcher joined");
        }
        // the session holds the only sender now, wait for the watcher to leave
        while receiver.recv().await.is_some() {}
    }

    pub fn sessions(&self) -> Vec<SessionInfo> {
        let mut list: Vec<_> = self
            .sessions
            .lock()
            .iter()
            .map(|(id, session)| SessionInfo {
                id: id.clone(),
                actions: session.log.len(),
                watchers: session.watchers.iter().filter(|w| !w.is_closed()).count(),
            })
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    pub fn session(&self, id: &str) -> Option<SessionInfo> {
        self.sessions().into_iter().find(|s| s.id == id)
    }
}

/// Connect to an in-process relay, mostly useful for tests.
impl Connector for Relay {
    fn connect(&self) -> BoxFuture<'static, Result<Channel, ChannelError>> {
        let (client, server) = Channel::pair();
        let relay = self.clone();
        tokio::spawn(async move { relay.serve(server).await });
        futures::future::ready(Ok(client)).boxed()
    }
}
