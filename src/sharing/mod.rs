//! Live replication of a script to read-only observers.
//!
//! A presenter connects to a [`Relay`], receives a session id and then
//! forwards every submitted line. Observers join with that id and replay
//! the forwarded actions through their own reducer pipeline.

use std::fmt::Display;

use futures::future::BoxFuture;
use tokio::sync::oneshot;

pub use channel::{Channel, ChannelError, ChannelReceiver, ChannelSender};
pub use message::{SessionAssigned, WireMessage};
pub use relay::{Relay, SessionInfo};

mod channel;
mod message;
mod relay;

/// Opens channels to a relay.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self) -> BoxFuture<'static, Result<Channel, ChannelError>>;
}

/// Connects to a relay server over WebSocket.
#[cfg(feature = "net")]
pub struct WsConnector {
    url: String,
}

#[cfg(feature = "net")]
impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(feature = "net")]
impl Connector for WsConnector {
    fn connect(&self) -> BoxFuture<'static, Result<Channel, ChannelError>> {
        use futures::FutureExt as _;
        let url = self.url.clone();
        async move { Channel::connect(&url).await }.boxed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Presenter,
    Observer,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Presenter => write!(f, "presenter"),
            Role::Observer => write!(f, "observer"),
        }
    }
}

/// A sharing or watching session owned by a client.
///
/// Dropping the session tears it down: the background task driving
/// the channel is cancelled and the channel is closed.
#[derive(Debug)]
pub struct SharingSession {
    pub role: Role,
    /// distinguishes this session from earlier ones of the same role
    pub generation: u64,
    pub session_id: Option<String>,
    sender: Option<ChannelSender>,
    /// messages relayed before the channel was established
    pending: Vec<WireMessage>,
    ready: bool,
    cancel: Option<oneshot::Sender<()>>,
}

impl SharingSession {
    pub fn new(role: Role, generation: u64, cancel: oneshot::Sender<()>) -> Self {
        Self {
            role,
            generation,
            session_id: None,
            sender: None,
            pending: Vec::new(),
            ready: false,
            cancel: Some(cancel),
        }
    }

    /// Attach the established channel and send everything queued so far.
    pub fn established(&mut self, session_id: Option<String>, sender: Option<ChannelSender>) {
        self.session_id = session_id;
        self.sender = sender;
        self.ready = true;
        for msg in std::mem::take(&mut self.pending) {
            self.relay(&msg);
        }
    }

    /// Send a message.
    ///
    /// Messages are queued until the session is established and
    /// silently dropped once its channel is gone.
    pub fn relay(&mut self, msg: &WireMessage) {
        match &self.sender {
            Some(sender) => {
                _ = sender.send(msg);
            }
            None if !self.ready => self.pending.push(msg.clone()),
            None => {}
        }
    }

    pub fn close(mut self) {
        self.sender = None;
        if let Some(cancel) = self.cancel.take() {
            _ = cancel.send(());
        }
    }
}
