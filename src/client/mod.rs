//! The client driver.
//!
//! All state changes happen synchronously in [`Client::dispatch`] and
//! [`Client::process`]. Network work runs in background tasks that only
//! ever report back through the [`Inbox`], so follow-ups are applied one
//! at a time and in order.

use std::sync::Arc;

use tokio::sync::{
    mpsc::{self, UnboundedReceiver, UnboundedSender},
    oneshot,
};
use tracing::{debug, info, warn};

use crate::{
    action::Action,
    sharing::{ChannelError, ChannelSender, Connector, Role, SessionAssigned, SharingSession, WireMessage},
    state::InterpreterState,
    store::{AppState, Store},
    tokens,
};

pub use config::{ClientConfig, DEFAULT_RELAY, DEFAULT_SHARE_BASE, watching_id};

mod config;
#[cfg(test)]
mod test;

/// Something the client has to process.
pub struct Event(EventKind);

enum EventKind {
    Action(Action),
    PresenterReady {
        generation: u64,
        session_id: String,
        sender: Option<ChannelSender>,
    },
    ObserverJoined {
        generation: u64,
    },
    Remote {
        generation: u64,
        action: Action,
    },
    SessionClosed {
        role: Role,
        generation: u64,
        reason: Option<ChannelError>,
    },
}

impl From<Action> for Event {
    fn from(value: Action) -> Self {
        Event(EventKind::Action(value))
    }
}

/// Queue of events waiting for [`Client::process`].
pub struct Inbox(UnboundedReceiver<Event>);

impl Inbox {
    pub async fn recv(&mut self) -> Option<Event> {
        self.0.recv().await
    }
}

/// Lets other tasks feed actions into a client.
#[derive(Clone)]
pub struct ClientHandle(UnboundedSender<Event>);

impl ClientHandle {
    pub fn dispatch(&self, action: Action) {
        _ = self.0.send(action.into());
    }
}

pub struct Client {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    store: Store,
    events: UnboundedSender<Event>,
    presenter: Option<SharingSession>,
    observer: Option<SharingSession>,
    generation: u64,
    dispatched: Vec<Action>,
}

impl Client {
    pub fn new(config: ClientConfig, connector: Arc<dyn Connector>) -> (Self, Inbox) {
        let (events, inbox) = mpsc::unbounded_channel();
        let this = Self {
            config,
            connector,
            store: Store::new(),
            events,
            presenter: None,
            observer: None,
            generation: 0,
            dispatched: Vec::new(),
        };
        (this, Inbox(inbox))
    }

    pub fn with_store(self, store: Store) -> Self {
        Self { store, ..self }
    }

    pub fn handle(&self) -> ClientHandle {
        ClientHandle(self.events.clone())
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn present(&self) -> &InterpreterState {
        self.store.present()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_sharing(&self) -> bool {
        self.presenter.is_some()
    }

    pub fn is_watching(&self) -> bool {
        self.observer.is_some()
    }

    /// Run an action and everything it triggers.
    ///
    /// Returns all actions that went through the reducers, in order.
    pub fn dispatch(&mut self, action: Action) -> Vec<Action> {
        self.apply(action);
        std::mem::take(&mut self.dispatched)
    }

    /// Handle one event from the inbox.
    pub fn process(&mut self, event: Event) -> Vec<Action> {
        match event.0 {
            EventKind::Action(action) => self.apply(action),
            EventKind::PresenterReady {
                generation,
                session_id,
                sender,
            } => self.presenter_ready(generation, session_id, sender),
            EventKind::ObserverJoined { generation } => {
                if current(&self.observer, generation) {
                    self.apply(Action::StartedWatching);
                }
            }
            EventKind::Remote { generation, action } => {
                if current(&self.observer, generation) {
                    self.replay(action);
                }
            }
            EventKind::SessionClosed {
                role,
                generation,
                reason,
            } => self.session_closed(role, generation, reason),
        }
        std::mem::take(&mut self.dispatched)
    }

    /// Process events until one of the dispatched actions matches `done`.
    ///
    /// Returns `false` if the inbox ran dry first.
    pub async fn settle_until(
        &mut self,
        inbox: &mut Inbox,
        mut done: impl FnMut(&Action) -> bool,
    ) -> bool {
        while let Some(event) = inbox.recv().await {
            if self.process(event).iter().any(&mut done) {
                return true;
            }
        }
        false
    }

    fn apply(&mut self, action: Action) {
        if let Action::SubmitEditLine { .. } = action {
            self.apply(Action::ShareNewAction {
                inner_action: Box::new(action.clone()),
            });
        }
        self.store.dispatch(&action);
        self.dispatched.push(action.clone());
        match action {
            Action::StartSharing { reset } => self.start_sharing(reset),
            Action::StopSharing => self.stop_sharing(),
            Action::ShareNewAction { inner_action } => {
                if let Some(session) = &mut self.presenter {
                    session.relay(&WireMessage::NewAction {
                        inner_action: *inner_action,
                    });
                }
            }
            Action::TryStartWatching { url } => self.start_watching(&url),
            Action::StopWatching => self.stop_watching(),
            _ => {}
        }
    }

    /// Apply an action received from a presenter.
    fn replay(&mut self, action: Action) {
        match action {
            Action::SubmitEditLine { .. }
            | Action::SubmitScriptName { .. }
            | Action::Undo
            | Action::Redo
            | Action::Reset => self.apply(action),
            other => warn!(action = ?other, "ignoring relayed action"),
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn start_sharing(&mut self, reset: bool) {
        if let Some(old) = self.presenter.take() {
            old.close();
        }
        if reset {
            self.apply(Action::Reset);
        }
        let (cancel, cancelled) = oneshot::channel();
        let generation = self.next_generation();
        let mut session = SharingSession::new(Role::Presenter, generation, cancel);
        if !reset {
            for text in tokens::submissions(&self.store.present().parsed_tokens) {
                session.relay(&WireMessage::NewAction {
                    inner_action: Action::SubmitEditLine { text },
                });
            }
        }
        self.presenter = Some(session);
        info!(generation, reset, "sharing requested");
        tokio::spawn(present(
            Arc::clone(&self.connector),
            self.events.clone(),
            generation,
            cancelled,
        ));
    }

    fn presenter_ready(
        &mut self,
        generation: u64,
        session_id: String,
        sender: Option<ChannelSender>,
    ) {
        let Some(session) = self.presenter.as_mut().filter(|s| s.generation == generation) else {
            debug!(generation, "stale presenter session");
            return;
        };
        session.established(Some(session_id.clone()), sender);
        let url = self.config.share_url(&session_id);
        info!(%url, "sharing started");
        self.apply(Action::StartedSharing { url });
    }

    fn stop_sharing(&mut self) {
        if let Some(session) = self.presenter.take() {
            session.close();
            self.apply(Action::StoppedSharing);
        }
    }

    fn start_watching(&mut self, url: &str) {
        let Some(id) = watching_id(url) else {
            warn!(url, "no session id in sharing link");
            return;
        };
        if let Some(old) = self.observer.take() {
            old.close();
        }
        self.apply(Action::Reset);
        let (cancel, cancelled) = oneshot::channel();
        let generation = self.next_generation();
        let mut session = SharingSession::new(Role::Observer, generation, cancel);
        session.established(Some(id.clone()), None);
        self.observer = Some(session);
        info!(%id, generation, "watching requested");
        tokio::spawn(watch(
            Arc::clone(&self.connector),
            self.events.clone(),
            generation,
            id,
            cancelled,
        ));
    }

    fn stop_watching(&mut self) {
        if let Some(session) = self.observer.take() {
            session.close();
            self.apply(Action::StoppedWatching);
        }
    }

    fn session_closed(&mut self, role: Role, generation: u64, reason: Option<ChannelError>) {
        let slot = match role {
            Role::Presenter => &mut self.presenter,
            Role::Observer => &mut self.observer,
        };
        if !current(slot, generation) {
            return;
        }
        if let Some(session) = slot.take() {
            session.close();
        }
        match reason {
            Some(why) => warn!(%role, %why, "session ended"),
            None => info!(%role, "session ended"),
        }
        self.apply(match role {
            Role::Presenter => Action::StoppedSharing,
            Role::Observer => Action::StoppedWatching,
        });
    }
}

fn current(session: &Option<SharingSession>, generation: u64) -> bool {
    session.as_ref().is_some_and(|s| s.generation == generation)
}

fn closed(role: Role, generation: u64, reason: Option<ChannelError>) -> Event {
    Event(EventKind::SessionClosed {
        role,
        generation,
        reason,
    })
}

async fn present(
    connector: Arc<dyn Connector>,
    events: UnboundedSender<Event>,
    generation: u64,
    mut cancelled: oneshot::Receiver<()>,
) {
    let handshake = async {
        let mut channel = connector.connect().await?;
        channel.send(&WireMessage::<Action>::StartSharing)?;
        let SessionAssigned { id } = channel.recv_json().await?;
        Ok::<_, ChannelError>((id, channel))
    };
    let (session_id, channel) = tokio::select! {
        _ = &mut cancelled => return,
        res = handshake => match res {
            Ok(res) => res,
            Err(why) => {
                _ = events.send(closed(Role::Presenter, generation, Some(why)));
                return;
            }
        },
    };
    let (sender, mut receiver) = channel.split();
    _ = events.send(Event(EventKind::PresenterReady {
        generation,
        session_id,
        sender,
    }));
    tokio::select! {
        _ = &mut cancelled => {}
        _ = async { while receiver.recv().await.is_some() {} } => {
            _ = events.send(closed(Role::Presenter, generation, None));
        }
    }
}

async fn watch(
    connector: Arc<dyn Connector>,
    events: UnboundedSender<Event>,
    generation: u64,
    id: String,
    mut cancelled: oneshot::Receiver<()>,
) {
    let join = async {
        let channel = connector.connect().await?;
        channel.send(&WireMessage::<Action>::StartWatching { id })?;
        Ok::<_, ChannelError>(channel)
    };
    let mut channel = tokio::select! {
        _ = &mut cancelled => return,
        res = join => match res {
            Ok(channel) => channel,
            Err(why) => {
                _ = events.send(closed(Role::Observer, generation, Some(why)));
                return;
            }
        },
    };
    _ = events.send(Event(EventKind::ObserverJoined { generation }));
    let reason = loop {
        let text = tokio::select! {
            _ = &mut cancelled => return,
            text = channel.recv() => text,
        };
        let Some(text) = text else {
            break None;
        };
        match serde_json::from_str::<Action>(&text) {
            Ok(action) => {
                _ = events.send(Event(EventKind::Remote { generation, action }));
            }
            Err(why) => break Some(ChannelError::from(why)),
        }
    };
    _ = events.send(closed(Role::Observer, generation, reason));
}
