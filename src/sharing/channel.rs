use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Things that end a sharing session.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("could not connect to {0}: {1}")]
    Connect(String, String),
    #[error("channel closed")]
    Closed,
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Sending half of a [`Channel`].
#[derive(Debug, Clone)]
pub struct ChannelSender(UnboundedSender<String>);

impl ChannelSender {
    pub fn send<T: Serialize>(&self, msg: &T) -> Result<(), ChannelError> {
        self.send_text(serde_json::to_string(msg)?)
    }

    pub fn send_text(&self, text: String) -> Result<(), ChannelError> {
        self.0.send(text).map_err(|_| ChannelError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Receiving half of a [`Channel`].
#[derive(Debug)]
pub struct ChannelReceiver(UnboundedReceiver<String>);

impl ChannelReceiver {
    /// Wait for the next message, `None` once the peer is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.0.recv().await
    }

    pub async fn recv_json<T: DeserializeOwned>(&mut self) -> Result<T, ChannelError> {
        let text = self.recv().await.ok_or(ChannelError::Closed)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn close(&mut self) {
        self.0.close();
    }
}

/// An ordered, bidirectional stream of JSON text messages.
///
/// Messages arrive in the order they were sent, without duplicates.
/// The transport behind it is either in memory ([`Channel::pair`])
/// or a WebSocket ([`Channel::connect`]).
#[derive(Debug)]
pub struct Channel {
    sender: Option<ChannelSender>,
    receiver: ChannelReceiver,
}

impl Channel {
    pub fn from_parts(outgoing: UnboundedSender<String>, incoming: UnboundedReceiver<String>) -> Self {
        Self {
            sender: Some(ChannelSender(outgoing)),
            receiver: ChannelReceiver(incoming),
        }
    }

    /// Two connected in-memory ends.
    pub fn pair() -> (Channel, Channel) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (Channel::from_parts(a_tx, b_rx), Channel::from_parts(b_tx, a_rx))
    }

    pub fn send<T: Serialize>(&self, msg: &T) -> Result<(), ChannelError> {
        self.sender.as_ref().ok_or(ChannelError::Closed)?.send(msg)
    }

    pub async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }

    pub async fn recv_json<T: DeserializeOwned>(&mut self) -> Result<T, ChannelError> {
        self.receiver.recv_json().await
    }

    /// Stop sending and receiving. Messages still queued are dropped.
    pub fn close(&mut self) {
        self.sender = None;
        self.receiver.close();
    }

    pub fn split(self) -> (Option<ChannelSender>, ChannelReceiver) {
        (self.sender, self.receiver)
    }
}

#[cfg(feature = "net")]
mod ws {
    use futures::{SinkExt as _, StreamExt as _};
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::Message;
    use tracing::debug;

    use super::{Channel, ChannelError};

    impl Channel {
        /// Open a WebSocket connection to `url`.
        pub async fn connect(url: &str) -> Result<Self, ChannelError> {
            let (socket, _) = tokio_tungstenite::connect_async(url)
                .await
                .map_err(|e| ChannelError::Connect(url.to_string(), e.to_string()))?;
            let (mut sink, mut stream) = socket.split();
            let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
            let (in_tx, in_rx) = mpsc::unbounded_channel();
            tokio::spawn(async move {
                while let Some(text) = out_rx.recv().await {
                    if sink.send(Message::text(text)).await.is_err() {
                        break;
                    }
                }
                _ = sink.close().await;
            });
            tokio::spawn(async move {
                while let Some(Ok(msg)) = stream.next().await {
                    match msg {
                        Message::Text(text) => {
                            if in_tx.send(text.as_str().to_owned()).is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        _ => {}
                    }
                }
                debug!("websocket reader finished");
            });
            Ok(Channel::from_parts(out_tx, in_rx))
        }
    }
}
