use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt as _, StreamExt as _};
use logo::sharing::Channel;
use tokio::sync::mpsc;
use tracing::debug;

use crate::AppState;

/// Hand every `/share` connection to the relay.
pub async fn share(State(relay): AppState, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| async move { relay.serve(channel(socket)).await })
}

/// Pump a socket's text frames through a [`Channel`].
///
/// Dropping every sender of the channel closes the socket.
fn channel(socket: WebSocket) -> Channel {
    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(text) = out_rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
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
        debug!("socket closed by client");
    });
    Channel::from_parts(out_tx, in_rx)
}
