use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use logo::{Action, Client, ClientConfig, Inbox};
use pretty_assertions::assert_eq;

use super::*;

async fn settle(client: &mut Client, inbox: &mut Inbox, done: impl FnMut(&Action) -> bool) {
    let settled = tokio::time::timeout(Duration::from_secs(5), client.settle_until(inbox, done))
        .await
        .expect("timed out waiting for client");
    assert!(settled);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let res = api::session(State(Relay::new()), Path("nope".to_string()))
        .await
        .into_response();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn run_returns_drawing() {
    let Json(res) = api::run("repeat 4 [\n fd 10 rt 90\n]\n".to_string())
        .await
        .ok()
        .expect("script runs");
    assert_eq!(res["drawCommands"].as_array().map(Vec::len), Some(8));
    assert_eq!(res["incomplete"], false);
}

#[tokio::test]
async fn run_reports_first_error() {
    let res = api::run("fd 10\nfnord 5\n".to_string()).await.into_response();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn demos_listed() {
    let Json(list) = api::demos().await;
    let names: Vec<_> = list
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert!(names.contains(&"square"));
}

#[tokio::test]
async fn sharing_over_websocket() {
    let relay = Relay::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(relay.clone(), None);
    tokio::spawn(async move { axum::serve(listener, app).await });

    let config = ClientConfig::new().relay(format!("ws://{addr}/share"));
    let (mut presenter, mut p_inbox) = Client::new(config.clone(), Arc::new(config.connector()));
    let (mut observer, mut o_inbox) = Client::new(config.clone(), Arc::new(config.connector()));

    presenter.dispatch(Action::StartSharing { reset: true });
    settle(&mut presenter, &mut p_inbox, |a| matches!(a, Action::StartedSharing { .. })).await;
    let url = presenter.state().environment.sharing_url.clone().unwrap();
    assert_eq!(relay.sessions().len(), 1);

    observer.dispatch(Action::TryStartWatching { url });
    settle(&mut observer, &mut o_inbox, |a| *a == Action::StartedWatching).await;

    for line in ["forward 10\n", "right 90\n", "forward 20\n"] {
        presenter.dispatch(Action::submit(line));
    }
    settle(&mut observer, &mut o_inbox, |a| {
        *a == Action::submit("forward 20\n")
    })
    .await;
    assert_eq!(observer.present(), presenter.present());

    presenter.dispatch(Action::StopSharing);
    settle(&mut observer, &mut o_inbox, |a| *a == Action::StoppedWatching).await;
}
