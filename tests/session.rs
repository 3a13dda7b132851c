use std::{sync::Arc, time::Duration};

use logo::{Action, Client, ClientConfig, Inbox, sharing::Relay};
use pretty_assertions::assert_eq;

async fn settle(client: &mut Client, inbox: &mut Inbox, done: impl FnMut(&Action) -> bool) {
    let settled = tokio::time::timeout(Duration::from_secs(5), client.settle_until(inbox, done))
        .await
        .expect("timed out waiting for client");
    assert!(settled);
}

#[tokio::test]
async fn observers_see_presenter_script() {
    let relay = Arc::new(Relay::new());
    let (mut presenter, mut p_inbox) = Client::new(ClientConfig::new(), relay.clone());
    presenter.dispatch(Action::StartSharing { reset: true });
    settle(&mut presenter, &mut p_inbox, |a| {
        matches!(a, Action::StartedSharing { .. })
    })
    .await;
    let url = presenter.state().environment.sharing_url.clone().unwrap();

    let mut observers = Vec::new();
    for _ in 0..2 {
        let (mut observer, mut inbox) = Client::new(ClientConfig::new(), relay.clone());
        observer.dispatch(Action::TryStartWatching { url: url.clone() });
        settle(&mut observer, &mut inbox, |a| *a == Action::StartedWatching).await;
        observers.push((observer, inbox));
    }

    for line in ["forward 10\n", "right 90\n", "forward 20\n"] {
        presenter.dispatch(Action::submit(line));
    }
    presenter.dispatch(Action::Undo);

    for (observer, inbox) in &mut observers {
        settle(observer, inbox, |a| *a == Action::submit("forward 20\n")).await;
        assert_eq!(observer.present().draw_commands.len(), 3);
        assert_eq!(observer.present().turtle, presenter.state().script.future[0].turtle);
    }
    assert_eq!(presenter.present().draw_commands.len(), 2);
}

#[tokio::test]
async fn script_name_is_local() {
    let relay = Arc::new(Relay::new());
    let (mut presenter, mut p_inbox) = Client::new(ClientConfig::new(), relay.clone());
    presenter.dispatch(Action::StartSharing { reset: false });
    settle(&mut presenter, &mut p_inbox, |a| {
        matches!(a, Action::StartedSharing { .. })
    })
    .await;
    presenter.dispatch(Action::SubmitScriptName {
        text: "mine".to_string(),
    });
    presenter.dispatch(Action::submit("fd 1"));
    let url = presenter.state().environment.sharing_url.clone().unwrap();

    let (mut observer, mut inbox) = Client::new(ClientConfig::new(), relay.clone());
    observer.dispatch(Action::TryStartWatching { url });
    settle(&mut observer, &mut inbox, |a| *a == Action::submit("fd 1")).await;
    assert_eq!(observer.present().draw_commands, presenter.present().draw_commands);
    assert_eq!(observer.present().name, logo::state::DEFAULT_NAME);
}
