use std::sync::Arc;

use super::*;
use crate::sharing::Relay;

fn offline() -> (Client, Inbox) {
    Client::new(ClientConfig::new(), Arc::new(Relay::new()))
}

#[test]
fn share_urls() {
    let config = ClientConfig::new().share_base("https://logo.example/index.html");
    assert_eq!(
        config.share_url("1234"),
        "https://logo.example/index.html?watching=1234"
    );
    assert_eq!(ClientConfig::default().relay_url(), DEFAULT_RELAY);
}

#[test]
fn session_ids_from_links() {
    assert_eq!(
        watching_id("http://127.0.0.1:8000/index.html?watching=ab-12"),
        Some("ab-12".to_string())
    );
    assert_eq!(
        watching_id("http://host/?lang=en&watching=xyz#top"),
        Some("xyz".to_string())
    );
    assert_eq!(watching_id("  ab-12 "), Some("ab-12".to_string()));
    assert_eq!(watching_id("http://host/?watching="), None);
    assert_eq!(watching_id("http://host/index.html"), None);
    assert_eq!(watching_id(""), None);
}

#[test]
fn submitted_lines_are_offered_for_sharing() {
    let (mut client, _inbox) = offline();
    let dispatched = client.dispatch(Action::submit("forward 10"));
    assert_eq!(
        dispatched,
        [
            Action::ShareNewAction {
                inner_action: Box::new(Action::submit("forward 10"))
            },
            Action::submit("forward 10"),
        ]
    );
    assert_eq!(client.present().draw_commands.len(), 1);
}

#[test]
fn undo_is_not_shared() {
    let (mut client, _inbox) = offline();
    client.dispatch(Action::submit("forward 10"));
    assert_eq!(client.dispatch(Action::Undo), [Action::Undo]);
    assert!(client.present().draw_commands.is_empty());
}

#[test]
fn stopping_without_session_is_quiet() {
    let (mut client, _inbox) = offline();
    assert_eq!(client.dispatch(Action::StopSharing), [Action::StopSharing]);
    assert_eq!(client.dispatch(Action::StopWatching), [Action::StopWatching]);
}

#[test]
fn bad_link_does_not_reset() {
    let (mut client, _inbox) = offline();
    client.dispatch(Action::submit("forward 10"));
    let url = "http://host/index.html".to_string();
    assert_eq!(
        client.dispatch(Action::TryStartWatching { url: url.clone() }),
        [Action::TryStartWatching { url }]
    );
    assert!(!client.is_watching());
    assert_eq!(client.present().draw_commands.len(), 1);
}

#[tokio::test]
async fn handle_feeds_inbox() {
    let (mut client, mut inbox) = offline();
    client.handle().dispatch(Action::submit("right 45"));
    let event = inbox.recv().await.expect("queued event");
    let dispatched = client.process(event);
    assert_eq!(dispatched.last(), Some(&Action::submit("right 45")));
    assert_eq!(client.present().turtle.angle, 45.0);
}
