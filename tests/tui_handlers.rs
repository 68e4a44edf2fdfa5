// Key handling in the TUI, without a terminal or a server.
#![cfg(feature = "tui")]
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use worddb::client::ApiClient;
use worddb::controller::{Outcome, WordController};
use worddb::flash::FlashBoard;
use worddb::model::{Endpoint, ListId, PageSnapshot};
use worddb::overlay::{Overlay, OverlayKind};
use worddb::tags::TagBoard;
use worddb::tui::Options;
use worddb::tui::action::{Action, AppEvent, Focus};
use worddb::tui::handlers::{handle_app_event, handle_key_event};
use worddb::tui::network::run_network_actor;
use worddb::tui::state::AppState;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn app() -> AppState {
    let page: PageSnapshot = serde_json::from_str(
        r#"{"lists": [
            {"listid": 3, "label": "latin",
             "words": [{"wordid": 7, "word": "cat", "meaning": "", "origin": "latin"}]},
            {"listid": 4, "label": "empty"}
        ]}"#,
    )
    .unwrap();
    let board = Arc::new(TagBoard::from_page(page));
    let client = ApiClient::new("http://127.0.0.1:1", "worddb-test", None).unwrap();
    let controller = WordController::new(
        client,
        Overlay::default(),
        FlashBoard::default(),
        board.clone(),
    );
    AppState::new(controller, board)
}

async fn type_text(state: &mut AppState, text: &str) {
    for c in text.chars() {
        handle_key_event(key(KeyCode::Char(c)), state).await;
    }
}

#[tokio::test]
async fn test_new_list_form_submits_add_list() {
    let mut state = app();
    assert_eq!(handle_key_event(key(KeyCode::Char('A')), &mut state).await, None);
    assert_eq!(state.overlay.as_ref().unwrap().kind, OverlayKind::AddList);

    type_text(&mut state, "greek").await;
    assert_eq!(state.overlay.as_ref().unwrap().value("label"), "greek");

    let action = handle_key_event(key(KeyCode::Enter), &mut state).await;
    assert_eq!(action, Some(Action::Submit(Endpoint::AddList, None)));
    assert_eq!(state.pending, 1);
}

#[tokio::test]
async fn test_edit_word_uses_selected_list() {
    let mut state = app();
    handle_key_event(key(KeyCode::Tab), &mut state).await;
    assert_eq!(state.active_focus, Focus::Words);

    handle_key_event(key(KeyCode::Char('e')), &mut state).await;
    let session = state.overlay.clone().expect("edit box open");
    assert_eq!(session.kind, OverlayKind::EditWord);
    assert_eq!(session.value("word"), "cat");
    // Empty meaning: lookup hint is shown straight away.
    assert!(session.hint.is_some());

    let action = handle_key_event(ctrl('s'), &mut state).await;
    assert_eq!(
        action,
        Some(Action::Submit(Endpoint::ChangeWord, Some(ListId::from(3))))
    );

    let action = handle_key_event(ctrl('d'), &mut state).await;
    assert_eq!(
        action,
        Some(Action::Submit(Endpoint::RemoveWord, Some(ListId::from(3))))
    );
}

#[tokio::test]
async fn test_backspace_clears_hint_and_esc_closes() {
    let mut state = app();
    state.active_focus = Focus::Words;
    handle_key_event(key(KeyCode::Char('a')), &mut state).await;
    assert_eq!(state.overlay.as_ref().unwrap().kind, OverlayKind::AddWord);

    type_text(&mut state, "ox").await;
    assert_eq!(state.overlay.as_ref().unwrap().hint.as_ref().unwrap().word, "ox");

    handle_key_event(key(KeyCode::Backspace), &mut state).await;
    handle_key_event(key(KeyCode::Backspace), &mut state).await;
    assert!(state.overlay.as_ref().unwrap().hint.is_none());

    handle_key_event(key(KeyCode::Esc), &mut state).await;
    assert!(state.overlay.is_none());
}

#[tokio::test]
async fn test_multiline_field_takes_newlines() {
    let mut state = app();
    handle_key_event(key(KeyCode::Char('A')), &mut state).await;
    handle_key_event(key(KeyCode::Tab), &mut state).await;
    type_text(&mut state, "a").await;
    let action = handle_key_event(key(KeyCode::Enter), &mut state).await;
    assert_eq!(action, None);
    type_text(&mut state, "b").await;
    assert_eq!(state.overlay.as_ref().unwrap().value("description"), "a\nb");
}

#[tokio::test]
async fn test_add_form_cannot_remove() {
    let mut state = app();
    handle_key_event(key(KeyCode::Char('A')), &mut state).await;
    assert_eq!(handle_key_event(ctrl('d'), &mut state).await, None);
    assert!(state.overlay.is_some());
}

#[tokio::test]
async fn test_navigation_and_quit() {
    let mut state = app();
    assert_eq!(state.selected_list().unwrap().label, "latin");
    handle_key_event(key(KeyCode::Char('j')), &mut state).await;
    assert_eq!(state.selected_list().unwrap().label, "empty");
    assert!(state.visible_words().is_empty());
    handle_key_event(key(KeyCode::Char('j')), &mut state).await;
    assert_eq!(state.selected_list().unwrap().label, "latin");

    handle_key_event(key(KeyCode::Char('g')), &mut state).await;
    assert_eq!(state.message, "List page: http://127.0.0.1:1/lists/latin");

    assert_eq!(
        handle_key_event(key(KeyCode::Char('q')), &mut state).await,
        Some(Action::Quit)
    );
}

#[tokio::test]
async fn test_retry_key_and_events() {
    let mut state = app();
    assert_eq!(handle_key_event(key(KeyCode::Char('R')), &mut state).await, None);
    assert_eq!(state.message, "Nothing to retry.");

    // Fail a submission against the closed port, then retry it.
    handle_key_event(key(KeyCode::Char('A')), &mut state).await;
    type_text(&mut state, "greek").await;
    let outcome = state.controller.add_list("").await.unwrap();
    assert_eq!(outcome, Outcome::TransportFailed);
    state.sync().await;
    let id = state.flashes[0].id;

    // Inside the form a plain R is text; Ctrl+R retries.
    handle_key_event(key(KeyCode::Char('R')), &mut state).await;
    assert_eq!(state.overlay.as_ref().unwrap().value("label"), "greekR");
    assert_eq!(
        handle_key_event(ctrl('r'), &mut state).await,
        Some(Action::Retry(id))
    );
    state.pending = 0;

    handle_key_event(key(KeyCode::Esc), &mut state).await;
    let action = handle_key_event(key(KeyCode::Char('R')), &mut state).await;
    assert_eq!(action, Some(Action::Retry(id)));

    handle_app_event(&mut state, AppEvent::Retried(id, Outcome::TransportFailed));
    assert_eq!(state.pending, 0);
    assert!(state.message.contains("press R to retry"));

    handle_key_event(key(KeyCode::Char('x')), &mut state).await;
    assert!(state.flashes.is_empty());
}

#[tokio::test]
async fn test_network_actor_retries_after_form_closed() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/api/lists/add")
        .with_status(500)
        .create_async()
        .await;

    let board = Arc::new(TagBoard::new());
    let client = ApiClient::new(&server.url(), "worddb-test", None).unwrap();
    let controller = WordController::new(
        client,
        Overlay::default(),
        FlashBoard::default(),
        board.clone(),
    );
    let (action_tx, action_rx) = tokio::sync::mpsc::channel(8);
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(8);
    let actor = tokio::spawn(run_network_actor(
        controller.clone(),
        "tok".to_string(),
        action_rx,
        event_tx,
    ));

    controller.open_add_list_box().await.unwrap();
    controller.edit_field("label", "greek").await;
    action_tx
        .send(Action::Submit(Endpoint::AddList, None))
        .await
        .unwrap();
    assert_eq!(
        event_rx.recv().await,
        Some(AppEvent::Finished(Endpoint::AddList, Outcome::TransportFailed))
    );
    let id = controller.messages().await[0].id;
    controller.close_box().await;

    failing.remove_async().await;
    let ok = server
        .mock("POST", "/api/lists/add")
        .match_body(mockito::Matcher::UrlEncoded("label".into(), "greek".into()))
        .with_status(200)
        .with_body(r#"{"success": true, "listid": 5}"#)
        .create_async()
        .await;

    action_tx.send(Action::Retry(id)).await.unwrap();
    assert_eq!(
        event_rx.recv().await,
        Some(AppEvent::Retried(id, Outcome::Saved))
    );
    ok.assert_async().await;
    assert_eq!(board.snapshot().list(&ListId::from(5)).unwrap().label, "greek");
    assert!(controller.messages().await.iter().all(|m| m.retry.is_none()));

    action_tx.send(Action::Quit).await.unwrap();
    actor.await.unwrap();
}

#[test]
fn test_options_parse() {
    let opts = Options::parse(
        ["--root", "/tmp/w", "--page", "page.json"]
            .iter()
            .map(|s| s.to_string()),
    )
    .unwrap();
    assert_eq!(opts.root.unwrap().to_str(), Some("/tmp/w"));
    assert_eq!(opts.page.unwrap().to_str(), Some("page.json"));

    assert!(Options::parse(vec!["--page".to_string()]).is_err());
    assert!(Options::parse(vec!["--bogus".to_string()]).is_err());
}
