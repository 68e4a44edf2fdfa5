// File: src/tui/handlers.rs
// Handles keyboard input and network events for the TUI.
use crate::controller::Outcome;
use crate::model::{Endpoint, list_page_path};
use crate::overlay::{OverlayKind, Subject};
use crate::tui::action::{Action, AppEvent, Focus};
use crate::tui::state::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    state.pending = state.pending.saturating_sub(1);
    match event {
        AppEvent::Finished(endpoint, outcome) => state.message = describe(endpoint, &outcome),
        AppEvent::Retried(id, outcome) => {
            state.message = format!("Retry of message {}: {}", id, outcome_word(&outcome));
        }
        AppEvent::Error(s) => state.message = format!("Error: {}", s),
    }
}

fn outcome_word(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Saved => "saved".to_string(),
        Outcome::Rejected(n) => format!("rejected ({} error(s))", n),
        Outcome::TransportFailed => "server unreachable, press R to retry".to_string(),
    }
}

fn describe(endpoint: Endpoint, outcome: &Outcome) -> String {
    format!("{}: {}", endpoint, outcome_word(outcome))
}

/// Endpoint a form is submitted to, or removed through.
pub fn submit_endpoint(kind: OverlayKind) -> Endpoint {
    match kind {
        OverlayKind::AddWord => Endpoint::AddWord,
        OverlayKind::EditWord => Endpoint::ChangeWord,
        OverlayKind::AddList => Endpoint::AddList,
        OverlayKind::EditList => Endpoint::ChangeList,
    }
}

pub fn remove_endpoint(kind: OverlayKind) -> Option<Endpoint> {
    match kind {
        OverlayKind::EditWord => Some(Endpoint::RemoveWord),
        OverlayKind::EditList => Some(Endpoint::RemoveList),
        OverlayKind::AddWord | OverlayKind::AddList => None,
    }
}

pub async fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    let action = if state.overlay.is_some() {
        handle_overlay_key(key, state).await
    } else {
        handle_normal_key(key, state).await
    };
    state.sync().await;
    action
}

async fn handle_normal_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('?') => state.show_full_help = !state.show_full_help,
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => state.toggle_focus(),
        KeyCode::Down | KeyCode::Char('j') => state.next(),
        KeyCode::Up | KeyCode::Char('k') => state.previous(),

        KeyCode::Char('a') if state.active_focus == Focus::Words => {
            if state.selected_list().is_none() {
                state.message = "Select a list first.".to_string();
            } else {
                let result = state.controller.open_add_word_box().await;
                report(state, result);
            }
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            let result = state.controller.open_add_list_box().await;
            report(state, result);
        }
        KeyCode::Char('e') | KeyCode::Enter => match state.active_focus {
            Focus::Lists => {
                if let Some(list) = state.selected_list().cloned() {
                    let result = state.controller.open_edit_list_box(&list).await;
                    report(state, result);
                }
            }
            Focus::Words => {
                if let Some(word) = state.selected_word().cloned() {
                    let result = state.controller.open_edit_word_box(&word).await;
                    report(state, result);
                }
            }
        },

        KeyCode::Char('g') => {
            if let Some(list) = state.selected_list() {
                state.message = format!(
                    "List page: {}{}",
                    state.controller.client.base_url(),
                    list_page_path(&list.label)
                );
            }
        }
        KeyCode::Char('x') => {
            if let Some(id) = state.flashes.last().map(|m| m.id) {
                state.controller.dismiss_message(id).await;
            }
        }
        KeyCode::Char('R') => return retry_latest(state),
        _ => {}
    }
    None
}

async fn handle_overlay_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let (kind, multiline) = {
        let session = state.overlay.as_ref()?;
        let multiline = session.focused().is_some_and(|f| f.spec.multiline);
        (session.kind, multiline)
    };

    match key.code {
        KeyCode::Esc => {
            state.controller.close_box().await;
        }
        KeyCode::Tab | KeyCode::Down => {
            if let Some(session) = state.controller.overlay.lock().await.session_mut() {
                session.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(session) = state.controller.overlay.lock().await.session_mut() {
                session.focus_prev();
            }
        }
        KeyCode::Char('s') if ctrl => return submit(state, submit_endpoint(kind)),
        KeyCode::Char('r') if ctrl => return retry_latest(state),
        KeyCode::Char('d') if ctrl => {
            return match remove_endpoint(kind) {
                Some(endpoint) => submit(state, endpoint),
                None => {
                    state.message = "Nothing to remove yet.".to_string();
                    None
                }
            };
        }
        KeyCode::Enter if multiline => edit_focused(state, |v| v.push('\n')).await,
        KeyCode::Enter => return submit(state, submit_endpoint(kind)),
        KeyCode::Backspace => {
            edit_focused(state, |v| {
                v.pop();
            })
            .await
        }
        KeyCode::Char(c) if !ctrl && !c.is_control() => {
            edit_focused(state, |v| v.push(c)).await
        }
        _ => {}
    }
    None
}

/// Resends the newest failed request. Works with or without an open form.
fn retry_latest(state: &mut AppState) -> Option<Action> {
    match state.latest_retryable().map(|m| m.id) {
        Some(id) => {
            state.pending += 1;
            state.message = "Retrying...".to_string();
            Some(Action::Retry(id))
        }
        None => {
            state.message = "Nothing to retry.".to_string();
            None
        }
    }
}

fn submit(state: &mut AppState, endpoint: Endpoint) -> Option<Action> {
    let parent = match state.overlay.as_ref().map(|s| s.kind.subject()) {
        Some(Subject::Word) => match state.selected_list_id() {
            Some(id) => Some(id),
            None => {
                state.message = "Select a list first.".to_string();
                return None;
            }
        },
        _ => None,
    };
    state.pending += 1;
    state.message = format!("Sending {}...", endpoint);
    Some(Action::Submit(endpoint, parent))
}

async fn edit_focused<F: FnOnce(&mut String)>(state: &mut AppState, f: F) {
    let focused = {
        let overlay = state.controller.overlay.lock().await;
        overlay
            .session()
            .and_then(|s| s.focused())
            .map(|field| (field.spec.name.clone(), field.value.clone()))
    };
    if let Some((name, mut value)) = focused {
        f(&mut value);
        state.controller.edit_field(&name, &value).await;
    }
}

fn report<E: std::fmt::Display>(state: &mut AppState, result: Result<(), E>) {
    if let Err(e) = result {
        state.message = e.to_string();
    }
}
