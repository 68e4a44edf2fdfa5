// Defines actions and events for TUI interaction and state updates.
use crate::controller::Outcome;
use crate::model::{Endpoint, ListId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Lists,
    Words,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Send the open form to `Endpoint`; word endpoints carry their list.
    Submit(Endpoint, Option<ListId>),
    Retry(u64),
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum AppEvent {
    Finished(Endpoint, Outcome),
    Retried(u64, Outcome),
    Error(String),
}
