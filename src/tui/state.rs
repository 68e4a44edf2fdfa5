// File: ./src/tui/state.rs
// Manages the application state for the TUI.
use crate::controller::WordController;
use crate::flash::{FlashKind, FlashMessage};
use crate::model::{ListId, ListView, WordView};
use crate::overlay::OverlaySession;
use crate::tags::{TagBoard, TagSnapshot};
use crate::tui::action::Focus;
use ratatui::widgets::ListState;
use std::sync::Arc;

pub struct AppState {
    // Data
    pub controller: WordController,
    pub board: Arc<TagBoard>,

    // Mirrors of the controller, refreshed by `sync`
    pub tags: TagSnapshot,
    pub overlay: Option<OverlaySession>,
    pub flashes: Vec<FlashMessage>,

    // UI State
    pub list_state: ListState,
    pub word_state: ListState,
    pub active_focus: Focus,
    pub message: String,
    pub show_full_help: bool,
    pub pending: usize,
}

impl AppState {
    pub fn new(controller: WordController, board: Arc<TagBoard>) -> Self {
        let tags = board.snapshot();
        let mut list_state = ListState::default();
        list_state.select((!tags.lists.is_empty()).then_some(0));
        let mut word_state = ListState::default();
        word_state.select(Some(0));

        let mut state = Self {
            controller,
            board,
            tags,
            overlay: None,
            flashes: Vec::new(),
            list_state,
            word_state,
            active_focus: Focus::Lists,
            message: "Ready.".to_string(),
            show_full_help: false,
            pending: 0,
        };
        state.clamp_selection();
        state
    }

    /// Pulls overlay, flash messages and tags from the controller.
    pub async fn sync(&mut self) {
        self.overlay = self.controller.current_box().await;
        self.flashes = self.controller.messages().await;
        self.tags = self.board.snapshot();
        self.clamp_selection();
    }

    pub fn selected_list(&self) -> Option<&ListView> {
        self.list_state
            .selected()
            .and_then(|i| self.tags.lists.get(i))
    }

    pub fn selected_list_id(&self) -> Option<ListId> {
        self.selected_list().map(|l| l.id.clone())
    }

    pub fn visible_words(&self) -> &[WordView] {
        match self.selected_list() {
            Some(list) => self.tags.words_of(&list.id),
            None => &[],
        }
    }

    pub fn selected_word(&self) -> Option<&WordView> {
        self.word_state
            .selected()
            .and_then(|i| self.visible_words().get(i))
    }

    /// Newest transport-error message, the one `R` retries.
    pub fn latest_retryable(&self) -> Option<&FlashMessage> {
        self.flashes
            .iter()
            .rev()
            .find(|m| m.kind == FlashKind::Transport && m.retry.is_some())
    }

    pub fn next(&mut self) {
        match self.active_focus {
            Focus::Lists => {
                step(&mut self.list_state, self.tags.lists.len(), 1);
                self.word_state.select(Some(0));
            }
            Focus::Words => {
                let len = self.visible_words().len();
                step(&mut self.word_state, len, 1);
            }
        }
        self.clamp_selection();
    }

    pub fn previous(&mut self) {
        match self.active_focus {
            Focus::Lists => {
                step(&mut self.list_state, self.tags.lists.len(), -1);
                self.word_state.select(Some(0));
            }
            Focus::Words => {
                let len = self.visible_words().len();
                step(&mut self.word_state, len, -1);
            }
        }
        self.clamp_selection();
    }

    pub fn toggle_focus(&mut self) {
        self.active_focus = match self.active_focus {
            Focus::Lists => Focus::Words,
            Focus::Words => Focus::Lists,
        };
    }

    fn clamp_selection(&mut self) {
        clamp(&mut self.list_state, self.tags.lists.len());
        let words = self.visible_words().len();
        clamp(&mut self.word_state, words);
    }
}

fn step(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = (current + delta).rem_euclid(len as isize);
    state.select(Some(next as usize));
}

fn clamp(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        let current = state.selected().unwrap_or(0);
        state.select(Some(current.min(len - 1)));
    }
}
