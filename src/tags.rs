// File: ./src/tags.rs
//! The visible lists and words ("tags") that successful API calls update.
use crate::model::{ListEntry, ListId, ListView, PageSnapshot, WordEntry, WordId, WordView};
use std::collections::BTreeMap;
use std::sync::RwLock;

pub const NO_TAGS_MESSAGE: &str = "This list has no words yet.";

/// Receives accepted changes so the display can reflect them.
///
/// Called only after the server confirmed the change; never speculatively.
pub trait TagSink: Send + Sync + std::fmt::Debug {
    fn add_word_tag(&self, word: &WordEntry);
    fn update_word_tag(&self, word: &WordEntry);
    fn remove_word_tag(&self, word: &WordEntry);
    fn add_list_tag(&self, list: &ListEntry);
    fn update_list_tag(&self, list: &ListEntry);
    fn remove_list_tag(&self, list: &ListEntry);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    pub lists: Vec<ListView>,
    pub words: BTreeMap<ListId, Vec<WordView>>,
}

impl TagSnapshot {
    pub fn words_of(&self, list: &ListId) -> &[WordView] {
        self.words.get(list).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn list(&self, id: &ListId) -> Option<&ListView> {
        self.lists.iter().find(|l| &l.id == id)
    }

    pub fn find_word(&self, id: &WordId) -> Option<(&ListId, &WordView)> {
        self.words
            .iter()
            .find_map(|(list, words)| words.iter().find(|w| &w.id == id).map(|w| (list, w)))
    }

    /// Message shown in place of an empty list.
    pub fn no_tags_message(&self, list: &ListId) -> Option<&'static str> {
        self.words_of(list).is_empty().then_some(NO_TAGS_MESSAGE)
    }
}

/// In-process tag display backed by a snapshot of the page.
#[derive(Debug, Default)]
pub struct TagBoard {
    inner: RwLock<TagSnapshot>,
}

impl TagBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_page(page: PageSnapshot) -> Self {
        let mut snap = TagSnapshot::default();
        for entry in page.lists {
            snap.words.insert(entry.list.id.clone(), entry.words);
            snap.lists.push(entry.list);
        }
        Self {
            inner: RwLock::new(snap),
        }
    }

    pub fn snapshot(&self) -> TagSnapshot {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn with_mut<F: FnOnce(&mut TagSnapshot)>(&self, f: F) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}

impl TagSink for TagBoard {
    fn add_word_tag(&self, word: &WordEntry) {
        let Some(view) = word.view() else {
            log::warn!("add_word_tag without a word id, ignoring '{}'", word.word);
            return;
        };
        self.with_mut(|snap| {
            snap.words.entry(word.listid.clone()).or_default().push(view);
        });
    }

    fn update_word_tag(&self, word: &WordEntry) {
        let Some(view) = word.view() else {
            return;
        };
        self.with_mut(|snap| {
            let words = snap.words.entry(word.listid.clone()).or_default();
            match words.iter_mut().find(|w| w.id == view.id) {
                Some(existing) => *existing = view,
                None => words.push(view),
            }
        });
    }

    fn remove_word_tag(&self, word: &WordEntry) {
        let Some(id) = &word.wordid else {
            return;
        };
        self.with_mut(|snap| {
            if let Some(words) = snap.words.get_mut(&word.listid) {
                words.retain(|w| &w.id != id);
            }
        });
    }

    fn add_list_tag(&self, list: &ListEntry) {
        let Some(view) = list.view() else {
            log::warn!("add_list_tag without a list id, ignoring '{}'", list.label);
            return;
        };
        self.with_mut(|snap| {
            snap.words.entry(view.id.clone()).or_default();
            snap.lists.push(view);
        });
    }

    fn update_list_tag(&self, list: &ListEntry) {
        let Some(view) = list.view() else {
            return;
        };
        self.with_mut(|snap| match snap.lists.iter_mut().find(|l| l.id == view.id) {
            Some(existing) => *existing = view,
            None => snap.lists.push(view),
        });
    }

    fn remove_list_tag(&self, list: &ListEntry) {
        let Some(id) = &list.listid else {
            return;
        };
        self.with_mut(|snap| {
            snap.lists.retain(|l| &l.id != id);
            snap.words.remove(id);
        });
    }
}
