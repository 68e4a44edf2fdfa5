// File: ./src/overlay.rs
//! The edit-form overlay and its backdrop.
//!
//! There is a single overlay slot. It is either `Closed` or holds exactly one
//! open session; opening while a session is open is refused instead of
//! stacking a second form. Word and list forms share this one state machine,
//! they only differ by template and by which hidden id they carry.
//!
//! The backdrop is visible exactly while a session is open, so closing any
//! form always hides it.
use crate::config::Config;
use crate::field_info::{FieldHint, HintChange, LookupTemplate};
use crate::model::{ListId, ListView, WordId, WordView};
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

pub const WORD_FIELDS: [&str; 3] = ["word", "meaning", "origin"];
pub const LIST_FIELDS: [&str; 2] = ["label", "description"];
/// Field whose value drives the lookup hint.
pub const LOOKUP_FIELD: &str = "word";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OverlayKind {
    #[strum(serialize = "add word")]
    AddWord,
    #[strum(serialize = "edit word")]
    EditWord,
    #[strum(serialize = "add list")]
    AddList,
    #[strum(serialize = "edit list")]
    EditList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Word,
    List,
}

impl OverlayKind {
    pub fn subject(&self) -> Subject {
        match self {
            OverlayKind::AddWord | OverlayKind::EditWord => Subject::Word,
            OverlayKind::AddList | OverlayKind::EditList => Subject::List,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, OverlayKind::EditWord | OverlayKind::EditList)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub multiline: bool,
}

impl FieldSpec {
    fn new(name: &str, label: &str, multiline: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            multiline,
        }
    }
}

/// Markup-free description of one form: title, fields in display order and
/// the field focused on open. Fields missing from a template read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxTemplate {
    pub title: String,
    pub fields: Vec<FieldSpec>,
    pub focus: String,
}

fn word_box(title: &str) -> BoxTemplate {
    BoxTemplate {
        title: title.to_string(),
        fields: vec![
            FieldSpec::new("word", "Word", false),
            FieldSpec::new("meaning", "Meaning", true),
            FieldSpec::new("origin", "Origin", false),
        ],
        focus: "word".to_string(),
    }
}

fn list_box(title: &str) -> BoxTemplate {
    BoxTemplate {
        title: title.to_string(),
        fields: vec![
            FieldSpec::new("label", "Label", false),
            FieldSpec::new("description", "Description", true),
        ],
        focus: "label".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayTemplates {
    pub add_word: BoxTemplate,
    pub edit_word: BoxTemplate,
    pub add_list: BoxTemplate,
    pub edit_list: BoxTemplate,
}

impl Default for OverlayTemplates {
    fn default() -> Self {
        Self {
            add_word: word_box("Add word"),
            edit_word: word_box("Edit word"),
            add_list: list_box("New list"),
            edit_list: list_box("Edit list"),
        }
    }
}

impl OverlayTemplates {
    pub fn get(&self, kind: OverlayKind) -> &BoxTemplate {
        match kind {
            OverlayKind::AddWord => &self.add_word,
            OverlayKind::EditWord => &self.edit_word,
            OverlayKind::AddList => &self.add_list,
            OverlayKind::EditList => &self.edit_list,
        }
    }
}

/// Hidden id carried by an edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Word(WordId),
    List(ListId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySession {
    pub kind: OverlayKind,
    /// Assigned on open, unique per `Overlay`. Tells a reopened form of the
    /// same kind apart from the one a request was read from.
    pub generation: u64,
    pub title: String,
    pub target: Option<Target>,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub hint: Option<FieldHint>,
}

impl OverlaySession {
    fn from_template(kind: OverlayKind, template: &BoxTemplate) -> Self {
        let fields: Vec<FormField> = template
            .fields
            .iter()
            .map(|spec| FormField {
                spec: spec.clone(),
                value: String::new(),
            })
            .collect();
        let focus = fields
            .iter()
            .position(|f| f.spec.name == template.focus)
            .unwrap_or(0);
        Self {
            kind,
            generation: 0,
            title: template.title.clone(),
            target: None,
            fields,
            focus,
            hint: None,
        }
    }

    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.spec.name == name)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    fn set_raw(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.spec.name == name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn word_id(&self) -> Option<&WordId> {
        match &self.target {
            Some(Target::Word(id)) => Some(id),
            _ => None,
        }
    }

    pub fn list_id(&self) -> Option<&ListId> {
        match &self.target {
            Some(Target::List(id)) => Some(id),
            _ => None,
        }
    }

    pub fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Open(Box<OverlaySession>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverlayError {
    #[error("An edit box is already open ({0})")]
    AlreadyOpen(OverlayKind),
}

#[derive(Debug, Clone)]
pub struct Overlay {
    state: OverlayState,
    generation: u64,
    templates: OverlayTemplates,
    lookup: LookupTemplate,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(OverlayTemplates::default(), LookupTemplate::default())
    }
}

impl Overlay {
    pub fn new(templates: OverlayTemplates, lookup: LookupTemplate) -> Self {
        Self {
            state: OverlayState::Closed,
            generation: 0,
            templates,
            lookup,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.templates.clone(), LookupTemplate::from_config(config))
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn session(&self) -> Option<&OverlaySession> {
        match &self.state {
            OverlayState::Open(session) => Some(session),
            OverlayState::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut OverlaySession> {
        match &mut self.state {
            OverlayState::Open(session) => Some(session),
            OverlayState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, OverlayState::Open(_))
    }

    pub fn backdrop_visible(&self) -> bool {
        self.is_open()
    }

    fn open(&mut self, mut session: OverlaySession) -> Result<(), OverlayError> {
        if let OverlayState::Open(current) = &self.state {
            log::debug!("refusing to open {}: {} is open", session.kind, current.kind);
            return Err(OverlayError::AlreadyOpen(current.kind));
        }
        self.generation += 1;
        session.generation = self.generation;
        log::debug!("opening {} box #{}", session.kind, session.generation);
        self.state = OverlayState::Open(Box::new(session));
        Ok(())
    }

    fn blank(&self, kind: OverlayKind) -> OverlaySession {
        OverlaySession::from_template(kind, self.templates.get(kind))
    }

    pub fn open_add_word(&mut self) -> Result<(), OverlayError> {
        let session = self.blank(OverlayKind::AddWord);
        self.open(session)
    }

    /// Opens the word form pre-filled from `word`. An empty meaning shows the
    /// lookup hint straight away.
    pub fn open_edit_word(&mut self, word: &WordView) -> Result<(), OverlayError> {
        let mut session = self.blank(OverlayKind::EditWord);
        session.set_raw("word", &word.word);
        session.set_raw("meaning", &word.meaning);
        session.set_raw("origin", &word.origin);
        session.target = Some(Target::Word(word.id.clone()));

        if session.value("meaning").is_empty() {
            let current = session.value(LOOKUP_FIELD).to_string();
            self.lookup.apply(&mut session.hint, &current);
        }
        self.open(session)
    }

    pub fn open_add_list(&mut self) -> Result<(), OverlayError> {
        let session = self.blank(OverlayKind::AddList);
        self.open(session)
    }

    pub fn open_edit_list(&mut self, list: &ListView) -> Result<(), OverlayError> {
        let mut session = self.blank(OverlayKind::EditList);
        session.set_raw("label", &list.label);
        session.set_raw("description", &list.description);
        session.target = Some(Target::List(list.id.clone()));
        self.open(session)
    }

    /// User edit of one field. Returns `None` when no form is open or the form
    /// has no such field; otherwise what happened to the lookup hint.
    pub fn set_field(&mut self, name: &str, value: &str) -> Option<HintChange> {
        let OverlayState::Open(session) = &mut self.state else {
            return None;
        };
        if !session.set_raw(name, value) {
            return None;
        }
        if name == LOOKUP_FIELD && session.kind.subject() == Subject::Word {
            return Some(self.lookup.apply(&mut session.hint, value));
        }
        Some(HintChange::Unchanged)
    }

    /// Removes the form and hides the backdrop. Closing with nothing open is a no-op.
    pub fn close(&mut self) -> Option<OverlaySession> {
        match std::mem::take(&mut self.state) {
            OverlayState::Open(session) => {
                log::debug!("closing {} box", session.kind);
                Some(*session)
            }
            OverlayState::Closed => None,
        }
    }

    /// Closes only if the open session satisfies `pred`. A form the user
    /// replaced while a request was in flight stays open.
    pub fn close_if<F: FnOnce(&OverlaySession) -> bool>(&mut self, pred: F) -> Option<OverlaySession> {
        match self.session() {
            Some(session) if pred(session) => self.close(),
            _ => None,
        }
    }
}
