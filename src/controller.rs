// File: src/controller.rs
//! Word and list workflows.
//!
//! Every UI layer goes through `WordController`: it owns the overlay slot and
//! the flash board, talks to the API and forwards accepted changes to the tag
//! display. Each of the six operations reads the open form, sends one POST and
//! then either closes the form (success), shows the server's validation
//! errors (rejection) or shows a retryable transport error. Nothing is
//! changed before the server answers.
use crate::client::{ApiClient, ApiError};
use crate::config::Config;
use crate::field_info::HintChange;
use crate::flash::{FlashBoard, FlashMessage, RetryRequest};
use crate::model::{ApiReply, Endpoint, ListEntry, ListId, ListView, WordEntry, WordView};
use crate::overlay::{
    LIST_FIELDS, Overlay, OverlayError, OverlayKind, OverlaySession, WORD_FIELDS,
};
use crate::tags::TagSink;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("No edit box is open")]
    NoOverlay,

    #[error("The open box is '{open}', expected '{expected}'")]
    WrongOverlay {
        open: OverlayKind,
        expected: OverlayKind,
    },

    #[error("A word operation needs the id of its list")]
    MissingList,

    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("No retryable message with id {0}")]
    UnknownRetry(u64),

    #[error(transparent)]
    Client(#[from] ApiError),
}

/// What a submitted operation ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Success message shown, tag display notified, form closed.
    Saved,
    /// One error message shown per validation error; form left open.
    Rejected(usize),
    /// No usable reply; form left open and a retryable message shown.
    TransportFailed,
}

/// Form kind each endpoint reads from.
fn expected_kind(endpoint: Endpoint) -> OverlayKind {
    match endpoint {
        Endpoint::AddWord => OverlayKind::AddWord,
        Endpoint::ChangeWord | Endpoint::RemoveWord => OverlayKind::EditWord,
        Endpoint::AddList => OverlayKind::AddList,
        Endpoint::ChangeList | Endpoint::RemoveList => OverlayKind::EditList,
    }
}

fn fallback_text(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::AddWord => "Word added.",
        Endpoint::ChangeWord => "Word saved.",
        Endpoint::RemoveWord => "Word removed.",
        Endpoint::AddList => "List created.",
        Endpoint::ChangeList => "List saved.",
        Endpoint::RemoveList => "List removed.",
    }
}

/// Values captured from the form at submit time. Kept with a transport-error
/// message so a retry does not depend on the form still being open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub endpoint: Endpoint,
    pub kind: OverlayKind,
    /// Generation of the session the values were read from.
    pub generation: u64,
    pub fields: Vec<(&'static str, String)>,
    pub word: Option<WordEntry>,
    pub list: Option<ListEntry>,
}

impl Submission {
    fn collect(
        session: &OverlaySession,
        endpoint: Endpoint,
        parent: Option<&ListId>,
    ) -> Result<Self, ControllerError> {
        let expected = expected_kind(endpoint);
        if session.kind != expected {
            return Err(ControllerError::WrongOverlay {
                open: session.kind,
                expected,
            });
        }

        let mut fields: Vec<(&'static str, String)> = Vec::new();
        let mut word = None;
        let mut list = None;

        match endpoint {
            Endpoint::AddWord | Endpoint::ChangeWord | Endpoint::RemoveWord => {
                let parent = parent.ok_or(ControllerError::MissingList)?;
                let wordid = session.word_id().cloned();
                if endpoint != Endpoint::RemoveWord {
                    for name in WORD_FIELDS {
                        fields.push((name, session.value(name).to_string()));
                    }
                }
                if endpoint != Endpoint::AddWord {
                    fields.push((
                        "wordid",
                        wordid.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                    ));
                }
                fields.push(("listid", parent.to_string()));
                word = Some(WordEntry {
                    wordid,
                    listid: parent.clone(),
                    word: session.value("word").to_string(),
                    meaning: session.value("meaning").to_string(),
                    origin: session.value("origin").to_string(),
                });
            }
            Endpoint::AddList | Endpoint::ChangeList | Endpoint::RemoveList => {
                let listid = session.list_id().cloned();
                if endpoint != Endpoint::RemoveList {
                    for name in LIST_FIELDS {
                        fields.push((name, session.value(name).to_string()));
                    }
                }
                if endpoint != Endpoint::AddList {
                    fields.push((
                        "listid",
                        listid.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                    ));
                }
                list = Some(ListEntry {
                    listid,
                    label: session.value("label").to_string(),
                    description: session.value("description").to_string(),
                });
            }
        }

        Ok(Self {
            endpoint,
            kind: session.kind,
            generation: session.generation,
            fields,
            word,
            list,
        })
    }
}

#[derive(Clone)]
pub struct WordController {
    pub client: ApiClient,
    pub overlay: Arc<Mutex<Overlay>>,
    pub flash: Arc<Mutex<FlashBoard>>,
    pub tags: Arc<dyn TagSink>,
}

impl WordController {
    pub fn new(
        client: ApiClient,
        overlay: Overlay,
        flash: FlashBoard,
        tags: Arc<dyn TagSink>,
    ) -> Self {
        Self {
            client,
            overlay: Arc::new(Mutex::new(overlay)),
            flash: Arc::new(Mutex::new(flash)),
            tags,
        }
    }

    pub fn from_config(config: &Config, tags: Arc<dyn TagSink>) -> Result<Self, ControllerError> {
        let client = ApiClient::from_config(config)?;
        Ok(Self::new(
            client,
            Overlay::from_config(config),
            FlashBoard::from_config(config),
            tags,
        ))
    }

    // --- OVERLAY ---

    pub async fn open_add_word_box(&self) -> Result<(), ControllerError> {
        Ok(self.overlay.lock().await.open_add_word()?)
    }

    pub async fn open_edit_word_box(&self, word: &WordView) -> Result<(), ControllerError> {
        Ok(self.overlay.lock().await.open_edit_word(word)?)
    }

    pub async fn open_add_list_box(&self) -> Result<(), ControllerError> {
        Ok(self.overlay.lock().await.open_add_list()?)
    }

    pub async fn open_edit_list_box(&self, list: &ListView) -> Result<(), ControllerError> {
        Ok(self.overlay.lock().await.open_edit_list(list)?)
    }

    /// Closes whichever form is open. No-op when none is.
    pub async fn close_box(&self) -> bool {
        self.overlay.lock().await.close().is_some()
    }

    pub async fn edit_field(&self, name: &str, value: &str) -> Option<HintChange> {
        self.overlay.lock().await.set_field(name, value)
    }

    pub async fn current_box(&self) -> Option<OverlaySession> {
        self.overlay.lock().await.session().cloned()
    }

    // --- FLASH MESSAGES ---

    pub async fn messages(&self) -> Vec<FlashMessage> {
        self.flash.lock().await.messages().to_vec()
    }

    /// Drops messages whose delay has run out.
    pub async fn tick(&self) -> usize {
        self.flash.lock().await.expire(Instant::now())
    }

    pub async fn dismiss_message(&self, id: u64) -> bool {
        self.flash.lock().await.dismiss(id).is_some()
    }

    // --- WORDS ---

    pub async fn add_word(&self, parent: &ListId, csrf_token: &str) -> Result<Outcome, ControllerError> {
        self.submit(Endpoint::AddWord, Some(parent), csrf_token).await
    }

    pub async fn update_word(&self, parent: &ListId, csrf_token: &str) -> Result<Outcome, ControllerError> {
        self.submit(Endpoint::ChangeWord, Some(parent), csrf_token).await
    }

    pub async fn remove_word(&self, parent: &ListId, csrf_token: &str) -> Result<Outcome, ControllerError> {
        self.submit(Endpoint::RemoveWord, Some(parent), csrf_token).await
    }

    // --- LISTS ---

    pub async fn add_list(&self, csrf_token: &str) -> Result<Outcome, ControllerError> {
        self.submit(Endpoint::AddList, None, csrf_token).await
    }

    pub async fn update_list(&self, csrf_token: &str) -> Result<Outcome, ControllerError> {
        self.submit(Endpoint::ChangeList, None, csrf_token).await
    }

    pub async fn remove_list(&self, csrf_token: &str) -> Result<Outcome, ControllerError> {
        self.submit(Endpoint::RemoveList, None, csrf_token).await
    }

    /// Sends the request behind a transport-error message again, with the
    /// values captured when it first failed. Works whether or not a form is
    /// open; the message goes away once a reply arrives.
    pub async fn retry(&self, flash_id: u64) -> Result<Outcome, ControllerError> {
        let request = self
            .flash
            .lock()
            .await
            .get(flash_id)
            .and_then(|m| m.retry.clone())
            .ok_or(ControllerError::UnknownRetry(flash_id))?;

        log::info!("retrying {}", request.submission.endpoint);
        let outcome = self.send(request.submission, &request.csrf_token).await;
        self.flash.lock().await.dismiss(flash_id);
        Ok(outcome)
    }

    /// Runs `endpoint` against the open form. The six named operations wrap this.
    pub async fn submit(
        &self,
        endpoint: Endpoint,
        parent: Option<&ListId>,
        csrf_token: &str,
    ) -> Result<Outcome, ControllerError> {
        let submission = {
            let overlay = self.overlay.lock().await;
            let session = overlay.session().ok_or(ControllerError::NoOverlay)?;
            Submission::collect(session, endpoint, parent)?
        };
        Ok(self.send(submission, csrf_token).await)
    }

    async fn send(&self, submission: Submission, csrf_token: &str) -> Outcome {
        let endpoint = submission.endpoint;
        // The overlay lock is released while the request is in flight.
        let result = self
            .client
            .post_form(endpoint, &submission.fields, csrf_token)
            .await;
        let now = Instant::now();

        match result {
            Ok(reply) if reply.success => {
                let text = reply.text.as_deref().unwrap_or(fallback_text(endpoint));
                self.flash.lock().await.show(text, None, None, now);
                self.notify_tags(&submission, &reply);
                // Only the form these values came from; one opened since stays.
                self.overlay
                    .lock()
                    .await
                    .close_if(|s| s.generation == submission.generation);
                log::info!("{} accepted", endpoint);
                Outcome::Saved
            }
            Ok(reply) => {
                let mut flash = self.flash.lock().await;
                for error in &reply.errors {
                    flash.show_error(error, None, None, now);
                }
                log::info!("{} rejected with {} error(s)", endpoint, reply.errors.len());
                Outcome::Rejected(reply.errors.len())
            }
            Err(e) => {
                log::warn!("{} failed: {}", endpoint, e);
                let retry = RetryRequest {
                    submission,
                    csrf_token: csrf_token.to_string(),
                };
                self.flash
                    .lock()
                    .await
                    .show_transport_error(&e.user_message(), retry, now);
                Outcome::TransportFailed
            }
        }
    }

    fn notify_tags(&self, submission: &Submission, reply: &ApiReply) {
        match (submission.endpoint, &submission.word, &submission.list) {
            (Endpoint::AddWord, Some(word), _) => {
                let mut word = word.clone();
                word.wordid = reply.wordid.clone();
                self.tags.add_word_tag(&word);
            }
            (Endpoint::ChangeWord, Some(word), _) => self.tags.update_word_tag(word),
            (Endpoint::RemoveWord, Some(word), _) => self.tags.remove_word_tag(word),
            (Endpoint::AddList, _, Some(list)) => {
                let mut list = list.clone();
                list.listid = reply.listid.clone();
                self.tags.add_list_tag(&list);
            }
            (Endpoint::ChangeList, _, Some(list)) => self.tags.update_list_tag(list),
            (Endpoint::RemoveList, _, Some(list)) => self.tags.remove_list_tag(list),
            _ => {}
        }
    }
}
