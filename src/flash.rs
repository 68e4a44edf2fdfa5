// File: ./src/flash.rs
//! Timed flash messages.
//!
//! Messages stack in insertion order and each one disappears on its own after
//! its delay, or earlier when the user dismisses it. There is no cap and no
//! deduplication. Time is always passed in by the caller so the board never
//! reads the clock itself.
use crate::config::{Config, DEFAULT_FLASH_DELAY_MS};
use crate::controller::Submission;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub const BACKGROUND: &str = "background";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
    /// The request never produced a usable reply. Carries a retry handle.
    Transport,
}

/// Style overrides applied to a single message (`background`, `color`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashStyle(BTreeMap<String, String>);

impl FlashStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn background(&self) -> Option<&str> {
        self.get(BACKGROUND)
    }

    /// `self` on top of `preset`: keys present in both keep `self`'s value.
    pub fn merged_over(&self, preset: &FlashStyle) -> FlashStyle {
        let mut out = preset.0.clone();
        out.extend(self.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        FlashStyle(out)
    }
}

/// Everything needed to send a failed request again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryRequest {
    pub submission: Submission,
    pub csrf_token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlashMessage {
    pub id: u64,
    pub text: String,
    pub kind: FlashKind,
    pub style: FlashStyle,
    pub shown_at: Instant,
    pub delay: Duration,
    pub retry: Option<RetryRequest>,
}

impl FlashMessage {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + self.delay
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

#[derive(Debug, Clone)]
pub struct FlashBoard {
    messages: Vec<FlashMessage>,
    next_id: u64,
    default_delay: Duration,
    error_style: FlashStyle,
}

impl Default for FlashBoard {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_FLASH_DELAY_MS), "#F60018")
    }
}

impl FlashBoard {
    pub fn new(default_delay: Duration, error_background: &str) -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            default_delay,
            error_style: FlashStyle::new().with(BACKGROUND, error_background),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.flash_delay(), &config.error_background)
    }

    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    fn push(
        &mut self,
        text: &str,
        kind: FlashKind,
        style: FlashStyle,
        delay: Option<Duration>,
        retry: Option<RetryRequest>,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        // A zero delay falls back to the default, like an unset one.
        let delay = delay
            .filter(|d| !d.is_zero())
            .unwrap_or(self.default_delay);
        self.messages.push(FlashMessage {
            id,
            text: text.to_string(),
            kind,
            style,
            shown_at: now,
            delay,
            retry,
        });
        id
    }

    /// Shows `text` with optional style overrides and delay. Returns the message id.
    pub fn show(
        &mut self,
        text: &str,
        style: Option<FlashStyle>,
        delay: Option<Duration>,
        now: Instant,
    ) -> u64 {
        self.push(text, FlashKind::Info, style.unwrap_or_default(), delay, None, now)
    }

    /// Same as [`show`](Self::show) with the error background preset underneath
    /// the caller's overrides.
    pub fn show_error(
        &mut self,
        text: &str,
        style: Option<FlashStyle>,
        delay: Option<Duration>,
        now: Instant,
    ) -> u64 {
        let style = style.unwrap_or_default().merged_over(&self.error_style);
        self.push(text, FlashKind::Error, style, delay, None, now)
    }

    pub fn show_transport_error(&mut self, text: &str, retry: RetryRequest, now: Instant) -> u64 {
        let style = self.error_style.clone();
        self.push(text, FlashKind::Transport, style, None, Some(retry), now)
    }

    /// User dismissal ("click"). Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) -> Option<FlashMessage> {
        let pos = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(pos))
    }

    /// Drops every message whose delay has elapsed at `now`. Returns how many went away.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.is_expired(now));
        before - self.messages.len()
    }

    pub fn messages(&self) -> &[FlashMessage] {
        &self.messages
    }

    pub fn get(&self, id: u64) -> Option<&FlashMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn latest_retryable(&self) -> Option<&FlashMessage> {
        self.messages.iter().rev().find(|m| m.retry.is_some())
    }
}
