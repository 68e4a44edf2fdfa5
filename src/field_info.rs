// File: ./src/field_info.rs
//! Lookup hint shown next to the word field while it is being typed.
use crate::config::Config;
use http::Uri;

pub const WORD_PLACEHOLDER: &str = "{word}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHint {
    pub word: String,
    pub link: String,
    pub host: String,
}

impl FieldHint {
    pub fn text(&self) -> String {
        format!("find meaning of '{}' here ({}).", self.word, self.host)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintChange {
    Unchanged,
    Shown,
    Updated,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTemplate {
    template: String,
}

impl Default for LookupTemplate {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl LookupTemplate {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.lookup_url_template)
    }

    pub fn link(&self, word: &str) -> String {
        self.template
            .replace(WORD_PLACEHOLDER, &urlencoding::encode(word))
    }

    /// Host named in the hint text, without a leading `www.`.
    pub fn host(&self) -> String {
        self.link("x")
            .parse::<Uri>()
            .ok()
            .and_then(|u| u.host().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| self.template.clone())
    }

    pub fn hint(&self, word: &str) -> FieldHint {
        FieldHint {
            word: word.to_string(),
            link: self.link(word),
            host: self.host(),
        }
    }

    /// Brings `current` in line with the field's new `value`.
    ///
    /// No hint and an empty value leaves things alone; an existing hint is
    /// removed once the value empties; any other value shows or refreshes it.
    pub fn apply(&self, current: &mut Option<FieldHint>, value: &str) -> HintChange {
        let word = value.trim();
        match (current.is_some(), word.is_empty()) {
            (false, true) => HintChange::Unchanged,
            (true, true) => {
                *current = None;
                HintChange::Removed
            }
            (had, false) => {
                let hint = self.hint(word);
                if current.as_ref() == Some(&hint) {
                    return HintChange::Unchanged;
                }
                *current = Some(hint);
                if had {
                    HintChange::Updated
                } else {
                    HintChange::Shown
                }
            }
        }
    }
}
