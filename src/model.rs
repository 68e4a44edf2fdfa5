// File: ./src/model.rs
//! Typed records exchanged with the words/lists API and the view models the
//! overlay is populated from.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum::{Display, IntoStaticStr};

/// Form field carrying the CSRF token in every POST.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Server ids arrive as JSON numbers from the API but as strings from
/// rendered markup, so both are accepted and kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Text(String),
}

fn id_from_raw<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

macro_rules! record_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                id_from_raw(deserializer).map(Self)
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                Self(n.to_string())
            }
        }
    };
}

record_id!(WordId);
record_id!(ListId);

/// The six mutating endpoints of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Endpoint {
    #[strum(serialize = "/api/words/add")]
    AddWord,
    #[strum(serialize = "/api/words/change")]
    ChangeWord,
    #[strum(serialize = "/api/words/remove")]
    RemoveWord,
    #[strum(serialize = "/api/lists/add")]
    AddList,
    #[strum(serialize = "/api/lists/change")]
    ChangeList,
    #[strum(serialize = "/api/lists/remove")]
    RemoveList,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        self.into()
    }
}

/// JSON body returned by every endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiReply {
    pub success: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub wordid: Option<WordId>,
    #[serde(default)]
    pub listid: Option<ListId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rendered word, as the page shows it in its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordView {
    #[serde(rename = "wordid")]
    pub id: WordId,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub origin: String,
}

/// Rendered list, as the page shows it in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    #[serde(rename = "listid")]
    pub id: ListId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// A word as handed to the tag display after the server accepted a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub wordid: Option<WordId>,
    pub listid: ListId,
    pub word: String,
    pub meaning: String,
    pub origin: String,
}

impl WordEntry {
    pub fn view(&self) -> Option<WordView> {
        Some(WordView {
            id: self.wordid.clone()?,
            word: self.word.clone(),
            meaning: self.meaning.clone(),
            origin: self.origin.clone(),
        })
    }
}

/// A list as handed to the tag display after the server accepted a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub listid: Option<ListId>,
    pub label: String,
    pub description: String,
}

impl ListEntry {
    pub fn view(&self) -> Option<ListView> {
        Some(ListView {
            id: self.listid.clone()?,
            label: self.label.clone(),
            description: self.description.clone(),
        })
    }
}

/// Path of a list's own page.
pub fn list_page_path(label: &str) -> String {
    format!("/lists/{}", urlencoding::encode(label))
}

/// A list together with its words, as the server renders a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageList {
    #[serde(flatten)]
    pub list: ListView,
    #[serde(default)]
    pub words: Vec<WordView>,
}

/// Seed data for the tag display: what the server rendered when the page loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub lists: Vec<PageList>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_accepts_numeric_and_text_ids() {
        let r: ApiReply =
            serde_json::from_str(r#"{"success": true, "text": "ok", "wordid": 42}"#).unwrap();
        assert_eq!(r.wordid, Some(WordId::from(42)));
        assert!(r.errors.is_empty());

        let r: ApiReply = serde_json::from_str(r#"{"success": true, "listid": "7"}"#).unwrap();
        assert_eq!(r.listid.unwrap().as_str(), "7");
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::AddWord.path(), "/api/words/add");
        assert_eq!(Endpoint::RemoveList.path(), "/api/lists/remove");
        assert_eq!(Endpoint::ChangeList.to_string(), "/api/lists/change");
    }

    #[test]
    fn list_page_path_is_encoded() {
        assert_eq!(list_page_path("my words"), "/lists/my%20words");
    }
}
