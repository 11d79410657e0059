//! Native Messaging Message Types
//!
//! JSON-serializable messages exchanged between the bridge, the native host
//! and the page context.

use serde::{Deserialize, Serialize};

/// Action tag for requests sent to the native host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Lookup,
}

/// A single-word lookup sent to the native host.
///
/// Only [`crate::core::text_normalizer::normalize`] builds these, so `word` is
/// always non-empty and made of word characters only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupRequest {
    action: Action,
    word: String,
}

impl LookupRequest {
    pub(crate) fn new(word: String) -> Self {
        Self {
            action: Action::Lookup,
            word,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }
}

/// Request sent to the page context to pull the current selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub action: String,
}

impl SelectionRequest {
    pub const GET_SELECTION: &'static str = "getSelection";

    pub fn get_selection() -> Self {
        Self {
            action: Self::GET_SELECTION.to_string(),
        }
    }

    pub fn is_get_selection(&self) -> bool {
        self.action == Self::GET_SELECTION
    }
}

/// Page context reply; `selection` may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub selection: String,
}

/// Reply written by the native host relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HostReply {
    pub fn looked_up(word: &str) -> Self {
        Self {
            success: true,
            word: Some(word.to_string()),
            error: None,
        }
    }

    pub fn failure(error: &str) -> Self {
        Self {
            success: false,
            word: None,
            error: Some(error.to_string()),
        }
    }
}
