//! Text Normalization
//!
//! Reduces a raw selection to the single lookup term sent to the native host.

use crate::ipc::LookupRequest;
use thiserror::Error;

/// The selection held no word characters; dropped without telling the user
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("selection contains no word characters")]
pub struct Rejected;

/// Letters, digits and underscore
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Normalize selected text into a lookup request.
///
/// Multi-word selections keep only their first word.
pub fn normalize(selection_text: &str) -> Result<LookupRequest, Rejected> {
    let first = selection_text.split_whitespace().next().unwrap_or("");
    let word: String = first.chars().filter(|c| is_word_char(*c)).collect();

    if word.is_empty() {
        return Err(Rejected);
    }
    Ok(LookupRequest::new(word))
}
