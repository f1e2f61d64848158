//! Actions a frontend can feed into a [`crate::Picker`] session.
//!
//! Actions describe navigation and editing intents, independently of the key or button
//! that triggered them. They can be serialized, so a frontend may script a session.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on a picker session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Abort without output
    Abort,
    /// Accept the selected entry, or the raw query if nothing is selected
    Accept,
    /// Accept the raw query text, ignoring the selection
    AcceptQuery,
    /// Emit the selected entry, mark it as excluded and keep the session open
    AcceptKeep,
    /// Add a character to the query
    AddChar(char),
    /// Move the caret backward one character, or the selection in flow layout
    BackwardChar,
    /// Delete character before the caret
    BackwardDeleteChar,
    /// Move the caret to the start of the query, or the selection to the first entry
    BeginningOfLine,
    /// Replace the query with the selected entry's text
    Complete,
    /// Delete character under the caret
    DeleteChar,
    /// Move the selection down by one entry
    Down,
    /// Move the caret to the end of the query, or the selection to the last entry
    EndOfLine,
    /// Move the caret forward one character, or the selection in flow layout
    ForwardChar,
    /// Insert text at the caret, up to its first newline
    Insert(String),
    /// Delete from the caret to the end of the query
    KillLine,
    /// Show the next page
    PageDown,
    /// Show the previous page
    PageUp,
    /// Delete from the start of the query to the caret
    UnixLineDiscard,
    /// Delete the word before the caret
    UnixWordRubout,
    /// Move the selection up by one entry
    Up,
}

/// Parses an action string (`kebab-case`, optional `:arg`) into an Action
pub fn parse_action(raw_action: &str) -> Option<Action> {
    let (action, arg) = match raw_action.split_once(':') {
        None => (raw_action, None),
        Some((act, a)) => (act, Some(a)),
    };
    trace!("parse_action: action={action}, arg={arg:?}");

    use Action::*;
    match action {
        "abort" | "cancel" => Some(Abort),
        "accept" => Some(Accept),
        "accept-query" => Some(AcceptQuery),
        "accept-keep" => Some(AcceptKeep),
        "add-char" => arg.and_then(|a| a.chars().next()).map(AddChar),
        "backward-char" => Some(BackwardChar),
        "backward-delete-char" => Some(BackwardDeleteChar),
        "beginning-of-line" => Some(BeginningOfLine),
        "complete" => Some(Complete),
        "delete-char" => Some(DeleteChar),
        "down" => Some(Down),
        "end-of-line" => Some(EndOfLine),
        "forward-char" => Some(ForwardChar),
        "insert" => arg.map(|a| Insert(a.to_string())),
        "kill-line" => Some(KillLine),
        "page-down" => Some(PageDown),
        "page-up" => Some(PageUp),
        "unix-line-discard" => Some(UnixLineDiscard),
        "unix-word-rubout" => Some(UnixWordRubout),
        "up" => Some(Up),
        _ => None,
    }
}
