//! Picker is the matching, paging and thumbnail engine behind a dmenu-style item picker.
//!
//! It takes a list of entries (each optionally carrying an image path), filters and ranks
//! them against a live query, exposes the visible page of results together with a selection
//! cursor, and keeps a freedesktop-compatible thumbnail cache for the selected entry's image.
//! Drawing, windowing and keyboard handling are left to the embedding frontend.
//!
//! # Examples
//!
//! ```
//! use picker::prelude::*;
//! use std::io::Cursor;
//!
//! let store = ItemStore::from_bufread(Cursor::new("apple\nApple Pie\nsnapple\ngrape")).unwrap();
//! let options = PickerOptionsBuilder::default()
//!     .case(CaseMatching::Ignore)
//!     .lines(10)
//!     .build()
//!     .unwrap();
//!
//! let mut picker = Picker::from_options(&options, store);
//! picker.set_query("app");
//! assert_eq!(picker.matched_texts(), vec!["apple", "Apple Pie", "snapple"]);
//!
//! picker.handle(Action::Down);
//! assert_eq!(picker.selected_text(), Some("Apple Pie"));
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

use std::borrow::Cow;

pub use crate::engine::exact::ExactEngine;
pub use crate::event::Action;
pub use crate::input::Input;
pub use crate::item::{Entry, ItemStore, MatchedItem};
pub use crate::item_list::{CellWidth, ItemList, Layout, TextWidth, Viewport, Window, compute_window};
pub use crate::matcher::{Matcher, compute_matches};
pub use crate::options::{ImageSize, PickerOptions};
pub use crate::output::Outcome;
pub use crate::session::Picker;
pub use crate::thumbnail::{Thumbnail, ThumbnailCache, ThumbnailError};

mod engine;
pub mod event;
pub mod input;
pub mod item;
pub mod item_list;
pub mod matcher;
pub mod options;
mod output;
pub mod prelude;
pub mod session;
pub mod thumbnail;

//==============================================================================
// Matching modes and results

#[derive(Eq, PartialEq, Debug, Copy, Clone, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", clap(rename_all = "snake_case"))]
/// Case sensitivity mode for matching, chosen once per session
pub enum CaseMatching {
    /// Case-sensitive matching
    #[default]
    Respect,
    /// Case-insensitive matching
    Ignore,
}

impl CaseMatching {
    /// Folds `text` into the form used for comparison under this mode.
    ///
    /// Lowercases one char at a time, regardless of its neighbours.
    pub fn fold<'a>(self, text: &'a str) -> Cow<'a, str> {
        match self {
            CaseMatching::Respect => Cow::Borrowed(text),
            CaseMatching::Ignore => Cow::Owned(text.chars().flat_map(char::to_lowercase).collect()),
        }
    }
}

/// Coarse match-quality bucket, ordered from best to worst
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub enum MatchTier {
    /// The text equals the first query token (or the query is empty)
    Exact,
    /// The text starts with the first query token
    Prefix,
    /// The text contains the first query token elsewhere
    Substring,
}
