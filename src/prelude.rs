//! Convenience re-exports of commonly used types.
//!
//! This module provides a convenient way to import all the commonly used
//! picker types and traits with a single `use picker::prelude::*;` statement.

pub use crate::event::{Action, parse_action};
pub use crate::item_list::{CellWidth, Layout, TextWidth};
pub use crate::options::{ImageSize, PickerOptions, PickerOptionsBuilder};
pub use crate::output::Outcome;
pub use crate::thumbnail::{ImageCodec, Thumbnail, ThumbnailCache};
pub use crate::*;
