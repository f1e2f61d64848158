//! Configuration options for a picker session.
//!
//! This module provides the `PickerOptions` struct and builder, used both by library
//! callers and (with the `cli` feature) as the command line of the `picker` binary.

use std::fmt;
use std::str::FromStr;

use derive_builder::Builder;
use thiserror::Error;

use crate::CaseMatching;
use crate::input::DEFAULT_CAPACITY;

//------------------------------------------------------------------------------
/// Target box for thumbnails, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// Box width
    pub width: u32,
    /// Box height
    pub height: u32,
}

impl ImageSize {
    /// Creates a box
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square box
    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    /// The longer of both dimensions
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    /// Whether the box has no area
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::square(86)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error returned when an image size is neither `N` nor `WxH`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid image size {0:?}, expected N or WxH")]
pub struct ImageSizeParseError(String);

impl FromStr for ImageSize {
    type Err = ImageSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ImageSizeParseError(s.to_string());
        match s.split_once('x') {
            Some((w, h)) => Ok(Self::new(
                w.trim().parse().map_err(|_| err())?,
                h.trim().parse().map_err(|_| err())?,
            )),
            None => s.trim().parse().map(Self::square).map_err(|_| err()),
        }
    }
}

//------------------------------------------------------------------------------
/// picker - match, page and preview a list of entries
///
/// Reads one entry per line from stdin. A line may carry an image as
/// `IMG:<path><TAB><text>`.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "picker", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct PickerOptions {
    //  --- Search ---
    /// Case sensitivity of the matching
    #[cfg_attr(
        feature = "cli",
        arg(long, value_enum, default_value = "respect", help_heading = "Search")
    )]
    pub case: CaseMatching,

    /// Match case insensitively, shorthand for `--case ignore`
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Search"))]
    pub ignore_case: bool,

    /// Print the ranked matches for this query and exit
    ///
    /// Exits with 0 when something matched, 1 otherwise
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Search"))]
    pub filter: Option<String>,

    /// Maximum length of the query, in bytes
    #[cfg_attr(feature = "cli", arg(skip = DEFAULT_CAPACITY))]
    pub query_capacity: usize,

    //  --- Layout ---
    /// Show entries in a vertical list of this many lines
    ///
    /// 0 packs the entries horizontally on a single line
    #[cfg_attr(feature = "cli", arg(short, long, default_value = "0", help_heading = "Layout"))]
    pub lines: usize,

    /// Width of the menu, in cells, used to pack the single-line layout
    #[cfg_attr(feature = "cli", arg(long, default_value = "80", help_heading = "Layout"))]
    pub width: usize,

    /// Prompt shown left of the query
    #[cfg_attr(feature = "cli", arg(short, long, default_value = "", help_heading = "Layout"))]
    pub prompt: String,

    /// Wrap the selection around at both ends of the list
    #[cfg_attr(feature = "cli", arg(short = 'w', long, help_heading = "Layout"))]
    pub cycle: bool,

    /// Preselect the n-th match (1-based) at startup
    #[cfg_attr(feature = "cli", arg(long, default_value = "0", help_heading = "Layout"))]
    pub select_index: usize,

    //  --- Thumbnails ---
    /// Thumbnail box, either `N` for a square or `WxH`
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "86x86", help_heading = "Thumbnails")
    )]
    pub image_size: ImageSize,

    /// Generate thumbnails for every entry while loading
    ///
    /// Only boxes up to 256 pixels are cached
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Thumbnails"))]
    pub generate_cache: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            case: CaseMatching::default(),
            ignore_case: false,
            filter: None,
            query_capacity: DEFAULT_CAPACITY,
            lines: 0,
            width: 80,
            prompt: String::new(),
            cycle: false,
            select_index: 0,
            image_size: ImageSize::default(),
            generate_cache: false,
        }
    }
}

impl PickerOptionsBuilder {
    /// Builds the PickerOptions from the builder
    pub fn build(&mut self) -> Result<PickerOptions, PickerOptionsBuilderError> {
        self.final_build().map(|opts| opts.build())
    }
}

impl PickerOptions {
    /// Finalizes the options by folding shorthand flags into their long form
    pub fn build(mut self) -> Self {
        if self.ignore_case {
            self.case = CaseMatching::Ignore;
        }
        self
    }
}
