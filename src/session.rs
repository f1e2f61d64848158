//! The picker session: owns the entries, the query, the ranked matches and the preview.
//!
//! A frontend feeds [`Action`]s to [`Picker::handle`] one at a time and redraws from the
//! accessors afterwards. Nothing here blocks except thumbnail lookups, which only happen
//! when [`Picker::thumbnail`] is asked for a selection it has not seen yet.
use std::path::PathBuf;

use crate::event::Action;
use crate::input::Input;
use crate::item::{Entry, ItemStore, MatchedItem};
use crate::item_list::{CellWidth, ItemList, Layout, TextWidth, Viewport, Window};
use crate::matcher::Matcher;
use crate::options::{ImageSize, PickerOptions};
use crate::output::Outcome;
use crate::thumbnail::{Thumbnail, ThumbnailCache};

/// Width left for entries in the single-line layout of a `menu_width` wide menu.
///
/// The prompt, the query field and both page arrows are taken off first. The query
/// field is as wide as the widest entry, up to a third of the menu. All widths include
/// the measure's padding.
pub fn flow_width(menu_width: usize, prompt: &str, store: &ItemStore, measure: &dyn TextWidth) -> usize {
    let prompt_width = if prompt.is_empty() { 0 } else { measure.padded_width(prompt) };
    let input_width = store
        .iter()
        .map(|entry| measure.padded_width(entry.text()))
        .max()
        .unwrap_or(0)
        .min(menu_width / 3);
    menu_width.saturating_sub(prompt_width + input_width + measure.padded_width("<") + measure.padded_width(">"))
}

struct Preview {
    image: PathBuf,
    thumbnail: Option<Thumbnail>,
}

/// One interactive picking session
pub struct Picker {
    store: ItemStore,
    matcher: Matcher,
    list: ItemList,
    input: Input,
    layout: Layout,
    measure: Box<dyn TextWidth>,
    thumbnails: Option<ThumbnailCache>,
    image_size: ImageSize,
    preview: Option<Preview>,
}

impl Picker {
    /// Starts a session over `store`, measuring text in terminal cells
    pub fn from_options(options: &PickerOptions, store: ItemStore) -> Self {
        Self::new(options, store, Box::new(CellWidth))
    }

    /// Starts a session over `store` with a custom text measure.
    ///
    /// Matches the empty query and preselects `options.select_index`.
    pub fn new(options: &PickerOptions, store: ItemStore, measure: Box<dyn TextWidth>) -> Self {
        let layout = if options.lines > 0 {
            Layout::Lines(options.lines)
        } else {
            Layout::Flow(flow_width(options.width, &options.prompt, &store, measure.as_ref()))
        };
        let thumbnails = (store.has_images() && !options.image_size.is_empty()).then(ThumbnailCache::new);
        debug!(
            "picker: {} entries, layout {layout:?}, thumbnails {}",
            store.len(),
            if thumbnails.is_some() { "on" } else { "off" }
        );

        let mut picker = Self {
            store,
            matcher: Matcher::from_options(options),
            list: ItemList::new(options.cycle),
            input: Input::new(options.query_capacity),
            layout,
            measure,
            thumbnails,
            image_size: options.image_size,
            preview: None,
        };
        picker.rematch();
        let select_index = options.select_index;
        picker.with_list(|list, viewport| list.jump_to_index(select_index, viewport));
        picker
    }

    /// Replaces the thumbnail cache. Ignored when no entry has an image.
    pub fn with_thumbnail_cache(mut self, cache: ThumbnailCache) -> Self {
        if self.store.has_images() && !self.image_size.is_empty() {
            self.thumbnails = Some(cache);
            self.preview = None;
        }
        self
    }

    fn with_list<R>(&mut self, f: impl FnOnce(&mut ItemList, &Viewport) -> R) -> R {
        let viewport = Viewport::new(self.layout, &self.store, self.measure.as_ref());
        f(&mut self.list, &viewport)
    }

    fn rematch(&mut self) {
        if let Some(matches) = self.matcher.run(&self.store, self.input.as_str()) {
            self.with_list(|list, viewport| list.set_items(matches, viewport));
        }
    }

    fn is_flow(&self) -> bool {
        matches!(self.layout, Layout::Flow(_))
    }

    /// Applies one action
    pub fn handle(&mut self, action: Action) -> Outcome {
        use Action::*;
        trace!("handle action: {action:?}");

        let edited = match action {
            Abort => return Outcome::Abort,
            Accept => return Outcome::Accept(self.selected_text().unwrap_or(self.query()).to_string()),
            AcceptQuery => return Outcome::Accept(self.query().to_string()),
            AcceptKeep => {
                let line = self.selected_text().unwrap_or(self.query()).to_string();
                if let Some(selected) = self.list.selected() {
                    self.store.exclude(selected.index);
                }
                return Outcome::Emit(line);
            }
            AddChar(c) => self.input.insert(c),
            Insert(text) => self.input.paste(&text),
            BackwardDeleteChar => self.input.delete_backward().is_some(),
            DeleteChar => self.input.delete_forward().is_some(),
            KillLine => !self.input.kill_line().is_empty(),
            UnixLineDiscard => !self.input.unix_line_discard().is_empty(),
            UnixWordRubout => !self.input.unix_word_rubout().is_empty(),
            Complete => match self.selected_text() {
                Some(text) => {
                    let text = text.to_string();
                    self.input.set(&text);
                    true
                }
                None => false,
            },
            BackwardChar => {
                if !self.input.at_start() && (!self.list.has_previous() || !self.is_flow()) {
                    self.input.move_cursor(-1);
                } else if self.is_flow() {
                    self.with_list(|list, viewport| list.select_previous(viewport));
                }
                false
            }
            ForwardChar => {
                if !self.input.at_end() {
                    self.input.move_cursor(1);
                } else if self.is_flow() {
                    self.with_list(|list, viewport| list.select_next(viewport));
                }
                false
            }
            BeginningOfLine => {
                if self.list.is_empty() || self.list.at_head() {
                    self.input.move_to_start();
                } else {
                    self.with_list(|list, viewport| list.jump_to_first(viewport));
                }
                false
            }
            EndOfLine => {
                if !self.input.at_end() {
                    self.input.move_to_end();
                } else {
                    self.with_list(|list, viewport| list.jump_to_last(viewport));
                }
                false
            }
            Up => {
                self.with_list(|list, viewport| list.select_previous(viewport));
                false
            }
            Down => {
                self.with_list(|list, viewport| list.select_next(viewport));
                false
            }
            PageUp => {
                self.with_list(|list, viewport| list.page_up(viewport));
                false
            }
            PageDown => {
                self.with_list(|list, viewport| list.page_down(viewport));
                false
            }
        };

        if edited {
            self.rematch();
        }
        Outcome::Continue
    }

    /// Replaces the query and re-runs matching
    pub fn set_query(&mut self, query: &str) {
        self.input.set(query);
        self.rematch();
    }

    /// Switches the layout, keeping the selected match selected
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        let n = self.list.selected_pos().map_or(0, |pos| pos + 1);
        self.with_list(|list, viewport| list.jump_to_index(n, viewport));
    }

    /// The current layout
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The query text
    pub fn query(&self) -> &str {
        self.input.as_str()
    }

    /// The query line, with its caret
    pub fn input(&self) -> &Input {
        &self.input
    }

    /// All entries
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// The selected entry
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.list.selected().and_then(|m| self.store.get(m.index))
    }

    /// Text of the selected entry
    pub fn selected_text(&self) -> Option<&str> {
        self.selected_entry().map(Entry::text)
    }

    /// Position of the selection in the match list
    pub fn selected_pos(&self) -> Option<usize> {
        self.list.selected_pos()
    }

    /// Number of matches
    pub fn matched_count(&self) -> usize {
        self.list.count()
    }

    /// Texts of all matches, in rank order
    pub fn matched_texts(&self) -> Vec<&str> {
        self.list
            .items()
            .iter()
            .filter_map(|m| self.store.get(m.index))
            .map(Entry::text)
            .collect()
    }

    /// Matches on the current page
    pub fn visible(&self) -> &[MatchedItem] {
        self.list.visible()
    }

    /// Entries on the current page, each with whether it is selected
    pub fn visible_entries(&self) -> impl Iterator<Item = (&Entry, bool)> {
        let selected = self.list.selected();
        self.list
            .visible()
            .iter()
            .filter_map(move |m| self.store.get(m.index).map(|entry| (entry, Some(*m) == selected)))
    }

    /// The current window over the match list
    pub fn window(&self) -> Window {
        self.list.window()
    }

    /// Thumbnail of the selected entry's image.
    ///
    /// Resolved again only when the selected image changes; `None` when the selection has
    /// no image, thumbnails are off, or the image could not be loaded.
    pub fn thumbnail(&mut self) -> Option<&Thumbnail> {
        let cache = self.thumbnails.as_ref()?;
        let Some(image) = self.selected_entry().and_then(Entry::image).map(|p| p.to_path_buf()) else {
            self.preview = None;
            return None;
        };

        if self.preview.as_ref().is_none_or(|preview| preview.image != image) {
            let thumbnail = cache.resolve(&image, self.image_size);
            self.preview = Some(Preview { image, thumbnail });
        }
        self.preview.as_ref().and_then(|preview| preview.thumbnail.as_ref())
    }

    /// Fills the thumbnail cache for every entry's image. Returns how many were resolved.
    pub fn pregenerate_thumbnails(&self) -> usize {
        match &self.thumbnails {
            Some(cache) => cache.pregenerate(self.store.iter().filter_map(Entry::image), self.image_size),
            None => 0,
        }
    }
}
