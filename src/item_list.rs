//! Paging over the match list: which slice is visible and which entry is selected.
//!
//! The list never stores the page size itself. Each navigation call receives a
//! [`Viewport`] describing the current layout, so the window is recomputed against
//! whatever geometry the frontend has at that moment.
use unicode_display_width::width as display_width;

use crate::item::{ItemStore, MatchedItem};

//------------------------------------------------------------------------------
/// How entries are packed into a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Vertical list of at most this many entries
    Lines(usize),
    /// Single horizontal line, with this many width units for entries
    Flow(usize),
}

/// Measures the width of a text in layout units
pub trait TextWidth {
    /// Width of `text`
    fn width(&self, text: &str) -> usize;

    /// Space drawn around every entry, the arrows and the prompt
    fn padding(&self) -> usize {
        0
    }

    /// Width of `text` as drawn, padding included
    fn padded_width(&self, text: &str) -> usize {
        self.width(text) + self.padding()
    }
}

/// Terminal cell width, accounting for wide and zero-width characters.
///
/// Every drawn text gets one blank cell on each side.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellWidth;

impl TextWidth for CellWidth {
    fn width(&self, text: &str) -> usize {
        display_width(text) as usize
    }

    fn padding(&self) -> usize {
        2
    }
}

/// Page geometry used to cut the match list into windows
#[derive(Clone, Copy)]
pub struct Viewport<'a> {
    /// Current layout
    pub layout: Layout,
    /// Store the matches point into
    pub store: &'a ItemStore,
    /// Text measurement for flow layout
    pub measure: &'a dyn TextWidth,
}

impl<'a> Viewport<'a> {
    /// Creates a viewport
    pub fn new(layout: Layout, store: &'a ItemStore, measure: &'a dyn TextWidth) -> Self {
        Self { layout, store, measure }
    }

    /// Total cost a page may hold
    pub fn budget(&self) -> usize {
        match self.layout {
            Layout::Lines(lines) => lines.max(1),
            Layout::Flow(width) => width,
        }
    }

    /// Cost of the entry at `index` in the store
    pub fn cost(&self, index: usize) -> usize {
        match self.layout {
            Layout::Lines(_) => 1,
            Layout::Flow(width) => self
                .store
                .get(index)
                .map_or(0, |entry| self.measure.padded_width(entry.text()).min(width)),
        }
    }
}

//------------------------------------------------------------------------------
/// Visible page as positions into the match list.
///
/// The page covers `[curr, next)`; `next == None` means it runs to the end of the list.
/// `prev` is where the preceding page starts, `None` on the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    /// Start of the preceding page
    pub prev: Option<usize>,
    /// Start of this page, `None` iff the list is empty
    pub curr: Option<usize>,
    /// Start of the following page
    pub next: Option<usize>,
}

impl Window {
    /// Whether `pos` lies on this page
    pub fn contains(&self, pos: usize) -> bool {
        match self.curr {
            Some(curr) => pos >= curr && self.next.is_none_or(|next| pos < next),
            None => false,
        }
    }
}

/// Cuts the page starting at `curr` out of `matches`.
///
/// Walking forward, the first entry that pushes the accumulated cost over the budget
/// starts the next page. Walking backward, the preceding page is the longest run ending
/// right before `curr` that stays within the budget.
pub fn compute_window(matches: &[MatchedItem], curr: Option<usize>, viewport: &Viewport) -> Window {
    let Some(curr) = curr.filter(|&pos| pos < matches.len()) else {
        return Window::default();
    };
    let budget = viewport.budget();
    let cost = |pos: usize| viewport.cost(matches[pos].index);

    let mut used = 0;
    let mut next = None;
    for pos in curr..matches.len() {
        used += cost(pos);
        if used > budget {
            next = Some(pos);
            break;
        }
    }

    let mut used = 0;
    let mut prev = curr;
    while prev > 0 {
        used += cost(prev - 1);
        if used > budget {
            break;
        }
        prev -= 1;
    }

    Window {
        prev: (curr > 0).then_some(prev),
        curr: Some(curr),
        next,
    }
}

//------------------------------------------------------------------------------
/// The ranked matches together with the visible window and the selection cursor
#[derive(Debug, Default, Clone)]
pub struct ItemList {
    items: Vec<MatchedItem>,
    window: Window,
    current: Option<usize>,
    cycle: bool,
}

impl ItemList {
    /// Creates an empty list. With `cycle`, moving past either end wraps around.
    pub fn new(cycle: bool) -> Self {
        Self {
            cycle,
            ..Self::default()
        }
    }

    /// Replaces the matches and puts both the window and the selection on the first one
    pub fn set_items(&mut self, items: Vec<MatchedItem>, viewport: &Viewport) {
        self.items = items;
        self.reset(viewport);
        debug!("item list: {} items, window {:?}", self.items.len(), self.window);
    }

    /// All matches, in rank order
    pub fn items(&self) -> &[MatchedItem] {
        &self.items
    }

    /// Number of matches
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The current window
    pub fn window(&self) -> Window {
        self.window
    }

    /// Matches on the current page
    pub fn visible(&self) -> &[MatchedItem] {
        match self.window.curr {
            Some(curr) => &self.items[curr..self.window.next.unwrap_or(self.items.len())],
            None => &[],
        }
    }

    /// The selected match
    pub fn selected(&self) -> Option<MatchedItem> {
        self.current.and_then(|pos| self.items.get(pos).copied())
    }

    /// Position of the selection in the match list
    pub fn selected_pos(&self) -> Option<usize> {
        self.current
    }

    /// Whether the selection is the first match
    pub fn at_head(&self) -> bool {
        self.current == Some(0)
    }

    /// Whether the selection has a predecessor
    pub fn has_previous(&self) -> bool {
        self.current.is_some_and(|pos| pos > 0)
    }

    fn reset(&mut self, viewport: &Viewport) {
        self.current = (!self.items.is_empty()).then_some(0);
        self.window = compute_window(&self.items, self.current, viewport);
    }

    fn move_window(&mut self, curr: usize, viewport: &Viewport) {
        self.window = compute_window(&self.items, Some(curr), viewport);
    }

    /// Moves one step forward, turning the page when the selection leaves it.
    /// Returns false at the end of the list.
    fn step_forward(&mut self, viewport: &Viewport) -> bool {
        let Some(pos) = self.current.filter(|&pos| pos + 1 < self.items.len()) else {
            return false;
        };
        let new = pos + 1;
        self.current = Some(new);
        if self.window.next == Some(new) {
            self.move_window(new, viewport);
        }
        true
    }

    /// Lays out the last page so that it ends exactly on the last match
    fn show_last_page(&mut self, viewport: &Viewport) {
        let Some(last) = self.items.len().checked_sub(1) else {
            return;
        };
        self.move_window(last, viewport);
        if let Some(prev) = self.window.prev {
            self.move_window(prev, viewport);
        }
        while self.window.next.is_some() {
            let Some(curr) = self.window.curr else { break };
            self.move_window(curr + 1, viewport);
        }
        self.current = Some(last);
    }

    /// Selects the next match. Past the last one, wraps to the first when cycling.
    pub fn select_next(&mut self, viewport: &Viewport) {
        if !self.step_forward(viewport) && self.cycle {
            trace!("item list: wrapping to the first match");
            self.reset(viewport);
        }
    }

    /// Selects the previous match. Before the first one, wraps to the last when cycling.
    pub fn select_previous(&mut self, viewport: &Viewport) {
        match self.current {
            Some(pos) if pos > 0 => {
                let new = pos - 1;
                self.current = Some(new);
                if Some(new + 1) == self.window.curr
                    && let Some(prev) = self.window.prev
                {
                    self.move_window(prev, viewport);
                }
            }
            _ if self.cycle => {
                trace!("item list: wrapping to the last match");
                self.show_last_page(viewport);
            }
            _ => {}
        }
    }

    /// Shows the next page and selects its first match
    pub fn page_down(&mut self, viewport: &Viewport) {
        if let Some(next) = self.window.next {
            self.current = Some(next);
            self.move_window(next, viewport);
        }
    }

    /// Shows the previous page and selects its first match
    pub fn page_up(&mut self, viewport: &Viewport) {
        if let Some(prev) = self.window.prev {
            self.current = Some(prev);
            self.move_window(prev, viewport);
        }
    }

    /// Shows the first page and selects the first match
    pub fn jump_to_first(&mut self, viewport: &Viewport) {
        self.reset(viewport);
    }

    /// Shows the last page and selects the last match
    pub fn jump_to_last(&mut self, viewport: &Viewport) {
        if self.window.next.is_some() {
            self.show_last_page(viewport);
        }
        self.current = self.items.len().checked_sub(1);
    }

    /// Selects the `n`-th match (1-based), turning pages from the first one as needed.
    /// Values past the end stop on the last match; 0 behaves like 1.
    pub fn jump_to_index(&mut self, n: usize, viewport: &Viewport) {
        self.reset(viewport);
        for _ in 1..n {
            if !self.step_forward(viewport) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchTier;

    fn matches(n: usize) -> Vec<MatchedItem> {
        (0..n)
            .map(|index| MatchedItem {
                index,
                tier: MatchTier::Exact,
            })
            .collect()
    }

    fn store(n: usize) -> ItemStore {
        (0..n).map(|i| format!("item{i}")).collect()
    }

    #[test]
    fn test_compute_window_lines() {
        let store = store(10);
        let viewport = Viewport::new(Layout::Lines(3), &store, &CellWidth);
        let items = matches(10);

        let window = compute_window(&items, Some(0), &viewport);
        assert_eq!(window, Window { prev: None, curr: Some(0), next: Some(3) });

        let window = compute_window(&items, Some(4), &viewport);
        assert_eq!(window, Window { prev: Some(1), curr: Some(4), next: Some(7) });

        let window = compute_window(&items, Some(8), &viewport);
        assert_eq!(window, Window { prev: Some(5), curr: Some(8), next: None });

        assert_eq!(compute_window(&[], Some(0), &viewport), Window::default());
        assert_eq!(compute_window(&items, None, &viewport), Window::default());
    }

    #[test]
    fn test_compute_window_flow() {
        let store: ItemStore = ["aaaa", "bb", "cccccc", "d", "eeeeeeeeeeeeeeee"].into_iter().collect();
        let viewport = Viewport::new(Layout::Flow(12), &store, &CellWidth);
        let items = matches(5);

        // every entry costs two cells of padding on top of its text
        assert_eq!(viewport.cost(0), 6);
        assert_eq!(viewport.cost(4), 12);

        // 6 + 4 fit, 8 more does not
        let window = compute_window(&items, Some(0), &viewport);
        assert_eq!(window.next, Some(2));
        // 8 + 3, then the long entry is clamped to 12 and overflows
        let window = compute_window(&items, Some(2), &viewport);
        assert_eq!(window, Window { prev: Some(0), curr: Some(2), next: Some(4) });
        // an entry wider than the budget still gets a page of its own
        let window = compute_window(&items, Some(4), &viewport);
        assert_eq!(window, Window { prev: Some(2), curr: Some(4), next: None });
    }

    #[test]
    fn test_lines_zero_behaves_as_one() {
        let store = store(3);
        let viewport = Viewport::new(Layout::Lines(0), &store, &CellWidth);
        let window = compute_window(&matches(3), Some(1), &viewport);
        assert_eq!(window, Window { prev: Some(0), curr: Some(1), next: Some(2) });
    }

    #[test]
    fn test_down_turns_page() {
        let store = store(5);
        let viewport = Viewport::new(Layout::Lines(2), &store, &CellWidth);
        let mut list = ItemList::new(false);
        list.set_items(matches(5), &viewport);

        list.select_next(&viewport);
        assert_eq!(list.selected_pos(), Some(1));
        assert_eq!(list.window().curr, Some(0));
        list.select_next(&viewport);
        assert_eq!(list.selected_pos(), Some(2));
        assert_eq!(list.window().curr, Some(2));

        list.select_previous(&viewport);
        assert_eq!(list.selected_pos(), Some(1));
        assert_eq!(list.window().curr, Some(0));
    }

    #[test]
    fn test_no_cycle_stops_at_ends() {
        let store = store(3);
        let viewport = Viewport::new(Layout::Lines(5), &store, &CellWidth);
        let mut list = ItemList::new(false);
        list.set_items(matches(3), &viewport);

        list.select_previous(&viewport);
        assert_eq!(list.selected_pos(), Some(0));
        list.jump_to_index(10, &viewport);
        assert_eq!(list.selected_pos(), Some(2));
        list.select_next(&viewport);
        assert_eq!(list.selected_pos(), Some(2));
    }

    #[test]
    fn test_jump_to_last() {
        let store = store(10);
        let viewport = Viewport::new(Layout::Lines(4), &store, &CellWidth);
        let mut list = ItemList::new(false);
        list.set_items(matches(10), &viewport);

        list.jump_to_last(&viewport);
        assert_eq!(list.selected_pos(), Some(9));
        assert_eq!(list.window(), Window { prev: Some(2), curr: Some(6), next: None });

        list.jump_to_first(&viewport);
        assert_eq!(list.selected_pos(), Some(0));
        assert_eq!(list.window().curr, Some(0));
    }

    #[test]
    fn test_empty_list_is_total() {
        let store = ItemStore::new();
        let viewport = Viewport::new(Layout::Lines(3), &store, &CellWidth);
        let mut list = ItemList::new(true);
        list.set_items(Vec::new(), &viewport);

        list.select_next(&viewport);
        list.select_previous(&viewport);
        list.page_down(&viewport);
        list.page_up(&viewport);
        list.jump_to_last(&viewport);
        list.jump_to_index(3, &viewport);
        assert_eq!(list.selected(), None);
        assert_eq!(list.window(), Window::default());
        assert!(list.visible().is_empty());
    }

    #[test]
    fn test_render_window() {
        let store = store(7);
        let viewport = Viewport::new(Layout::Lines(3), &store, &CellWidth);
        let mut list = ItemList::new(true);
        list.set_items(matches(7), &viewport);
        list.select_previous(&viewport);

        let rendered: Vec<String> = list
            .visible()
            .iter()
            .map(|m| {
                let marker = if list.selected() == Some(*m) { 'x' } else { ' ' };
                format!("[{marker}] {}", store.get(m.index).unwrap().text())
            })
            .collect();
        insta::assert_snapshot!(rendered.join("\n"), @r"
        [ ] item4
        [ ] item5
        [x] item6
        ");
    }
}
