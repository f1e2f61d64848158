use picker::prelude::*;

/// Text measure where every char is one unit wide and nothing is padded, so a flow page
/// holds exactly as many chars as its budget. `render` separates entries for legibility only.
pub struct CharCount;

impl TextWidth for CharCount {
    fn width(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Starts a session over `items` in a vertical list of `lines` lines
pub fn lines_picker(items: &[&str], lines: usize, cycle: bool) -> Picker {
    let options = PickerOptionsBuilder::default()
        .lines(lines)
        .cycle(cycle)
        .build()
        .unwrap();
    Picker::new(&options, items.iter().collect(), Box::new(CharCount))
}

/// Starts a session over `items` on a single line `width` units wide
pub fn flow_picker(items: &[&str], width: usize, cycle: bool) -> Picker {
    let options = PickerOptionsBuilder::default()
        .width(width)
        .cycle(cycle)
        .build()
        .unwrap();
    Picker::new(&options, items.iter().collect(), Box::new(CharCount))
}

/// Draws the current page: one entry per line with `>` on the selection, or a single
/// line with the selection in brackets and arrows for the neighbouring pages.
pub fn render(picker: &Picker) -> String {
    let window = picker.window();
    match picker.layout() {
        Layout::Lines(_) => picker
            .visible_entries()
            .map(|(entry, selected)| format!("{} {}", if selected { ">" } else { " " }, entry.text()))
            .collect::<Vec<_>>()
            .join("\n"),
        Layout::Flow(_) => {
            let mut parts = Vec::new();
            if window.prev.is_some() {
                parts.push(String::from("<"));
            }
            for (entry, selected) in picker.visible_entries() {
                parts.push(if selected {
                    format!("[{}]", entry.text())
                } else {
                    entry.text().to_string()
                });
            }
            if window.next.is_some() {
                parts.push(String::from(">"));
            }
            parts.join(" ")
        }
    }
}

/// Checks that the selection lies on the visible page and the page is well formed
pub fn assert_window_invariants(picker: &Picker) {
    let window = picker.window();
    let count = picker.matched_count();
    match picker.selected_pos() {
        None => {
            assert_eq!(count, 0);
            assert_eq!(window, Window::default());
        }
        Some(pos) => {
            assert!(pos < count, "selection {pos} out of {count} matches");
            assert!(window.contains(pos), "selection {pos} outside {window:?}");
            let curr = window.curr.unwrap();
            if let Some(next) = window.next {
                assert!(curr < next && next <= count, "bad window {window:?}");
            }
            if let Some(prev) = window.prev {
                assert!(prev < curr, "bad window {window:?}");
            } else {
                assert_eq!(curr, 0, "no previous page but window starts at {curr}");
            }
        }
    }
}

/// Applies each action in turn, checking the window after every step
#[macro_export]
macro_rules! apply {
    ($picker:expr, [$($action:expr),* $(,)?]) => {
        $(
            $picker.handle($action);
            $crate::common::assert_window_invariants(&$picker);
        )*
    };
}

/// Builds a session, applies actions and compares the rendered page.
///
/// ```ignore
/// picker_test!(name, lines(3), ["a", "b"], [Action::Down], "  a\n> b");
/// picker_test!(name, flow(20), ["a", "b"], [Action::Down], "a [b]");
/// ```
#[macro_export]
macro_rules! picker_test {
    ($name:ident, lines($n:expr), $items:expr, [$($action:expr),* $(,)?], $expected:expr) => {
        #[test]
        fn $name() {
            let mut picker = $crate::common::lines_picker(&$items, $n, false);
            $crate::apply!(picker, [$($action),*]);
            assert_eq!($crate::common::render(&picker), $expected);
        }
    };
    ($name:ident, flow($w:expr), $items:expr, [$($action:expr),* $(,)?], $expected:expr) => {
        #[test]
        fn $name() {
            let mut picker = $crate::common::flow_picker(&$items, $w, false);
            $crate::apply!(picker, [$($action),*]);
            assert_eq!($crate::common::render(&picker), $expected);
        }
    };
}
