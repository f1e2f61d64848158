//! Item store: the candidate entries of a session, addressed by stable index.
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use crate::MatchTier;

const IMAGE_PREFIX: &str = "IMG:";

//------------------------------------------------------------------------------
/// One candidate line of input.
///
/// The text and image path never change after loading. `excluded` marks an entry that
/// was already emitted during the session; it stays matchable but frontends usually
/// draw it differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    text: Box<str>,
    image: Option<PathBuf>,
    excluded: bool,
}

impl Entry {
    /// Parses one input record of the form `[IMG:<path>\t]<display-text>`
    ///
    /// A line with the prefix but without a tab, or with an empty path, keeps the whole
    /// line as its text and carries no image.
    pub fn parse(line: &str) -> Self {
        let image = line
            .strip_prefix(IMAGE_PREFIX)
            .and_then(|rest| rest.split_once('\t'))
            .filter(|(path, _)| !path.is_empty());

        match image {
            Some((path, text)) => Self {
                text: text.into(),
                image: Some(PathBuf::from(path)),
                excluded: false,
            },
            None => Self::new(line),
        }
    }

    /// Creates a plain entry without image
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            image: None,
            excluded: false,
        }
    }

    /// The display text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The associated image, if any
    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    /// Whether the entry was already emitted in this session
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }
}

//------------------------------------------------------------------------------
/// Append-only ordered collection of entries
#[derive(Debug, Default, Clone)]
pub struct ItemStore {
    entries: Vec<Entry>,
}

impl ItemStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one entry per line until EOF.
    ///
    /// Only the trailing `\n` is stripped. Bytes that are not UTF-8 are replaced, so
    /// every line becomes an entry.
    pub fn from_bufread<R: BufRead>(mut source: R) -> io::Result<Self> {
        let mut store = Self::new();
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if source.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            if buffer.ends_with(b"\n") {
                buffer.pop();
            }
            let line = String::from_utf8_lossy(&buffer);
            trace!("got entry {} with index {}", line, store.len());
            store.push_line(&line);
        }
        debug!(
            "read {} entries, {} with images",
            store.len(),
            store.iter().filter(|e| e.image().is_some()).count()
        );
        Ok(store)
    }

    /// Parses and appends one input record, returning its index
    pub fn push_line(&mut self, line: &str) -> usize {
        self.push(Entry::parse(line))
    }

    /// Appends an entry, returning its index
    pub fn push(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Whether at least one entry carries an image
    pub fn has_images(&self) -> bool {
        self.entries.iter().any(|e| e.image.is_some())
    }

    /// Flags the entry at `index` as already emitted. There is no way back.
    pub fn exclude(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.excluded = true;
        }
    }
}

impl<'a> IntoIterator for &'a ItemStore {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ItemStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut store = Self::new();
        for line in iter {
            store.push_line(line.as_ref());
        }
        store
    }
}

//------------------------------------------------------------------------------
/// An entry that survived matching, with the tier it was ranked into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedItem {
    /// Index of the entry in the store
    pub index: usize,
    /// Match quality bucket
    pub tier: MatchTier,
}
