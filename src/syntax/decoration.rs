//! Decoration lists
//!
//! A decoration list is run-length encoded: each entry says "from this
//! offset up to the next entry's offset, apply this style". The last run
//! ends at the end of the decorated source.

use std::ops::Range;

use super::tokens::StyleTag;

/// Start of a styled run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    /// Byte offset into the decorated source
    pub pos: usize,
    pub style: StyleTag,
}

impl Decoration {
    pub fn new(pos: usize, style: StyleTag) -> Self {
        Self { pos, style }
    }
}

/// One unit of decoration work: a piece of source and where it sits in
/// the document being decorated.
#[derive(Debug, Clone, Copy)]
pub struct DecorationJob<'a> {
    pub source: &'a str,
    /// Offset of `source` within the top-level document
    pub base: usize,
    /// Language key the job was dispatched under, if any
    pub language: Option<&'a str>,
}

impl<'a> DecorationJob<'a> {
    pub fn new(source: &'a str, base: usize) -> Self {
        Self {
            source,
            base,
            language: None,
        }
    }

    pub fn with_language(mut self, language: &'a str) -> Self {
        self.language = Some(language);
        self
    }

    /// Absolute offset just past the end of this job's source
    pub fn end(&self) -> usize {
        self.base + self.source.len()
    }
}

/// Ordered list of style runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationList {
    entries: Vec<Decoration>,
}

impl DecorationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list with a single run starting at `pos`
    pub fn starting_at(pos: usize, style: StyleTag) -> Self {
        Self {
            entries: vec![Decoration::new(pos, style)],
        }
    }

    pub fn push(&mut self, pos: usize, style: StyleTag) {
        debug_assert!(self.entries.last().map_or(true, |last| last.pos <= pos));
        self.entries.push(Decoration::new(pos, style));
    }

    /// Append a list decorated further along the same document
    pub fn extend(&mut self, other: DecorationList) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.entries.iter()
    }

    /// Collapse to the minimal equivalent list.
    ///
    /// `end` is the absolute offset where the decorated source ends. Runs
    /// with no width are dropped first, then neighbouring runs with the
    /// same style are merged.
    pub fn simplify(&mut self, end: usize) {
        let entries = std::mem::take(&mut self.entries);

        let mut widened: Vec<Decoration> = Vec::with_capacity(entries.len());
        for (i, decoration) in entries.iter().enumerate() {
            let next = entries.get(i + 1).map_or(end, |next| next.pos);
            if decoration.pos != next {
                widened.push(*decoration);
            }
        }

        for decoration in widened {
            match self.entries.last() {
                Some(last) if last.style == decoration.style => {}
                _ => self.entries.push(decoration),
            }
        }
    }

    /// Consuming form of [`DecorationList::simplify`]
    pub fn simplified(mut self, end: usize) -> Self {
        self.simplify(end);
        self
    }

    /// Iterate runs as `(range, style)`, the last one ending at `end`
    pub fn runs(&self, end: usize) -> impl Iterator<Item = (Range<usize>, StyleTag)> + '_ {
        self.entries.iter().enumerate().map(move |(i, decoration)| {
            let run_end = self.entries.get(i + 1).map_or(end, |next| next.pos);
            (decoration.pos..run_end, decoration.style)
        })
    }

    /// Style in effect at `pos`, if any run covers it
    pub fn style_at(&self, pos: usize) -> Option<StyleTag> {
        let idx = self.entries.partition_point(|d| d.pos <= pos);
        idx.checked_sub(1).map(|i| self.entries[i].style)
    }
}

impl<'a> IntoIterator for &'a DecorationList {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(usize, StyleTag)> for DecorationList {
    fn from_iter<I: IntoIterator<Item = (usize, StyleTag)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(pos, style)| Decoration::new(pos, style))
                .collect(),
        }
    }
}
