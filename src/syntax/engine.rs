//! Decoration engine
//!
//! Drives language handlers over source text. Every region handed to a
//! handler, whether the top-level document or an embedded piece, is a
//! recovery boundary: if decorating it fails, the failure is logged and
//! the region is left plain.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::decoration::{DecorationJob, DecorationList};
use super::lexer::LanguageHandler;
use super::registry::LanguageRegistry;
use super::tokens::StyleTag;
use crate::error::Result;

static LINE_ENDINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?").expect("line ending pattern is valid"));
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\r\n]+").expect("whitespace pattern is valid"));

/// Normalise whitespace before decoration.
///
/// Preformatted text only has its line endings unified to `\n`; other text
/// has each whitespace run collapsed to a single space. In both cases one
/// trailing newline is dropped.
pub fn normalize_source(text: &str, preformatted: bool) -> Cow<'_, str> {
    let normalized = if preformatted {
        LINE_ENDINGS.replace_all(text, "\n")
    } else {
        WHITESPACE_RUNS.replace_all(text, " ")
    };
    match normalized {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_suffix('\n').unwrap_or(s)),
        Cow::Owned(mut s) => {
            if s.ends_with('\n') {
                s.pop();
            }
            Cow::Owned(s)
        }
    }
}

/// Decorated source: the text that was actually decorated and its runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub source: String,
    pub decorations: DecorationList,
}

impl Highlighted {
    /// Iterate `(text, style)` pieces of the source
    pub fn spans(&self) -> impl Iterator<Item = (&str, StyleTag)> + '_ {
        self.decorations
            .runs(self.source.len())
            .map(|(range, style)| (&self.source[range], style))
    }
}

/// Highlighter: a language registry plus the decoration driver
#[derive(Debug)]
pub struct Highlighter {
    registry: LanguageRegistry,
}

impl Highlighter {
    /// A highlighter knowing the built-in languages
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(LanguageRegistry::with_builtins()?))
    }

    pub fn with_registry(registry: LanguageRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LanguageRegistry {
        &mut self.registry
    }

    /// Decorate `source` as the given language, returning the simplified
    /// run list. Unknown languages are guessed from the source.
    pub fn decorate(&self, source: &str, language: Option<&str>) -> DecorationList {
        let mut decorations = DecorationList::new();
        if source.is_empty() {
            return decorations;
        }

        let handler = self.registry.lookup(language, source);
        let mut job = DecorationJob::new(source, 0);
        if let Some(language) = language {
            job = job.with_language(language);
        }
        self.append_decorations(handler.as_ref(), job, &mut decorations);
        decorations.simplified(source.len())
    }

    /// Normalise `text`, then decorate it
    pub fn highlight(&self, text: &str, language: Option<&str>, preformatted: bool) -> Highlighted {
        let source = normalize_source(text, preformatted).into_owned();
        let decorations = self.decorate(&source, language);
        Highlighted { source, decorations }
    }

    /// Run `handler` over one region and append its raw decorations.
    ///
    /// Empty regions add nothing. A failing region is styled plain from
    /// its base offset and decoration carries on.
    pub fn append_decorations(
        &self,
        handler: &dyn LanguageHandler,
        job: DecorationJob<'_>,
        out: &mut DecorationList,
    ) {
        if job.source.is_empty() {
            return;
        }
        match handler.decorate(&job, self) {
            Ok(decorations) => out.extend(decorations),
            Err(err) => {
                warn!(
                    base = job.base,
                    len = job.source.len(),
                    language = job.language.unwrap_or(""),
                    error = %err,
                    "decoration failed, leaving region plain"
                );
                out.push(job.base, StyleTag::Plain);
            }
        }
    }
}
