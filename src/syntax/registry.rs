//! Language registry
//!
//! Maps language keys (usually file extensions) to handlers. The registry
//! is append-only: the first handler registered for a key keeps it.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::builtin;
use super::decoration::{DecorationJob, DecorationList};
use super::engine::Highlighter;
use super::lexer::LanguageHandler;
use super::tokens::StyleTag;
use crate::error::Result;

/// Key of the fallback lexer for code
pub const DEFAULT_CODE: &str = "default-code";
/// Key of the fallback lexer for markup
pub const DEFAULT_MARKUP: &str = "default-markup";

static LOOKS_LIKE_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<").expect("markup sniffing pattern is valid"));

/// Used when not even the default handlers are registered
struct PlainText;

impl LanguageHandler for PlainText {
    fn decorate(&self, job: &DecorationJob<'_>, _: &Highlighter) -> Result<DecorationList> {
        Ok(DecorationList::starting_at(job.base, StyleTag::Plain))
    }
}

/// Language key to handler mapping
pub struct LanguageRegistry {
    handlers: HashMap<String, Arc<dyn LanguageHandler>>,
    plain: Arc<dyn LanguageHandler>,
}

impl LanguageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            plain: Arc::new(PlainText),
        }
    }

    /// Create a registry holding the built-in languages
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        builtin::register_all(&mut registry)?;
        Ok(registry)
    }

    /// Register a handler under each of `keys`.
    ///
    /// Keys that are already bound keep their handler; they are logged and
    /// returned.
    pub fn register<H>(&mut self, handler: H, keys: &[&str]) -> Vec<String>
    where
        H: LanguageHandler + 'static,
    {
        self.register_shared(Arc::new(handler), keys)
    }

    /// Register an already shared handler under each of `keys`
    pub fn register_shared(&mut self, handler: Arc<dyn LanguageHandler>, keys: &[&str]) -> Vec<String> {
        let mut rejected = Vec::new();
        for &key in keys {
            if self.handlers.contains_key(key) {
                warn!(key, "cannot override language handler");
                rejected.push(key.to_string());
            } else {
                self.handlers.insert(key.to_string(), Arc::clone(&handler));
            }
        }
        rejected
    }

    /// Check whether a key is bound
    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Find the handler for `key`.
    ///
    /// Unknown or missing keys fall back to the markup lexer when `sample`
    /// starts with `<` (ignoring whitespace), and to the code lexer
    /// otherwise. Always returns a usable handler.
    pub fn lookup(&self, key: Option<&str>, sample: &str) -> Arc<dyn LanguageHandler> {
        if let Some(handler) = key.filter(|k| !k.is_empty()).and_then(|k| self.handlers.get(k)) {
            return Arc::clone(handler);
        }

        let fallback = if LOOKS_LIKE_MARKUP.is_match(sample) {
            DEFAULT_MARKUP
        } else {
            DEFAULT_CODE
        };
        debug!(key = key.unwrap_or(""), fallback, "no handler for language key");

        self.handlers
            .get(fallback)
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::clone(&self.plain))
    }

    /// Language key for a file, based on its extension
    pub fn detect_language(&self, filename: &Path) -> Option<String> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.contains(&ext).then_some(ext)
    }

    /// List registered keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::SimpleLexer;
    use crate::syntax::pattern::RulePattern;
    use crate::syntax::rules::TokenRule;

    fn single_style(style: StyleTag) -> SimpleLexer {
        SimpleLexer::new(vec![], vec![TokenRule::new(style, RulePattern::new(r"^[\s\S]+")).unwrap()]).unwrap()
    }

    fn style_of(registry: LanguageRegistry, key: Option<&str>, source: &str) -> Option<StyleTag> {
        let handler = registry.lookup(key, source);
        let highlighter = Highlighter::with_registry(registry);
        let job = DecorationJob::new(source, 0);
        handler
            .decorate(&job, &highlighter)
            .unwrap()
            .simplified(job.end())
            .style_at(0)
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = LanguageRegistry::new();
        assert!(registry.register(single_style(StyleTag::Keyword), &["x", "y"]).is_empty());
        let rejected = registry.register(single_style(StyleTag::Comment), &["y", "z"]);
        assert_eq!(rejected, vec!["y".to_string()]);
        assert!(registry.contains("z"));
        assert_eq!(style_of(registry, Some("y"), "abc"), Some(StyleTag::Keyword));
    }

    #[test]
    fn test_fallback_sniffs_markup() {
        let mut registry = LanguageRegistry::new();
        registry.register(single_style(StyleTag::Tag), &[DEFAULT_MARKUP]);
        registry.register(single_style(StyleTag::Literal), &[DEFAULT_CODE]);
        assert_eq!(style_of(registry, None, "  <b>x</b>"), Some(StyleTag::Tag));

        let mut registry = LanguageRegistry::new();
        registry.register(single_style(StyleTag::Tag), &[DEFAULT_MARKUP]);
        registry.register(single_style(StyleTag::Literal), &[DEFAULT_CODE]);
        assert_eq!(style_of(registry, Some("nope"), "x < y"), Some(StyleTag::Literal));
    }

    #[test]
    fn test_empty_key_falls_back() {
        let mut registry = LanguageRegistry::new();
        registry.register(single_style(StyleTag::Literal), &[DEFAULT_CODE]);
        assert_eq!(style_of(registry, Some(""), "x"), Some(StyleTag::Literal));
    }

    #[test]
    fn test_empty_registry_still_decorates() {
        assert_eq!(style_of(LanguageRegistry::new(), Some("js"), "x"), Some(StyleTag::Plain));
    }

    #[test]
    fn test_detect_language() {
        let registry = LanguageRegistry::with_builtins().unwrap();
        assert_eq!(registry.detect_language(Path::new("main.rs")), Some("rs".to_string()));
        assert_eq!(registry.detect_language(Path::new("Test.PY")), Some("py".to_string()));
        assert_eq!(registry.detect_language(Path::new("index.html")), Some("html".to_string()));
        assert_eq!(registry.detect_language(Path::new("notes.txt")), None);
        assert_eq!(registry.detect_language(Path::new("Makefile")), None);
    }
}
