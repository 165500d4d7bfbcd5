//! Syntax highlighting
//!
//! Source text is split into tokens by regex-driven lexers and decorated
//! with style tags. This module provides:
//! - The pattern compiler that merges token patterns into one tokenizer
//! - Lexers built from shortcut and fallthrough token rules
//! - The language registry and the built-in languages
//! - The decoration engine and its run-length encoded output

mod builtin;
mod decoration;
mod engine;
mod lexer;
mod pattern;
mod registry;
mod rules;
mod source;
mod tokens;

#[cfg(test)]
mod property_tests;

pub use decoration::{Decoration, DecorationJob, DecorationList};
pub use engine::{normalize_source, Highlighted, Highlighter};
pub use lexer::{LanguageHandler, SimpleLexer};
pub use pattern::{
    combine_patterns, combine_patterns_with_limit, combined_source, PatternFlags, RulePattern, BACKTRACK_LIMIT,
};
pub use registry::{LanguageRegistry, DEFAULT_CODE, DEFAULT_MARKUP};
pub use rules::{Resolution, RuleStyle, TokenRule, EMBEDDED_PREFIX};
pub use source::{source_lexer, HashComments, RegexLiterals, SourceOptions, REGEX_LANGUAGE};
pub use tokens::StyleTag;
