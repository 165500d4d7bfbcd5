//! Style tags for decorated source
//!
//! This module defines the closed set of style tags a lexer can assign
//! to a span of source text, together with their short class names
//! (as used in stylesheets).

use std::fmt;
use std::str::FromStr;

use crate::error::PrettifyError;

/// Style assigned to a run of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleTag {
    /// Plain text, whitespace and identifiers
    Plain,
    /// String literals
    String,
    /// Language keywords
    Keyword,
    /// Comments
    Comment,
    /// Type names
    Type,
    /// Numeric and other literals
    Literal,
    /// Punctuation and operators
    Punctuation,
    /// Markup tag names and delimiters
    Tag,
    /// Markup declarations (`<!DOCTYPE ...>`)
    Declaration,
    /// Embedded source in an unknown language
    Source,
    /// Markup attribute names
    AttribName,
    /// Markup attribute values
    AttribValue,
    /// Content that must not be treated as code
    NoCode,
}

impl StyleTag {
    pub const ALL: [StyleTag; 13] = [
        StyleTag::Plain,
        StyleTag::String,
        StyleTag::Keyword,
        StyleTag::Comment,
        StyleTag::Type,
        StyleTag::Literal,
        StyleTag::Punctuation,
        StyleTag::Tag,
        StyleTag::Declaration,
        StyleTag::Source,
        StyleTag::AttribName,
        StyleTag::AttribValue,
        StyleTag::NoCode,
    ];

    /// Short class name (`kwd`, `str`, ...)
    pub fn class_name(&self) -> &'static str {
        match self {
            StyleTag::Plain => "pln",
            StyleTag::String => "str",
            StyleTag::Keyword => "kwd",
            StyleTag::Comment => "com",
            StyleTag::Type => "typ",
            StyleTag::Literal => "lit",
            StyleTag::Punctuation => "pun",
            StyleTag::Tag => "tag",
            StyleTag::Declaration => "dec",
            StyleTag::Source => "src",
            StyleTag::AttribName => "atn",
            StyleTag::AttribValue => "atv",
            StyleTag::NoCode => "nocode",
        }
    }

    /// Get a human-readable name for this style
    pub fn name(&self) -> &'static str {
        match self {
            StyleTag::Plain => "plain",
            StyleTag::String => "string",
            StyleTag::Keyword => "keyword",
            StyleTag::Comment => "comment",
            StyleTag::Type => "type",
            StyleTag::Literal => "literal",
            StyleTag::Punctuation => "punctuation",
            StyleTag::Tag => "tag",
            StyleTag::Declaration => "declaration",
            StyleTag::Source => "source",
            StyleTag::AttribName => "attribute-name",
            StyleTag::AttribValue => "attribute-value",
            StyleTag::NoCode => "nocode",
        }
    }

    /// Parse a style from either its name or its class name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == name || tag.class_name() == name)
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for StyleTag {
    type Err = PrettifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| PrettifyError::UnknownStyle(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_accepts_both_forms() {
        assert_eq!(StyleTag::from_name("literal"), Some(StyleTag::Literal));
        assert_eq!(StyleTag::from_name("lit"), Some(StyleTag::Literal));
        assert_eq!(StyleTag::from_name("atv"), Some(StyleTag::AttribValue));
        assert_eq!(StyleTag::from_name("attribute-name"), Some(StyleTag::AttribName));
    }

    #[test]
    fn test_from_name_invalid() {
        assert_eq!(StyleTag::from_name("Keyword"), None);
        assert_eq!(StyleTag::from_name(""), None);
        assert!("bogus".parse::<StyleTag>().is_err());
    }

    #[test]
    fn test_class_names_unique() {
        for (i, a) in StyleTag::ALL.iter().enumerate() {
            for b in &StyleTag::ALL[i + 1..] {
                assert_ne!(a.class_name(), b.class_name());
            }
        }
    }
}
