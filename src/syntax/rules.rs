//! Token rules
//!
//! A rule pairs a pattern with the style to assign when the pattern
//! matches a token. Rules naming another language mark an embedded region
//! instead of a plain style.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use fancy_regex::{Captures, Regex};

use super::pattern::RulePattern;
use super::tokens::StyleTag;
use crate::error::{PrettifyError, Result};

/// Prefix of the textual form of an embedded-language style
pub const EMBEDDED_PREFIX: &str = "lang-";

/// What a rule assigns to the tokens it matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleStyle {
    /// A plain style tag
    Tag(StyleTag),
    /// Capture group 1 is source in the named language.
    /// An empty name means "sniff the embedded source".
    Embedded(String),
}

impl RuleStyle {
    pub fn embedded(language: impl Into<String>) -> Self {
        RuleStyle::Embedded(language.into())
    }
}

impl From<StyleTag> for RuleStyle {
    fn from(tag: StyleTag) -> Self {
        RuleStyle::Tag(tag)
    }
}

impl FromStr for RuleStyle {
    type Err = PrettifyError;

    /// Parses style names and `lang-<key>` embedded forms
    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix(EMBEDDED_PREFIX) {
            Some(language) => Ok(RuleStyle::Embedded(language.to_string())),
            None => s.parse().map(RuleStyle::Tag),
        }
    }
}

impl fmt::Display for RuleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStyle::Tag(tag) => write!(f, "{tag}"),
            RuleStyle::Embedded(language) => write!(f, "{EMBEDDED_PREFIX}{language}"),
        }
    }
}

/// How a single token should be decorated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'r> {
    Style(StyleTag),
    /// `region` is relative to the token
    Embedded {
        language: &'r str,
        region: Range<usize>,
    },
}

/// A single token rule
pub struct TokenRule {
    style: RuleStyle,
    pattern: RulePattern,
    regex: Regex,
    shortcut_chars: Option<String>,
}

impl TokenRule {
    /// Create a rule, compiling its pattern
    pub fn new(style: impl Into<RuleStyle>, pattern: RulePattern) -> Result<Self> {
        let regex = pattern.compile()?;
        Ok(Self {
            style: style.into(),
            pattern,
            regex,
            shortcut_chars: None,
        })
    }

    /// Builder: dispatch tokens starting with any of `chars` straight to this rule
    pub fn with_shortcuts(mut self, chars: &str) -> Self {
        self.shortcut_chars = Some(chars.to_string());
        self
    }

    pub fn style(&self) -> &RuleStyle {
        &self.style
    }

    pub fn pattern(&self) -> &RulePattern {
        &self.pattern
    }

    pub fn shortcut_chars(&self) -> Option<&str> {
        self.shortcut_chars.as_deref()
    }

    /// Match this rule's own pattern against a token
    pub fn captures<'t>(&self, token: &'t str) -> Result<Option<Captures<'t>>> {
        Ok(self.regex.captures(token)?)
    }

    /// Turn a match (or the lack of one) into a decoration decision.
    ///
    /// An embedded rule without a capture group 1 falls back to the
    /// opaque `src` style.
    pub fn resolve(&self, captures: Option<&Captures<'_>>) -> Resolution<'_> {
        match &self.style {
            RuleStyle::Tag(tag) => Resolution::Style(*tag),
            RuleStyle::Embedded(language) => {
                match captures.and_then(|caps| caps.get(1)) {
                    Some(group) => Resolution::Embedded {
                        language: language.as_str(),
                        region: group.start()..group.end(),
                    },
                    None => Resolution::Style(StyleTag::Source),
                }
            }
        }
    }
}

impl fmt::Debug for TokenRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRule")
            .field("style", &self.style)
            .field("pattern", &self.pattern.to_string())
            .field("shortcut_chars", &self.shortcut_chars)
            .finish()
    }
}
