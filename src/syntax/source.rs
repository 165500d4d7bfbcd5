//! Source options
//!
//! Most programming languages are close enough to C that one parameterised
//! lexer covers them: the options below pick the comment, string and regex
//! literal conventions, and the keyword list does the rest.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::lexer::SimpleLexer;
use super::pattern::RulePattern;
use super::rules::{RuleStyle, TokenRule};
use super::tokens::StyleTag;
use crate::error::Result;

/// Key of the lexer used for regex literals
pub const REGEX_LANGUAGE: &str = "regex";

/// Context after which a `/` starts a regex literal rather than a division
const REGEX_PRECEDER: &str = concat!(
    r"(?:^^\.?|[+-]|[!=]=?=?|#|%=?|&&?=?|\(|\*=?|[+\-]=|->|/=?|::?|<<?=?|>>?>?=?|,|;|\?|@|\[|~|\{|\^\^?=?|\|\|?=?",
    r"|break|case|continue|delete|do|else|finally|instanceof|return|throw|try|typeof)\s*",
);

static KEYWORD_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("keyword separator pattern is valid"));

/// Which `#` comments a language has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashComments {
    #[default]
    None,
    /// `#` to end of line
    Line,
    /// `###` block comments as well as line comments
    Block,
}

/// Which regex literals a language has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegexLiterals {
    #[default]
    None,
    SingleLine,
    Multiline,
}

/// Options for a C-like lexer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceOptions {
    /// Keywords; each entry may itself be a comma or space separated list
    pub keywords: Vec<String>,
    pub hash_comments: HashComments,
    /// `//` line comments and `/* */` block comments
    pub c_style_comments: bool,
    /// Strings may span lines; backquoted strings are recognised too
    pub multi_line_strings: bool,
    /// Python style `'''` and `"""` strings
    pub triple_quoted_strings: bool,
    /// C# `@"..."` strings
    pub verbatim_strings: bool,
    pub regex_literals: RegexLiterals,
    /// Pattern matching type names
    pub types: Option<String>,
}

impl SourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords.extend(keywords.iter().map(|k| k.to_string()));
        self
    }

    pub fn with_hash_comments(mut self, hash_comments: HashComments) -> Self {
        self.hash_comments = hash_comments;
        self
    }

    pub fn with_c_style_comments(mut self) -> Self {
        self.c_style_comments = true;
        self
    }

    pub fn with_multi_line_strings(mut self) -> Self {
        self.multi_line_strings = true;
        self
    }

    pub fn with_triple_quoted_strings(mut self) -> Self {
        self.triple_quoted_strings = true;
        self
    }

    pub fn with_verbatim_strings(mut self) -> Self {
        self.verbatim_strings = true;
        self
    }

    pub fn with_regex_literals(mut self, regex_literals: RegexLiterals) -> Self {
        self.regex_literals = regex_literals;
        self
    }

    pub fn with_types(mut self, types: &str) -> Self {
        self.types = Some(types.to_string());
        self
    }

    /// Individual keywords, in order, without duplicates
    pub fn keyword_list(&self) -> Vec<&str> {
        let mut list: Vec<&str> = Vec::new();
        for entry in &self.keywords {
            for keyword in KEYWORD_SEPARATORS.split(entry).filter(|k| !k.is_empty()) {
                if !list.contains(&keyword) {
                    list.push(keyword);
                }
            }
        }
        list
    }

    /// Build the lexer these options describe
    pub fn build(&self) -> Result<SimpleLexer> {
        source_lexer(self)
    }
}

fn regex_literal(kind: RegexLiterals) -> Option<String> {
    let (excluded, any) = match kind {
        RegexLiterals::None => return None,
        RegexLiterals::SingleLine => (r"\n\r", "."),
        RegexLiterals::Multiline => ("", r"[\s\S]"),
    };
    // A slash not starting a comment, then plain characters, escapes or
    // non-nesting character sets, then the closing slash
    Some(format!(
        r"/(?=[^/*{excluded}])(?:[^/\[\\{excluded}]|\\{any}|\[(?:[^\\\]{excluded}]|\\{any})*(?:\]|$))+/"
    ))
}

/// Build a lexer for a C-like language
pub fn source_lexer(options: &SourceOptions) -> Result<SimpleLexer> {
    let mut shortcuts = Vec::new();
    let mut fallthrough = Vec::new();

    // Strings
    if options.triple_quoted_strings {
        shortcuts.push(
            TokenRule::new(
                StyleTag::String,
                RulePattern::new(concat!(
                    r#"^(?:'''(?:[^'\\]|\\[\s\S]|'{1,2}(?=[^']))*(?:'''|$)"#,
                    r#"|"""(?:[^"\\]|\\[\s\S]|"{1,2}(?=[^"]))*(?:"""|$)"#,
                    r#"|'(?:[^\\']|\\[\s\S])*(?:'|$)"#,
                    r#"|"(?:[^\\"]|\\[\s\S])*(?:"|$))"#,
                )),
            )?
            .with_shortcuts("'\""),
        );
    } else if options.multi_line_strings {
        shortcuts.push(
            TokenRule::new(
                StyleTag::String,
                RulePattern::new(concat!(
                    r#"^(?:'(?:[^\\']|\\[\s\S])*(?:'|$)"#,
                    r#"|"(?:[^\\"]|\\[\s\S])*(?:"|$)"#,
                    r#"|`(?:[^\\`]|\\[\s\S])*(?:`|$))"#,
                )),
            )?
            .with_shortcuts("'\"`"),
        );
    } else {
        shortcuts.push(
            TokenRule::new(
                StyleTag::String,
                RulePattern::new(r#"^(?:'(?:[^\\'\r\n]|\\.)*(?:'|$)|"(?:[^\\"\r\n]|\\.)*(?:"|$))"#),
            )?
            .with_shortcuts("\"'"),
        );
    }
    if options.verbatim_strings {
        fallthrough.push(TokenRule::new(
            StyleTag::String,
            RulePattern::new(r#"^@"(?:[^"]|"")*(?:"|$)"#),
        )?);
    }

    // Comments
    match (options.hash_comments, options.c_style_comments) {
        (HashComments::None, _) => {}
        (HashComments::Block, true) => {
            shortcuts.push(
                TokenRule::new(
                    StyleTag::Comment,
                    RulePattern::new(r"^#(?:##(?:[^#]|#(?!##))*(?:###|$)|.*)"),
                )?
                .with_shortcuts("#"),
            );
        }
        (HashComments::Line, true) => {
            // Preprocessor directives stop before an unclosed comment
            shortcuts.push(
                TokenRule::new(
                    StyleTag::Comment,
                    RulePattern::new(
                        r"^#(?:(?:define|e(?:l|nd)if|else|error|ifn?def|include|line|pragma|undef|warning)\b|[^\r\n]*)",
                    ),
                )?
                .with_shortcuts("#"),
            );
        }
        (_, false) => {
            shortcuts.push(
                TokenRule::new(StyleTag::Comment, RulePattern::new(r"^#[^\r\n]*"))?.with_shortcuts("#"),
            );
        }
    }
    if options.hash_comments != HashComments::None && options.c_style_comments {
        // #include <stdio.h>
        fallthrough.push(TokenRule::new(
            StyleTag::String,
            RulePattern::new(
                r"^<(?:(?:(?:\.\./)*|/?)(?:[\w\-]+(?:/[\w\-]+)+)?[\w\-]+\.h(?:h|pp|\+\+)?|[a-z]\w*)>",
            ),
        )?);
    }
    if options.c_style_comments {
        fallthrough.push(TokenRule::new(StyleTag::Comment, RulePattern::new(r"^//[^\r\n]*"))?);
        fallthrough.push(TokenRule::new(
            StyleTag::Comment,
            RulePattern::new(r"^/\*[\s\S]*?(?:\*/|$)"),
        )?);
    }

    if let Some(literal) = regex_literal(options.regex_literals) {
        fallthrough.push(TokenRule::new(
            RuleStyle::embedded(REGEX_LANGUAGE),
            RulePattern::new(format!("^{REGEX_PRECEDER}({literal})")),
        )?);
    }

    if let Some(types) = &options.types {
        fallthrough.push(TokenRule::new(StyleTag::Type, RulePattern::new(types.as_str()))?);
    }

    let keywords = options.keyword_list();
    if !keywords.is_empty() {
        let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        fallthrough.push(TokenRule::new(
            StyleTag::Keyword,
            RulePattern::new(format!(r"^(?:{})\b", alternatives.join("|"))),
        )?);
    }

    shortcuts.push(
        TokenRule::new(StyleTag::Plain, RulePattern::new(r"^\s+"))?.with_shortcuts(" \r\n\t\u{a0}"),
    );

    let mut punctuation = String::from(r#"^.[^\s\w.$@'"`/\\]*"#);
    if options.regex_literals != RegexLiterals::None {
        punctuation.push_str(r"(?!\s*/)");
    }

    fallthrough.push(TokenRule::new(StyleTag::Literal, RulePattern::ignore_case(r"^@[a-z_$][a-z_$@0-9]*"))?);
    fallthrough.push(TokenRule::new(
        StyleTag::Type,
        RulePattern::new(r"^(?:[@_]?[A-Z]+[a-z][A-Za-z_$@0-9]*|\w+_t\b)"),
    )?);
    fallthrough.push(TokenRule::new(StyleTag::Plain, RulePattern::ignore_case(r"^[a-z_$][a-z_$@0-9]*"))?);
    // Hex, octal or decimal, maybe in scientific notation, with an
    // optional suffix like `UL`
    fallthrough.push(
        TokenRule::new(
            StyleTag::Literal,
            RulePattern::ignore_case(
                r"^(?:0x[a-f0-9]+|(?:\d(?:_\d+)*\d*(?:\.\d*)?|\.\d+)(?:e[+\-]?\d+)?)[a-z]*",
            ),
        )?
        .with_shortcuts("0123456789"),
    );
    // An escaped quote in shell does not start a string
    fallthrough.push(TokenRule::new(StyleTag::Plain, RulePattern::new(r"^\\[\s\S]?"))?);
    fallthrough.push(TokenRule::new(StyleTag::Punctuation, RulePattern::new(punctuation))?);

    SimpleLexer::new(shortcuts, fallthrough)
}
