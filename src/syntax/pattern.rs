//! Pattern compiler
//!
//! Token patterns are written independently of one another, each anchored
//! with a leading `^` and each free to use its own capture groups and case
//! sensitivity. A lexer scans with a single composite regex built from all
//! of them, so this module rewrites every pattern before joining them:
//!
//! - leading `^` anchors are dropped so the composite can match anywhere;
//!   `^^` survives as a single real start-of-input anchor
//! - capturing groups become non-capturing unless a back-reference points
//!   at them, and back-references are renumbered across the composite
//! - when case-sensitive and case-insensitive patterns are mixed, the
//!   letters of the case-insensitive ones are expanded to `[Aa]` classes
//!
//! Patterns are written with JavaScript's ASCII-only `\w`, `\d` and `\b`,
//! so those are spelled out as ASCII classes and look-arounds before
//! compiling; the regex engines here would read them as Unicode classes.

use std::collections::HashMap;
use std::fmt;

use fancy_regex::{Regex, RegexBuilder};
use once_cell::sync::Lazy;

use crate::error::{PrettifyError, Result};

/// Splits pattern text into character sets, escapes, group punctuation and
/// runs of anything else.
static PATTERN_PARTS: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(concat!(
        r"\[(?:[^\\\]]|\\[\s\S])*\]",
        r"|\\[ux]\{[0-9A-Fa-f]+\}",
        r"|\\u[0-9A-Fa-f]{4}",
        r"|\\x[0-9A-Fa-f]{2}",
        r"|\\[pP](?:\{[^}]*\}|[A-Za-z])",
        r"|\\[0-9]+",
        r"|\\[^ux0-9]",
        r"|\\[ux]",
        r"|\(\?(?:[:=!>]|<[=!]|[A-Za-z-]+[:)])",
        r"|[()^]",
        r"|[^\[\\()^]+",
        r"|[\s\S]",
    ))
    .expect("pattern splitter is valid")
});

/// Splits the inside of a character set into single members and `-`.
static CHARSET_PARTS: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(concat!(
        r"\\[ux]\{[0-9A-Fa-f]+\}",
        r"|\\[pP](?:\{[^}]*\}|[A-Za-z])",
        r"|\\u[0-9A-Fa-f]{4}",
        r"|\\x[0-9A-Fa-f]{2}",
        r"|\\[0-3][0-7]{0,2}",
        r"|\\[0-7]{1,2}",
        r"|\\[\s\S]",
        r"|-",
        r"|[^-\\]",
    ))
    .expect("charset splitter is valid")
});

/// Escapes that cannot contribute a letter to the matched text.
static LETTER_FREE_ESCAPES: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"(?i)\\u[0-9a-f]{4}|\\x[0-9a-f]{2}|\\[^ux]").expect("escape stripper is valid")
});

/// Flags carried by a rule pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PatternFlags {
    pub ignore_case: bool,
    /// Rejected when compiled; tokens are found one at a time
    pub global: bool,
    /// Rejected when compiled; `^` and `$` must mean start and end of input
    pub multiline: bool,
}

impl PatternFlags {
    /// Parse a flag string such as `"i"`
    pub fn parse(pattern: &str, flags: &str) -> Result<Self> {
        let mut parsed = Self::default();
        for flag in flags.chars() {
            match flag {
                'i' => parsed.ignore_case = true,
                'g' => parsed.global = true,
                'm' => parsed.multiline = true,
                _ => {
                    return Err(PrettifyError::UnknownFlag {
                        pattern: pattern.to_string(),
                        flag,
                    })
                }
            }
        }
        Ok(parsed)
    }
}

/// The source text of a token pattern plus its flags
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RulePattern {
    source: String,
    flags: PatternFlags,
}

impl RulePattern {
    /// A case-sensitive pattern
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: PatternFlags::default(),
        }
    }

    /// A case-insensitive pattern
    pub fn ignore_case(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: PatternFlags {
                ignore_case: true,
                ..Default::default()
            },
        }
    }

    /// A pattern with flags given as text, e.g. from a config file
    pub fn with_flags(source: impl Into<String>, flags: &str) -> Result<Self> {
        let source = source.into();
        let flags = PatternFlags::parse(&source, flags)?;
        Ok(Self { source, flags })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// Fails if the pattern carries a flag that would break offset bookkeeping
    pub fn check_flags(&self) -> Result<()> {
        if self.flags.global || self.flags.multiline {
            return Err(PrettifyError::UnsupportedFlags(self.source.clone()));
        }
        Ok(())
    }

    /// Compile this pattern on its own
    pub fn compile(&self) -> Result<Regex> {
        self.check_flags()?;
        let source = ascii_classes(&self.source);
        if self.flags.ignore_case {
            build_regex(&format!("(?i){source}"))
        } else {
            build_regex(&source)
        }
    }

    /// Whether the pattern text can match a Latin letter literally
    fn has_letters(&self) -> bool {
        LETTER_FREE_ESCAPES
            .replace_all(&self.source, "")
            .chars()
            .any(|ch| ch.is_ascii_alphabetic())
    }
}

impl fmt::Display for RulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)?;
        if self.flags.global {
            f.write_str("g")?;
        }
        if self.flags.ignore_case {
            f.write_str("i")?;
        }
        if self.flags.multiline {
            f.write_str("m")?;
        }
        Ok(())
    }
}

/// Backtracking budget for one search.
///
/// Long comments and strings cost a couple of steps per character, so this
/// has to cover tokens far larger than fancy-regex's default of one million.
pub const BACKTRACK_LIMIT: usize = 1_000_000_000;

fn build_regex(source: &str) -> Result<Regex> {
    build_regex_with_limit(source, BACKTRACK_LIMIT)
}

fn build_regex_with_limit(source: &str, backtrack_limit: usize) -> Result<Regex> {
    RegexBuilder::new(source)
        .backtrack_limit(backtrack_limit)
        .build()
        .map_err(|e| PrettifyError::Pattern {
            pattern: source.to_string(),
            source: Box::new(e),
        })
}

/// Compile patterns into one regex whose alternatives keep the input order
pub fn combine_patterns(patterns: &[&RulePattern]) -> Result<Regex> {
    combine_patterns_with_limit(patterns, BACKTRACK_LIMIT)
}

/// [`combine_patterns`] with an explicit backtracking budget
pub fn combine_patterns_with_limit(patterns: &[&RulePattern], backtrack_limit: usize) -> Result<Regex> {
    build_regex_with_limit(&combined_source(patterns)?, backtrack_limit)
}

/// Build the text of the composite regex
pub fn combined_source(patterns: &[&RulePattern]) -> Result<String> {
    for pattern in patterns {
        pattern.check_flags()?;
    }

    let mut need_to_fold_case = false;
    let mut ignore_case = false;
    for pattern in patterns {
        if pattern.flags.ignore_case {
            ignore_case = true;
        } else if pattern.has_letters() {
            need_to_fold_case = true;
            ignore_case = false;
            break;
        }
    }

    let mut captured_groups = 0;
    let alternatives: Vec<String> = patterns
        .iter()
        .map(|pattern| {
            let fold_case = pattern.flags.ignore_case && need_to_fold_case;
            format!(
                "(?:{})",
                rewrite_pattern(&ascii_classes(&pattern.source), fold_case, &mut captured_groups)
            )
        })
        .collect();

    let body = alternatives.join("|");
    Ok(if ignore_case { format!("(?i){body}") } else { body })
}

const ASCII_WORD_BOUNDARY: &str =
    "(?:(?<=[0-9A-Za-z_])(?![0-9A-Za-z_])|(?<![0-9A-Za-z_])(?=[0-9A-Za-z_]))";
const ASCII_NOT_WORD_BOUNDARY: &str =
    "(?:(?<=[0-9A-Za-z_])(?=[0-9A-Za-z_])|(?<![0-9A-Za-z_])(?![0-9A-Za-z_]))";

/// Spell out `\w`, `\d` and `\b` (and their negations) as ASCII-only
fn ascii_classes(source: &str) -> String {
    PATTERN_PARTS
        .find_iter(source)
        .map(|m| match m.as_str() {
            r"\w" => "[0-9A-Za-z_]".to_string(),
            r"\W" => "[^0-9A-Za-z_]".to_string(),
            r"\d" => "[0-9]".to_string(),
            r"\D" => "[^0-9]".to_string(),
            r"\b" => ASCII_WORD_BOUNDARY.to_string(),
            r"\B" => ASCII_NOT_WORD_BOUNDARY.to_string(),
            part if part.len() >= 2 && part.starts_with('[') => ascii_charset(part),
            part => part.to_string(),
        })
        .collect()
}

/// `\w` and `\d` inside a character set become ASCII ranges
fn ascii_charset(charset: &str) -> String {
    let inner = &charset[1..charset.len() - 1];
    let mut out = String::from("[");
    for member in CHARSET_PARTS.find_iter(inner) {
        match member.as_str() {
            r"\w" => out.push_str("0-9A-Za-z_"),
            r"\d" => out.push_str("0-9"),
            other => out.push_str(other),
        }
    }
    out.push(']');
    out
}

/// Numeric escape value of a part like `\2`, if it is one
fn numeric_escape(part: &str) -> Option<usize> {
    let digits = part.strip_prefix('\\')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&n| n > 0)
}

fn rewrite_pattern(source: &str, fold_case: bool, captured_groups: &mut usize) -> String {
    let mut parts: Vec<String> = PATTERN_PARTS
        .find_iter(source)
        .map(|m| m.as_str().to_string())
        .collect();

    // Find which groups are back-referenced. A numeric escape past the
    // groups opened so far cannot be a back-reference, so pin it down as a
    // literal before it can collide with a group from another pattern.
    let mut referenced: Vec<usize> = Vec::new();
    let mut group_index = 0;
    for part in parts.iter_mut() {
        if part == "(" {
            group_index += 1;
        } else if let Some(n) = numeric_escape(part) {
            if n <= group_index {
                referenced.push(n);
            } else {
                *part = encode_escape(n as u32);
            }
        }
    }

    referenced.sort_unstable();
    referenced.dedup();
    let mut renumbered: HashMap<usize, usize> = HashMap::new();
    for group in referenced {
        *captured_groups += 1;
        renumbered.insert(group, *captured_groups);
    }

    group_index = 0;
    for part in parts.iter_mut() {
        if part == "(" {
            group_index += 1;
            if !renumbered.contains_key(&group_index) {
                *part = "(?:".to_string();
            }
        } else if let Some(n) = numeric_escape(part) {
            if let Some(new_index) = renumbered.get(&n).filter(|_| n <= group_index) {
                *part = format!("\\{new_index}");
            }
        }
    }

    // Drop prefix anchors so the composite matches anywhere. `^^` means a
    // real anchor and keeps one `^`.
    for i in 0..parts.len() {
        if parts[i] == "^" && parts.get(i + 1).map(String::as_str) != Some("^") {
            parts[i].clear();
        }
    }

    if fold_case {
        for part in parts.iter_mut() {
            if part.len() >= 2 && part.starts_with('[') {
                *part = case_fold_charset(part);
            } else if !part.starts_with('\\') && !part.starts_with("(?") {
                *part = fold_letters(part);
            }
        }
    }

    parts.concat()
}

/// Expand each Latin letter to a two-case character class
fn fold_letters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphabetic() {
            out.push('[');
            out.push(ch.to_ascii_uppercase());
            out.push(ch.to_ascii_lowercase());
            out.push(']');
        } else {
            out.push(ch);
        }
    }
    out
}

fn decode_escape(part: &str) -> u32 {
    let mut chars = part.chars();
    let first = match chars.next() {
        Some(ch) => ch,
        None => return 0,
    };
    if first != '\\' {
        return first as u32;
    }
    let c1 = match chars.next() {
        Some(ch) => ch,
        None => return '\\' as u32,
    };
    match c1 {
        'b' => 8,
        't' => 9,
        'n' => 0xa,
        'v' => 0xb,
        'f' => 0xc,
        'r' => 0xd,
        '0'..='7' => u32::from_str_radix(&part[1..], 8).unwrap_or(0),
        'u' | 'x' => {
            let hex = part[2..].trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(hex, 16).unwrap_or(0)
        }
        _ => c1 as u32,
    }
}

/// Encode a code point so it is taken literally inside or outside a class
fn encode_escape(code: u32) -> String {
    if code < 0x20 {
        return format!("\\x{code:02x}");
    }
    match char::from_u32(code) {
        Some(ch @ ('\\' | '-' | ']' | '^' | '[' | '&' | '~')) => format!("\\{ch}"),
        Some(ch) => ch.to_string(),
        None => format!("\\x{{{code:x}}}"),
    }
}

/// Rewrite a character set so it matches both cases of any Latin letters
/// in it, merging the resulting ranges.
fn case_fold_charset(charset: &str) -> String {
    let inner = &charset[1..charset.len() - 1];
    let members: Vec<&str> = CHARSET_PARTS.find_iter(inner).map(|m| m.as_str()).collect();
    let inverse = members.first() == Some(&"^");

    let mut out = String::from("[");
    if inverse {
        out.push('^');
    }

    let mut ranges: Vec<(u32, u32)> = Vec::new();
    let mut i = usize::from(inverse);
    while i < members.len() {
        let member = members[i];
        if is_class_escape(member) {
            out.push_str(member);
        } else {
            let start = decode_escape(member);
            let end = if i + 2 < members.len() && members[i + 1] == "-" {
                i += 2;
                decode_escape(members[i])
            } else {
                start
            };
            ranges.push((start, end));
            // Only Latin letters are folded
            if !(end < 65 || start > 122) {
                if !(end < 65 || start > 90) {
                    ranges.push((start.max(65) | 32, end.min(90) | 32));
                }
                if !(end < 97 || start > 122) {
                    ranges.push((start.max(97) & !32, end.min(122) & !32));
                }
            }
        }
        i += 1;
    }

    ranges.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    let mut merged: Vec<(u32, u32)> = Vec::new();
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.0 <= last.1 + 1 => last.1 = last.1.max(range.1),
            _ => merged.push(range),
        }
    }

    for (start, end) in merged {
        out.push_str(&encode_escape(start));
        if end > start {
            out.push('-');
            out.push_str(&encode_escape(end));
        }
    }
    out.push(']');
    out
}

/// `\d`, `\w`, `\s`, `\p{..}` and friends name classes rather than characters
fn is_class_escape(member: &str) -> bool {
    let mut chars = member.chars();
    chars.next() == Some('\\')
        && matches!(
            chars.next(),
            Some('b' | 'B' | 'd' | 'D' | 's' | 'S' | 'w' | 'W' | 'p' | 'P')
        )
        && (member.len() == 2 || member[1..].starts_with(['p', 'P']))
}
