//! Lexer factory
//!
//! Builds a reusable lexer from two lists of token rules:
//!
//! - shortcut rules are looked up by the first character of a token
//! - fallthrough rules are tried in order when no shortcut applies
//!
//! Every rule pattern is merged into one composite tokenizer which splits
//! the source into tokens; each token is then classified against the rules
//! themselves.

use std::collections::HashMap;

use fancy_regex::Regex;
use tracing::{debug, warn};

use super::decoration::{DecorationJob, DecorationList};
use super::engine::Highlighter;
use super::pattern::{combine_patterns_with_limit, RulePattern, BACKTRACK_LIMIT};
use super::rules::{Resolution, TokenRule};
use super::tokens::StyleTag;
use crate::error::Result;

/// Anything that can decorate a job.
///
/// Handlers are shared between jobs and threads; all per-job state lives
/// on the stack of [`LanguageHandler::decorate`].
pub trait LanguageHandler: Send + Sync {
    /// Produce the raw decoration list for `job`, starting at `job.base`.
    /// Embedded regions are decorated through `highlighter`.
    fn decorate(&self, job: &DecorationJob<'_>, highlighter: &Highlighter) -> Result<DecorationList>;
}

/// A regex-driven lexer
#[derive(Debug)]
pub struct SimpleLexer {
    /// Shortcut rules followed by fallthrough rules
    rules: Vec<TokenRule>,
    fallthrough_start: usize,
    shortcuts: HashMap<char, usize>,
    tokenizer: Regex,
}

impl SimpleLexer {
    /// Build a lexer. Fails if any pattern is malformed or carries
    /// unsupported flags.
    pub fn new(shortcut_rules: Vec<TokenRule>, fallthrough_rules: Vec<TokenRule>) -> Result<Self> {
        let fallthrough_start = shortcut_rules.len();
        let mut rules = shortcut_rules;
        rules.extend(fallthrough_rules);

        let mut shortcuts = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            if let Some(chars) = rule.shortcut_chars() {
                for ch in chars.chars() {
                    shortcuts.insert(ch, index);
                }
            }
        }
        let tokenizer = build_tokenizer(&rules, BACKTRACK_LIMIT)?;

        debug!(
            rules = rules.len(),
            shortcuts = shortcuts.len(),
            "built lexer"
        );

        Ok(Self {
            rules,
            fallthrough_start,
            shortcuts,
            tokenizer,
        })
    }

    /// Rebuild the tokenizer with another backtracking budget
    pub fn with_backtrack_limit(mut self, backtrack_limit: usize) -> Result<Self> {
        self.tokenizer = build_tokenizer(&self.rules, backtrack_limit)?;
        Ok(self)
    }

    fn fallthrough(&self) -> &[TokenRule] {
        &self.rules[self.fallthrough_start..]
    }

    /// End of the token starting at `pos`
    fn token_end(&self, source: &str, pos: usize) -> Result<usize> {
        match self.tokenizer.find_from_pos(source, pos)? {
            Some(m) if m.start() == pos && m.end() > pos => Ok(m.end()),
            _ => Ok(pos + source[pos..].chars().next().map_or(1, char::len_utf8)),
        }
    }

    /// Split `source` into contiguous, non-empty tokens
    pub fn tokenize<'s>(&self, source: &'s str) -> Result<Vec<&'s str>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < source.len() {
            let end = self.token_end(source, pos)?;
            tokens.push(&source[pos..end]);
            pos = end;
        }
        Ok(tokens)
    }

    /// Decide how a token is decorated
    pub fn resolve<'r>(&'r self, token: &str) -> Result<Resolution<'r>> {
        let shortcut = token
            .chars()
            .next()
            .and_then(|ch| self.shortcuts.get(&ch))
            .map(|&index| &self.rules[index]);

        if let Some(rule) = shortcut {
            // The shortcut's style applies even when its pattern does not
            // match the whole token
            let captures = rule.captures(token)?;
            return Ok(rule.resolve(captures.as_ref()));
        }

        for rule in self.fallthrough() {
            if let Some(captures) = rule.captures(token)? {
                return Ok(rule.resolve(Some(&captures)));
            }
        }

        Ok(Resolution::Style(StyleTag::Plain))
    }

    /// Find the token at `pos` and how to decorate it
    fn next_token<'r>(
        &'r self,
        source: &str,
        pos: usize,
        style_cache: &HashMap<&str, StyleTag>,
    ) -> Result<(usize, Resolution<'r>)> {
        let end = self.token_end(source, pos)?;
        let token = &source[pos..end];
        let resolution = match style_cache.get(token) {
            Some(&style) => Resolution::Style(style),
            None => self.resolve(token)?,
        };
        Ok((end, resolution))
    }

    /// Decorate a residual piece of an embedded token with this lexer
    fn decorate_residual(
        &self,
        highlighter: &Highlighter,
        residual: &str,
        base: usize,
        token_len: usize,
        out: &mut DecorationList,
    ) {
        if residual.len() == token_len {
            // An empty capture at the edge of the token; recursing would
            // decorate the same token forever
            out.push(base, StyleTag::Source);
        } else {
            highlighter.append_decorations(self, DecorationJob::new(residual, base), out);
        }
    }
}

impl LanguageHandler for SimpleLexer {
    fn decorate(&self, job: &DecorationJob<'_>, highlighter: &Highlighter) -> Result<DecorationList> {
        let source = job.source;
        let base = job.base;
        let mut decorations = DecorationList::starting_at(base, StyleTag::Plain);
        let mut style_cache: HashMap<&str, StyleTag> = HashMap::new();

        let mut pos = 0;
        while pos < source.len() {
            let token_start = pos;
            let resolution = match self.next_token(source, pos, &style_cache) {
                Ok((end, resolution)) => {
                    pos = end;
                    resolution
                }
                Err(err) => {
                    // Styling so far stands; the rest of the region stays plain
                    warn!(
                        offset = base + token_start,
                        error = %err,
                        "tokenizing failed, leaving the rest of the region plain"
                    );
                    decorations.push(base + token_start, StyleTag::Plain);
                    return Ok(decorations);
                }
            };
            let token = &source[token_start..pos];

            match resolution {
                Resolution::Style(style) => {
                    style_cache.insert(token, style);
                    decorations.push(base + token_start, style);
                }
                Resolution::Embedded { language, region } => {
                    let token_base = base + token_start;
                    let embedded = &token[region.clone()];

                    self.decorate_residual(
                        highlighter,
                        &token[..region.start],
                        token_base,
                        token.len(),
                        &mut decorations,
                    );

                    let handler = highlighter.registry().lookup(Some(language), embedded);
                    highlighter.append_decorations(
                        handler.as_ref(),
                        DecorationJob::new(embedded, token_base + region.start).with_language(language),
                        &mut decorations,
                    );

                    self.decorate_residual(
                        highlighter,
                        &token[region.end..],
                        token_base + region.end,
                        token.len(),
                        &mut decorations,
                    );
                }
            }
        }

        Ok(decorations)
    }
}

fn build_tokenizer(rules: &[TokenRule], backtrack_limit: usize) -> Result<Regex> {
    let mut patterns: Vec<&RulePattern> = Vec::with_capacity(rules.len() + 1);
    for rule in rules {
        if !patterns.contains(&rule.pattern()) {
            patterns.push(rule.pattern());
        }
    }

    // Always make progress, even on input no rule recognises
    let catch_all = RulePattern::new(r"[\s\S]");
    patterns.push(&catch_all);
    combine_patterns_with_limit(&patterns, backtrack_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::decoration::Decoration;
    use crate::syntax::registry::LanguageRegistry;
    use crate::syntax::source::{RegexLiterals, SourceOptions};
    use crate::syntax::rules::RuleStyle;

    fn rule(style: StyleTag, pattern: &str) -> TokenRule {
        TokenRule::new(style, RulePattern::new(pattern)).unwrap()
    }

    fn test_lexer() -> SimpleLexer {
        SimpleLexer::new(
            vec![rule(StyleTag::Plain, r"^\s+").with_shortcuts(" \t\n")],
            vec![
                rule(StyleTag::Comment, "^#[^\n]*"),
                rule(StyleTag::Keyword, r"^(?:let|if)\b"),
                rule(StyleTag::Plain, "^[a-z]+"),
                rule(StyleTag::Literal, r"^\d+"),
                rule(StyleTag::Punctuation, r"^[=;]+"),
            ],
        )
        .unwrap()
    }

    fn highlighter() -> Highlighter {
        Highlighter::with_registry(LanguageRegistry::new())
    }

    #[test]
    fn test_tokenize_is_contiguous() {
        let lexer = test_lexer();
        let tokens = lexer.tokenize("let x = 42; # done").unwrap();
        assert_eq!(
            tokens,
            vec!["let", " ", "x", " ", "=", " ", "42", ";", " ", "# done"]
        );
        assert_eq!(tokens.concat(), "let x = 42; # done");
    }

    #[test]
    fn test_unmatched_input_makes_progress() {
        let lexer = test_lexer();
        let tokens = lexer.tokenize("é?!").unwrap();
        assert_eq!(tokens, vec!["é", "?", "!"]);
        assert_eq!(lexer.resolve("?").unwrap(), Resolution::Style(StyleTag::Plain));
    }

    #[test]
    fn test_decorate_assigns_styles() {
        let lexer = test_lexer();
        let job = DecorationJob::new("let x = 42;", 0);
        let decorations = lexer.decorate(&job, &highlighter()).unwrap().simplified(job.end());
        let runs: Vec<_> = decorations.runs(job.end()).collect();
        assert_eq!(
            runs,
            vec![
                (0..3, StyleTag::Keyword),
                (3..6, StyleTag::Plain),
                (6..7, StyleTag::Punctuation),
                (7..8, StyleTag::Plain),
                (8..10, StyleTag::Literal),
                (10..11, StyleTag::Punctuation),
            ]
        );
    }

    #[test]
    fn test_decorate_honours_base() {
        let lexer = test_lexer();
        let job = DecorationJob::new("42", 10);
        let decorations = lexer.decorate(&job, &highlighter()).unwrap();
        assert_eq!(decorations.as_slice()[0].pos, 10);
        assert_eq!(decorations.style_at(10), Some(StyleTag::Literal));
    }

    #[test]
    fn test_first_fallthrough_rule_wins() {
        let lexer = SimpleLexer::new(
            vec![],
            vec![
                rule(StyleTag::Type, "^[A-Z][a-z]+"),
                rule(StyleTag::Keyword, "^[A-Za-z]+"),
            ],
        )
        .unwrap();
        for _ in 0..3 {
            assert_eq!(lexer.resolve("Foo").unwrap(), Resolution::Style(StyleTag::Type));
        }
    }

    #[test]
    fn test_later_shortcut_claims_character() {
        let lexer = SimpleLexer::new(
            vec![
                rule(StyleTag::String, "^'[^']*'").with_shortcuts("'"),
                rule(StyleTag::Literal, "^'[a-z]").with_shortcuts("'"),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(lexer.resolve("'a'").unwrap(), Resolution::Style(StyleTag::Literal));
    }

    #[test]
    fn test_shortcut_style_applies_without_match() {
        let lexer = SimpleLexer::new(
            vec![rule(StyleTag::String, "^\"[^\"]*\"").with_shortcuts("\"")],
            vec![],
        )
        .unwrap();
        assert_eq!(lexer.resolve("\"").unwrap(), Resolution::Style(StyleTag::String));
    }

    #[test]
    fn test_embedded_region_decorated_by_other_language() {
        let inner = SimpleLexer::new(vec![], vec![rule(StyleTag::Keyword, "^[a-z]+")]).unwrap();
        let mut registry = LanguageRegistry::new();
        registry.register(inner, &["inner"]);
        let highlighter = Highlighter::with_registry(registry);

        let outer = SimpleLexer::new(
            vec![],
            vec![TokenRule::new(RuleStyle::embedded("inner"), RulePattern::new(r"^\[([a-z]*)\]")).unwrap()],
        )
        .unwrap();

        let job = DecorationJob::new("[abc]", 0);
        let decorations = outer.decorate(&job, &highlighter).unwrap().simplified(job.end());
        let runs: Vec<_> = decorations.runs(job.end()).collect();
        assert_eq!(
            runs,
            vec![(0..1, StyleTag::Plain), (1..4, StyleTag::Keyword), (4..5, StyleTag::Plain)]
        );
    }

    #[test]
    fn test_failed_token_keeps_earlier_styles() {
        let lexer = SourceOptions::new()
            .with_keywords(&["var"])
            .with_c_style_comments()
            .with_regex_literals(RegexLiterals::SingleLine)
            .build()
            .unwrap()
            .with_backtrack_limit(10_000)
            .unwrap();

        let source = format!("var y; /*{}*/ z", "\n".repeat(100_000));
        let job = DecorationJob::new(&source, 0);
        let decorations = lexer.decorate(&job, &highlighter()).unwrap().simplified(job.end());
        let expected: DecorationList = [
            (0, StyleTag::Keyword),
            (3, StyleTag::Plain),
            (5, StyleTag::Punctuation),
            (6, StyleTag::Plain),
        ]
        .into_iter()
        .collect();
        assert_eq!(decorations, expected);
    }

    #[test]
    fn test_failed_token_offset_honours_base() {
        let lexer = SourceOptions::new()
            .with_c_style_comments()
            .with_regex_literals(RegexLiterals::SingleLine)
            .build()
            .unwrap()
            .with_backtrack_limit(10_000)
            .unwrap();

        let source = format!("1 /*{}*/", "x".repeat(100_000));
        let job = DecorationJob::new(&source, 40);
        let decorations = lexer.decorate(&job, &highlighter()).unwrap();
        assert_eq!(decorations.style_at(40), Some(StyleTag::Literal));
        assert_eq!(decorations.as_slice().last(), Some(&Decoration::new(42, StyleTag::Plain)));
    }

    #[test]
    fn test_empty_capture_at_edge_does_not_recurse() {
        let outer = SimpleLexer::new(
            vec![],
            vec![TokenRule::new(RuleStyle::embedded("x"), RulePattern::new(r"^()<>")).unwrap()],
        )
        .unwrap();
        let job = DecorationJob::new("<>", 0);
        let decorations = outer.decorate(&job, &highlighter()).unwrap().simplified(job.end());
        assert_eq!(decorations.style_at(0), Some(StyleTag::Source));
    }
}
