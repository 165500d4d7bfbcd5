//! Markup language definitions
//!
//! Markup is decorated in layers: the document lexer finds tags, comments
//! and script or style blocks, tags are handed to the `in.tag` lexer, and
//! unquoted attribute values to `uq.val`.

use crate::error::Result;
use crate::syntax::lexer::SimpleLexer;
use crate::syntax::pattern::RulePattern;
use crate::syntax::registry::{LanguageRegistry, DEFAULT_MARKUP};
use crate::syntax::rules::{RuleStyle, TokenRule};
use crate::syntax::tokens::StyleTag;

/// Key of the lexer for the inside of a tag
pub const IN_TAG: &str = "in.tag";
/// Key of the lexer for unquoted attribute values
pub const UNQUOTED_VALUE: &str = "uq.val";

fn document_lexer() -> Result<SimpleLexer> {
    SimpleLexer::new(
        vec![],
        vec![
            TokenRule::new(StyleTag::Plain, RulePattern::new(r"^[^<?]+"))?,
            TokenRule::new(StyleTag::Declaration, RulePattern::new(r"^<!\w[^>]*(?:>|$)"))?,
            TokenRule::new(StyleTag::Comment, RulePattern::new(r"^<!--[\s\S]*?(?:-->|$)"))?,
            // Unescaped content in an unknown language
            TokenRule::new(RuleStyle::embedded(""), RulePattern::new(r"^<\?([\s\S]+?)(?:\?>|$)"))?,
            TokenRule::new(RuleStyle::embedded(""), RulePattern::new(r"^<%([\s\S]+?)(?:%>|$)"))?,
            TokenRule::new(StyleTag::Punctuation, RulePattern::new(r"^(?:<[%?]|[%?]>)"))?,
            TokenRule::new(
                RuleStyle::embedded(""),
                RulePattern::ignore_case(r"^<xmp\b[^>]*>([\s\S]+?)</xmp\b[^>]*>"),
            )?,
            TokenRule::new(
                RuleStyle::embedded("js"),
                RulePattern::ignore_case(r"^<script\b[^>]*>([\s\S]*?)(</script\b[^>]*>)"),
            )?,
            TokenRule::new(
                RuleStyle::embedded("css"),
                RulePattern::ignore_case(r"^<style\b[^>]*>([\s\S]*?)(</style\b[^>]*>)"),
            )?,
            TokenRule::new(RuleStyle::embedded(IN_TAG), RulePattern::ignore_case(r"^(</?[a-z][^<>]*>)"))?,
        ],
    )
}

fn tag_lexer() -> Result<SimpleLexer> {
    SimpleLexer::new(
        vec![
            TokenRule::new(StyleTag::Plain, RulePattern::new(r"^\s+"))?.with_shortcuts(" \t\r\n"),
            TokenRule::new(StyleTag::AttribValue, RulePattern::new(r#"^(?:"[^"]*"?|'[^']*'?)"#))?
                .with_shortcuts("\"'"),
        ],
        vec![
            TokenRule::new(StyleTag::Tag, RulePattern::ignore_case(r"^^</?[a-z](?:[\w.:\-]*\w)?|^/?>$"))?,
            TokenRule::new(
                StyleTag::AttribName,
                RulePattern::ignore_case(r"^(?!style[\s=]|on)[a-z](?:[\w:\-]*\w)?"),
            )?,
            TokenRule::new(
                RuleStyle::embedded(UNQUOTED_VALUE),
                RulePattern::new(r#"^=\s*([^>'"\s]*(?:[^>'"\s/]|/(?=\s)))"#),
            )?,
            TokenRule::new(StyleTag::Punctuation, RulePattern::new(r"^[=<>/]+"))?,
            TokenRule::new(RuleStyle::embedded("js"), RulePattern::ignore_case(r#"^on\w+\s*=\s*"([^"]+)""#))?,
            TokenRule::new(RuleStyle::embedded("js"), RulePattern::ignore_case(r"^on\w+\s*=\s*'([^']+)'"))?,
            TokenRule::new(
                RuleStyle::embedded("js"),
                RulePattern::ignore_case(r#"^on\w+\s*=\s*([^"'>\s]+)"#),
            )?,
            TokenRule::new(
                RuleStyle::embedded("css"),
                RulePattern::ignore_case(r#"^style\s*=\s*"([^"]+)""#),
            )?,
            TokenRule::new(RuleStyle::embedded("css"), RulePattern::ignore_case(r"^style\s*=\s*'([^']+)'"))?,
            TokenRule::new(
                RuleStyle::embedded("css"),
                RulePattern::ignore_case(r#"^style\s*=\s*([^"'>\s]+)"#),
            )?,
        ],
    )
}

pub(super) fn register(registry: &mut LanguageRegistry) -> Result<()> {
    registry.register(
        document_lexer()?,
        &[DEFAULT_MARKUP, "htm", "html", "mxml", "xhtml", "xml", "xsl"],
    );
    registry.register(tag_lexer()?, &[IN_TAG]);
    registry.register(super::single_style_lexer(StyleTag::AttribValue)?, &[UNQUOTED_VALUE]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::Resolution;

    #[test]
    fn test_script_block_is_one_token() {
        let lexer = document_lexer().unwrap();
        let source = "<p><SCRIPT type=x>a < b</script></p>";
        let tokens = lexer.tokenize(source).unwrap();
        assert_eq!(tokens, vec!["<p>", "<SCRIPT type=x>a < b</script>", "</p>"]);
        assert_eq!(
            lexer.resolve(tokens[1]).unwrap(),
            Resolution::Embedded { language: "js", region: 15..20 }
        );
    }

    #[test]
    fn test_empty_script_block() {
        let lexer = document_lexer().unwrap();
        let resolution = lexer.resolve("<script></script>").unwrap();
        assert_eq!(resolution, Resolution::Embedded { language: "js", region: 8..8 });
    }

    #[test]
    fn test_tag_tokens() {
        let lexer = tag_lexer().unwrap();
        let tokens = lexer.tokenize(r#"<img src="a.png" alt=b/>"#).unwrap();
        assert_eq!(tokens, vec!["<img", " ", "src", "=", r#""a.png""#, " ", "alt", "=b", "/>"]);
    }

    #[test]
    fn test_style_attribute_embeds_css() {
        let lexer = tag_lexer().unwrap();
        let tokens = lexer.tokenize(r#"<p style="color: red">"#).unwrap();
        assert_eq!(tokens[2], r#"style="color: red""#);
        assert_eq!(
            lexer.resolve(tokens[2]).unwrap(),
            Resolution::Embedded { language: "css", region: 7..17 }
        );
    }
}
