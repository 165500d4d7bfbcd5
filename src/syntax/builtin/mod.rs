//! Built-in language definitions
//!
//! This module registers lexers for common programming languages and
//! markup. Keyword lists are kept as comma separated groups so related
//! languages can share them.

mod c;
mod markup;
mod python;
mod rust;
mod script;

use super::lexer::SimpleLexer;
use super::pattern::RulePattern;
use super::registry::{LanguageRegistry, DEFAULT_CODE};
use super::rules::TokenRule;
use super::source::{HashComments, RegexLiterals, SourceOptions, REGEX_LANGUAGE};
use super::tokens::StyleTag;
use crate::error::Result;

pub(super) const FLOW_CONTROL_KEYWORDS: &str = "break,continue,do,else,for,if,return,while";

pub(super) const C_ONLY_KEYWORDS: &str = "auto,case,char,const,default,double,enum,extern,float,goto,inline,int,\
     long,register,short,signed,sizeof,static,struct,switch,typedef,union,unsigned,void,volatile";

/// Keywords shared by the C family of object languages, on top of C's own
pub(super) const COMMON_ONLY_KEYWORDS: &str = "catch,class,delete,false,import,new,operator,private,protected,\
     public,this,throw,true,try,typeof";

/// Every keyword known to any built-in language, for code of unknown language
fn all_keywords() -> Vec<&'static str> {
    [
        c::CPP_KEYWORDS,
        c::CSHARP_KEYWORDS,
        script::JSCRIPT_KEYWORDS,
        script::PERL_KEYWORDS,
        python::PYTHON_KEYWORDS,
        script::RUBY_KEYWORDS,
        script::SH_KEYWORDS,
    ]
    .concat()
}

/// Lexer giving its whole input a single style
fn single_style_lexer(style: StyleTag) -> Result<SimpleLexer> {
    SimpleLexer::new(vec![], vec![TokenRule::new(style, RulePattern::new(r"^[\s\S]+"))?])
}

/// Register every built-in language
pub fn register_all(registry: &mut LanguageRegistry) -> Result<()> {
    let default_code = SourceOptions::new()
        .with_keywords(&all_keywords())
        .with_hash_comments(HashComments::Line)
        .with_c_style_comments()
        .with_multi_line_strings()
        .with_regex_literals(RegexLiterals::SingleLine)
        .build()?;
    registry.register(default_code, &[DEFAULT_CODE]);

    markup::register(registry)?;
    c::register(registry)?;

    let json = SourceOptions::new().with_keywords(&["null,true,false"]).build()?;
    registry.register(json, &["json"]);

    script::register(registry)?;
    python::register(registry)?;
    rust::register(registry)?;

    registry.register(single_style_lexer(StyleTag::String)?, &[REGEX_LANGUAGE]);
    Ok(())
}
