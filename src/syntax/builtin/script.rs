//! Scripting language definitions: shell, Perl, Ruby, JavaScript and
//! CoffeeScript

use super::{COMMON_ONLY_KEYWORDS, C_ONLY_KEYWORDS, FLOW_CONTROL_KEYWORDS};
use crate::error::Result;
use crate::syntax::registry::LanguageRegistry;
use crate::syntax::source::{HashComments, RegexLiterals, SourceOptions};

pub const SH_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    "case,done,elif,esac,eval,fi,function,in,local,set,then,until",
];

pub const PERL_KEYWORDS: &[&str] = &["caller,delete,die,do,dump,elsif,eval,exit,foreach,for,goto,if,\
     import,last,local,my,next,no,our,print,package,redo,require,sub,undef,unless,until,use,\
     wantarray,while,BEGIN,END"];

pub const RUBY_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    "alias,and,begin,case,class,def,defined,elsif,end,ensure,false,in,module,next,nil,not,or,redo,\
     rescue,retry,self,super,then,true,undef,unless,until,when,yield,BEGIN,END",
];

pub const JSCRIPT_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    C_ONLY_KEYWORDS,
    COMMON_ONLY_KEYWORDS,
    "debugger,eval,export,function,get,null,set,undefined,var,with,Infinity,NaN",
];

pub const COFFEE_KEYWORDS: &[&str] = &["all,and,by,catch,class,else,extends,false,finally,for,if,in,is,\
     isnt,loop,new,no,not,null,of,off,on,or,return,super,then,throw,true,try,unless,until,when,\
     while,yes"];

pub(super) fn register(registry: &mut LanguageRegistry) -> Result<()> {
    let sh = SourceOptions::new()
        .with_keywords(SH_KEYWORDS)
        .with_hash_comments(HashComments::Line)
        .with_multi_line_strings()
        .build()?;
    registry.register(sh, &["bash", "bsh", "csh", "sh"]);

    let perl = SourceOptions::new()
        .with_keywords(PERL_KEYWORDS)
        .with_hash_comments(HashComments::Line)
        .with_multi_line_strings()
        .with_regex_literals(RegexLiterals::Multiline)
        .build()?;
    registry.register(perl, &["perl", "pl", "pm"]);

    let ruby = SourceOptions::new()
        .with_keywords(RUBY_KEYWORDS)
        .with_hash_comments(HashComments::Line)
        .with_multi_line_strings()
        .with_regex_literals(RegexLiterals::SingleLine)
        .build()?;
    registry.register(ruby, &["rb", "ruby"]);

    let javascript = SourceOptions::new()
        .with_keywords(JSCRIPT_KEYWORDS)
        .with_c_style_comments()
        .with_regex_literals(RegexLiterals::SingleLine)
        .build()?;
    registry.register(javascript, &["javascript", "js"]);

    let coffee = SourceOptions::new()
        .with_keywords(COFFEE_KEYWORDS)
        .with_hash_comments(HashComments::Block)
        .with_c_style_comments()
        .with_triple_quoted_strings()
        .with_regex_literals(RegexLiterals::SingleLine)
        .build()?;
    registry.register(coffee, &["coffee"]);

    Ok(())
}
