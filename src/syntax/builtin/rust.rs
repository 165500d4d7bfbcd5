//! Rust language definition

use super::FLOW_CONTROL_KEYWORDS;
use crate::error::Result;
use crate::syntax::registry::LanguageRegistry;
use crate::syntax::source::SourceOptions;

pub const RUST_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    "as,assert,const,copy,drop,enum,extern,fail,false,fn,impl,let,log,loop,match,mod,move,mut,\
     priv,pub,pure,ref,self,static,struct,true,trait,type,unsafe,use",
];

pub(super) fn register(registry: &mut LanguageRegistry) -> Result<()> {
    // Strings stay single-line, which keeps a stray lifetime quote from
    // swallowing the rest of the file
    let rust = SourceOptions::new()
        .with_keywords(RUST_KEYWORDS)
        .with_c_style_comments()
        .build()?;
    registry.register(rust, &["rc", "rs", "rust"]);
    Ok(())
}
