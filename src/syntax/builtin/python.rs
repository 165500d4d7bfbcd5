//! Python language definition

use super::FLOW_CONTROL_KEYWORDS;
use crate::error::Result;
use crate::syntax::registry::LanguageRegistry;
use crate::syntax::source::{HashComments, SourceOptions};

pub const PYTHON_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    "and,as,assert,class,def,del,elif,except,exec,finally,from,global,import,in,is,lambda,\
     nonlocal,not,or,pass,print,raise,try,with,yield,False,True,None",
];

pub(super) fn register(registry: &mut LanguageRegistry) -> Result<()> {
    let python = SourceOptions::new()
        .with_keywords(PYTHON_KEYWORDS)
        .with_hash_comments(HashComments::Line)
        .with_multi_line_strings()
        .with_triple_quoted_strings()
        .build()?;
    registry.register(python, &["cv", "py", "python"]);
    Ok(())
}
