//! C family language definitions: C/C++/Objective-C, C# and Java

use super::{COMMON_ONLY_KEYWORDS, C_ONLY_KEYWORDS, FLOW_CONTROL_KEYWORDS};
use crate::error::Result;
use crate::syntax::registry::LanguageRegistry;
use crate::syntax::source::{HashComments, SourceOptions};

const CPP_ONLY_KEYWORDS: &str = "alignof,align_union,asm,axiom,bool,concept,concept_map,const_cast,\
     constexpr,decltype,delegate,dynamic_cast,explicit,export,friend,generic,late_check,mutable,\
     namespace,nullptr,property,reinterpret_cast,static_assert,static_cast,template,typeid,\
     typename,using,virtual,where";

const JAVA_ONLY_KEYWORDS: &str = "abstract,assert,boolean,byte,extends,final,finally,implements,\
     import,instanceof,interface,null,native,package,strictfp,super,synchronized,throws,transient";

const CSHARP_ONLY_KEYWORDS: &str = "abstract,as,base,bool,by,byte,checked,decimal,delegate,\
     descending,dynamic,event,finally,fixed,foreach,from,group,implicit,in,interface,internal,into,\
     is,let,lock,null,object,out,override,orderby,params,partial,readonly,ref,sbyte,sealed,\
     stackalloc,string,select,uint,ulong,unchecked,unsafe,ushort,var,virtual,where";

pub const CPP_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    C_ONLY_KEYWORDS,
    COMMON_ONLY_KEYWORDS,
    CPP_ONLY_KEYWORDS,
];

pub const JAVA_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    C_ONLY_KEYWORDS,
    COMMON_ONLY_KEYWORDS,
    JAVA_ONLY_KEYWORDS,
];

pub const CSHARP_KEYWORDS: &[&str] = &[
    FLOW_CONTROL_KEYWORDS,
    C_ONLY_KEYWORDS,
    COMMON_ONLY_KEYWORDS,
    CSHARP_ONLY_KEYWORDS,
];

/// Standard library types worth calling out in C-like code
pub const C_TYPES: &str = r"^(DIR|FILE|vector|(de|priority_)?queue|list|stack|(const_)?iterator|(multi)?(set|map)|bitset|u?(int|float)\d*)\b";

pub(super) fn register(registry: &mut LanguageRegistry) -> Result<()> {
    let c = SourceOptions::new()
        .with_keywords(CPP_KEYWORDS)
        .with_hash_comments(HashComments::Line)
        .with_c_style_comments()
        .with_types(C_TYPES)
        .build()?;
    registry.register(c, &["c", "cc", "cpp", "cxx", "cyc", "m"]);

    let csharp = SourceOptions::new()
        .with_keywords(CSHARP_KEYWORDS)
        .with_hash_comments(HashComments::Line)
        .with_c_style_comments()
        .with_verbatim_strings()
        .with_types(C_TYPES)
        .build()?;
    registry.register(csharp, &["cs"]);

    let java = SourceOptions::new()
        .with_keywords(JAVA_KEYWORDS)
        .with_c_style_comments()
        .build()?;
    registry.register(java, &["java"]);

    Ok(())
}
