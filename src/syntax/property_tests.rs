//! Property-based tests for decoration.
//!
//! Over generated inputs, for several languages:
//!
//! 1. **Never panics**: any text decorates to some list
//! 2. **Offsets are well formed**: strictly increasing, inside the source,
//!    the first at 0
//! 3. **Runs cover the source**: joining the spans gives the source back
//! 4. **Already simple**: simplifying the result changes nothing
//! 5. **Deterministic**: the same input decorates the same way twice

use once_cell::sync::Lazy;
use proptest::prelude::*;

use super::engine::{Highlighted, Highlighter};

static HIGHLIGHTER: Lazy<Highlighter> =
    Lazy::new(|| Highlighter::new().expect("built-in languages compile"));

const LANGUAGES: &[Option<&str>] = &[None, Some("js"), Some("html"), Some("py"), Some("c")];

/// Fragments that exercise the interesting rules
const FRAGMENTS: &[&str] = &[
    "\"str\"",
    "'c'",
    "\"unterminated",
    "/* block */",
    "// line\n",
    "# hash\n",
    "/re+/g",
    " / ",
    "0x1F",
    "3.14e-2",
    "if",
    "return",
    "<p class=x>",
    "</p>",
    "<script>a<b</script>",
    "<!-- c -->",
    "<?php ?>",
    "@\"v\"",
    "\"\"\"doc\"\"\"",
    "Foo",
    "\t\n",
    "é",
    "{}",
];

fn language() -> impl Strategy<Value = Option<&'static str>> {
    prop::sample::select(LANGUAGES)
}

fn code_like() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..20).prop_map(|parts| parts.concat())
}

fn any_text() -> impl Strategy<Value = String> {
    prop_oneof!["\\PC{0,200}", code_like()]
}

fn check_well_formed(source: &str, language: Option<&str>) -> Result<(), TestCaseError> {
    let decorations = HIGHLIGHTER.decorate(source, language);

    if source.is_empty() {
        prop_assert!(decorations.is_empty());
        return Ok(());
    }

    let positions: Vec<usize> = decorations.iter().map(|d| d.pos).collect();
    prop_assert_eq!(positions.first().copied(), Some(0));
    for pair in positions.windows(2) {
        prop_assert!(pair[0] < pair[1], "offsets not increasing: {:?}", positions);
    }
    for &pos in &positions {
        prop_assert!(pos < source.len());
        prop_assert!(source.is_char_boundary(pos));
    }

    prop_assert_eq!(decorations.clone().simplified(source.len()), decorations.clone());

    let highlighted = Highlighted {
        source: source.to_string(),
        decorations,
    };
    let rebuilt: String = highlighted.spans().map(|(text, _)| text).collect();
    prop_assert_eq!(rebuilt, source);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn decorations_well_formed(source in any_text(), language in language()) {
        check_well_formed(&source, language)?;
    }

    #[test]
    fn decoration_is_deterministic(source in code_like(), language in language()) {
        let first = HIGHLIGHTER.decorate(&source, language);
        let second = HIGHLIGHTER.decorate(&source, language);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn collapsed_text_decorates(source in any_text()) {
        let highlighted = HIGHLIGHTER.highlight(&source, None, false);
        prop_assert!(!highlighted.source.contains('\n'));
        check_well_formed(&highlighted.source, None)?;
    }
}
