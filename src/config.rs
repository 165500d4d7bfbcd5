//! Configuration file support
//!
//! Loads settings from ~/.prettify.toml (or %USERPROFILE%\.prettify.toml on
//! Windows). A missing file means default settings.
//!
//! Example:
//! ```toml
//! preformatted = true
//! default-language = "c"
//! format = "ansi"
//!
//! [theme]
//! kwd = "bright-blue bold"
//!
//! # A language described by source options
//! [[language]]
//! keys = ["lua"]
//! keywords = ["and,break,do,else,elseif,end,for,function,if,in,local,nil,not,or,repeat,return,then,until,while"]
//! multi-line-strings = true
//!
//! # A language described by explicit rules
//! [[language]]
//! keys = ["ini"]
//!
//! [[language.rules]]
//! style = "com"
//! pattern = "^[;#][^\\n]*"
//! shortcut = ";#"
//! fallthrough = false
//!
//! [[language.rules]]
//! style = "kwd"
//! pattern = "^\\[[^\\]\\n]*\\]"
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::render::OutputFormat;
use crate::syntax::{LanguageRegistry, RulePattern, RuleStyle, SimpleLexer, SourceOptions, TokenRule};
use crate::theme::Theme;

const CONFIG_FILE: &str = ".prettify.toml";

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Keep whitespace as is (only line endings are unified)
    pub preformatted: bool,
    /// Language used when neither the command line nor the file name says
    pub default_language: Option<String>,
    /// Output format
    pub format: OutputFormat,
    /// Terminal looks by style name, e.g. `kwd = "blue bold"`
    pub theme: HashMap<String, String>,
    /// User-defined languages
    #[serde(rename = "language")]
    pub languages: Vec<LanguageConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preformatted: true,
            default_language: None,
            format: OutputFormat::default(),
            theme: HashMap::new(),
            languages: Vec::new(),
        }
    }
}

/// A user-defined language
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageConfig {
    /// Keys (usually file extensions) the language is registered under
    pub keys: Vec<String>,
    /// Explicit token rules; when empty the source options are used
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    #[serde(flatten)]
    pub options: SourceOptions,
}

/// One token rule of a user-defined language
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleConfig {
    /// Style name (`kwd`, `keyword`, ...) or `lang-<key>`
    pub style: String,
    pub pattern: String,
    /// Pattern flags; only `i` is accepted
    #[serde(default)]
    pub flags: String,
    /// Characters that dispatch straight to this rule
    pub shortcut: Option<String>,
    /// Tried in order after the shortcut rules
    #[serde(default = "default_true")]
    pub fallthrough: bool,
}

fn default_true() -> bool {
    true
}

impl RuleConfig {
    /// Compile into a token rule
    pub fn to_rule(&self) -> Result<TokenRule> {
        let style: RuleStyle = self.style.parse()?;
        let pattern = RulePattern::with_flags(self.pattern.as_str(), &self.flags)?;
        let rule = TokenRule::new(style, pattern)?;
        Ok(match &self.shortcut {
            Some(chars) => rule.with_shortcuts(chars),
            None => rule,
        })
    }
}

impl LanguageConfig {
    /// Build the lexer for this language
    pub fn build(&self) -> Result<SimpleLexer> {
        if self.rules.is_empty() {
            return self.options.build();
        }

        let mut shortcuts = Vec::new();
        let mut fallthrough = Vec::new();
        for rule in &self.rules {
            if rule.fallthrough {
                fallthrough.push(rule.to_rule()?);
            } else {
                shortcuts.push(rule.to_rule()?);
            }
        }
        SimpleLexer::new(shortcuts, fallthrough)
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE))
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a file; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                debug!(path = %path.display(), "loading configuration");
                Self::from_toml(&contents)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse configuration text
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// The default theme with this file's overrides applied
    pub fn theme(&self) -> Result<Theme> {
        Theme::with_overrides(&self.theme)
    }

    /// Register the user-defined languages. Keys already taken (including
    /// built-in ones) are left alone.
    pub fn register_languages(&self, registry: &mut LanguageRegistry) -> Result<()> {
        for language in &self.languages {
            let keys: Vec<&str> = language.keys.iter().map(String::as_str).collect();
            registry.register(language.build()?, &keys);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrettifyError;
    use crate::syntax::{HashComments, Highlighter, StyleTag};
    use crate::theme::Style;

    const EXAMPLE: &str = r#"
preformatted = false
default-language = "c"
format = "html"

[theme]
comment = "red italic"

[[language]]
keys = ["lua"]
keywords = ["local,function,end"]
hash-comments = "line"

[[language]]
keys = ["ini", "cfg"]

[[language.rules]]
style = "com"
pattern = "^;[^\\n]*"
shortcut = ";"
fallthrough = false

[[language.rules]]
style = "keyword"
pattern = "^\\[[^\\]\\n]*\\]"
"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.preformatted);
        assert_eq!(config.format, OutputFormat::Ansi);
        assert!(config.languages.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml(EXAMPLE).unwrap();
        assert!(!config.preformatted);
        assert_eq!(config.default_language.as_deref(), Some("c"));
        assert_eq!(config.format, OutputFormat::Html);
        assert_eq!(config.languages.len(), 2);
        assert_eq!(
            config.theme().unwrap().style(StyleTag::Comment),
            "red italic".parse::<Style>().unwrap()
        );

        let lua = &config.languages[0];
        assert_eq!(lua.keys, vec!["lua".to_string()]);
        assert_eq!(lua.options.hash_comments, HashComments::Line);
        assert!(lua.rules.is_empty());

        let ini = &config.languages[1];
        assert_eq!(ini.rules.len(), 2);
        assert!(!ini.rules[0].fallthrough);
        assert!(ini.rules[1].fallthrough);
        assert_eq!(ini.rules[0].shortcut.as_deref(), Some(";"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("preformatted = maybe"),
            Err(PrettifyError::Config(_))
        ));
    }

    #[test]
    fn test_user_languages_highlight() {
        let config = Config::from_toml(EXAMPLE).unwrap();
        let mut highlighter = Highlighter::new().unwrap();
        config.register_languages(highlighter.registry_mut()).unwrap();

        let source = "local x # note";
        let decorations = highlighter.decorate(source, Some("lua"));
        assert_eq!(decorations.style_at(0), Some(StyleTag::Keyword));
        assert_eq!(decorations.style_at(8), Some(StyleTag::Comment));

        let source = "[core]\n; comment";
        let decorations = highlighter.decorate(source, Some("cfg"));
        assert_eq!(decorations.style_at(0), Some(StyleTag::Keyword));
        assert_eq!(decorations.style_at(7), Some(StyleTag::Comment));
    }

    #[test]
    fn test_builtin_keys_not_overridden() {
        let config = Config::from_toml(
            r#"
            [[language]]
            keys = ["c"]
            [[language.rules]]
            style = "str"
            pattern = "^[\\s\\S]+"
            "#,
        )
        .unwrap();
        let mut highlighter = Highlighter::new().unwrap();
        config.register_languages(highlighter.registry_mut()).unwrap();
        let decorations = highlighter.decorate("return", Some("c"));
        assert_eq!(decorations.style_at(0), Some(StyleTag::Keyword));
    }

    #[test]
    fn test_bad_rules_rejected() {
        let rule = |style: &str, pattern: &str, flags: &str| RuleConfig {
            style: style.to_string(),
            pattern: pattern.to_string(),
            flags: flags.to_string(),
            shortcut: None,
            fallthrough: true,
        };
        assert!(matches!(rule("bold", "^x", "").to_rule(), Err(PrettifyError::UnknownStyle(_))));
        assert!(matches!(rule("kwd", "^x", "g").to_rule(), Err(PrettifyError::UnsupportedFlags(_))));
        assert!(matches!(rule("kwd", "^(x", "").to_rule(), Err(PrettifyError::Pattern { .. })));
        assert!(rule("lang-js", "^<(.*)>", "i").to_rule().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("prettify-config-that-does-not-exist.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
