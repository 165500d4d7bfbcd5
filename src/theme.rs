//! Terminal themes
//!
//! A theme maps each style tag to the look it gets when decorated source
//! is written to a terminal. Looks are written as words: a color name plus
//! any of `bold`, `italic` and `underline`.
//!
//! ```toml
//! [theme]
//! kwd = "bright-blue bold"
//! comment = "bright-black italic"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{PrettifyError, Result};
use crate::syntax::StyleTag;

/// Terminal colors (ANSI 16-color palette)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    const NAMES: [(&'static str, Color); 17] = [
        ("default", Color::Default),
        ("black", Color::Black),
        ("red", Color::Red),
        ("green", Color::Green),
        ("yellow", Color::Yellow),
        ("blue", Color::Blue),
        ("magenta", Color::Magenta),
        ("cyan", Color::Cyan),
        ("white", Color::White),
        ("bright-black", Color::BrightBlack),
        ("bright-red", Color::BrightRed),
        ("bright-green", Color::BrightGreen),
        ("bright-yellow", Color::BrightYellow),
        ("bright-blue", Color::BrightBlue),
        ("bright-magenta", Color::BrightMagenta),
        ("bright-cyan", Color::BrightCyan),
        ("bright-white", Color::BrightWhite),
    ];

    pub fn name(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, color)| color == self)
            .map_or("default", |(name, _)| name)
    }
}

impl FromStr for Color {
    type Err = PrettifyError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|&(_, color)| color)
            .ok_or_else(|| PrettifyError::UnknownColor(s.to_string()))
    }
}

/// How one run of text is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// No color and no attributes; written without escape sequences
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl FromStr for Style {
    type Err = PrettifyError;

    /// Parses looks such as `"green"`, `"bold"` or `"bright-black italic"`
    fn from_str(s: &str) -> Result<Self> {
        let mut style = Style::default();
        for word in s.split_whitespace() {
            match word.to_ascii_lowercase().as_str() {
                "bold" => style.bold = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                _ => style.fg = word.parse()?,
            }
        }
        Ok(style)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fg.name())?;
        for (set, attribute) in [(self.bold, "bold"), (self.italic, "italic"), (self.underline, "underline")] {
            if set {
                write!(f, " {attribute}")?;
            }
        }
        Ok(())
    }
}

/// Style per tag for terminal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    styles: HashMap<StyleTag, Style>,
}

impl Default for Theme {
    fn default() -> Self {
        let styles = StyleTag::ALL
            .into_iter()
            .map(|tag| {
                let style = match tag {
                    StyleTag::Plain | StyleTag::Punctuation | StyleTag::NoCode => Style::default(),
                    StyleTag::String | StyleTag::AttribValue => Style::fg(Color::Green),
                    StyleTag::Keyword => Style::fg(Color::Magenta).with_bold(),
                    StyleTag::Comment => Style::fg(Color::BrightBlack).with_italic(),
                    StyleTag::Type => Style::fg(Color::Yellow),
                    StyleTag::Literal => Style::fg(Color::Cyan),
                    StyleTag::Tag => Style::fg(Color::Blue).with_bold(),
                    StyleTag::Declaration => Style::fg(Color::BrightMagenta),
                    StyleTag::Source => Style::fg(Color::BrightYellow),
                    StyleTag::AttribName => Style::fg(Color::BrightBlue),
                };
                (tag, style)
            })
            .collect();
        Self { styles }
    }
}

impl Theme {
    pub fn style(&self, tag: StyleTag) -> Style {
        self.styles.get(&tag).copied().unwrap_or_default()
    }

    pub fn set(&mut self, tag: StyleTag, style: Style) {
        self.styles.insert(tag, style);
    }

    /// The default theme with some tags restyled. Keys are style names
    /// (`keyword` or `kwd`), values are looks.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self> {
        let mut theme = Self::default();
        for (name, look) in overrides {
            theme.set(name.parse()?, look.parse()?);
        }
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_look() {
        let style: Style = "bright-red bold underline".parse().unwrap();
        assert_eq!(style.fg, Color::BrightRed);
        assert!(style.bold);
        assert!(style.underline);
        assert!(!style.italic);
        assert_eq!(style.to_string(), "bright-red bold underline");

        let style: Style = "Italic".parse().unwrap();
        assert_eq!(style, Style::default().with_italic());
        assert_eq!("bright_cyan".parse::<Color>().unwrap(), Color::BrightCyan);
    }

    #[test]
    fn test_parse_look_errors() {
        assert!(matches!("blink".parse::<Style>(), Err(PrettifyError::UnknownColor(_))));
        assert!("".parse::<Style>().unwrap().is_default());
    }

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert!(!theme.style(StyleTag::Comment).is_default());
        assert!(theme.style(StyleTag::Keyword).bold);
        // Plain and punctuation are left unstyled
        assert!(theme.style(StyleTag::Plain).is_default());
        assert!(theme.style(StyleTag::Punctuation).is_default());
    }

    #[test]
    fn test_overrides() {
        let overrides = HashMap::from([
            ("kwd".to_string(), "red".to_string()),
            ("punctuation".to_string(), "white bold".to_string()),
        ]);
        let theme = Theme::with_overrides(&overrides).unwrap();
        assert_eq!(theme.style(StyleTag::Keyword), Style::fg(Color::Red));
        assert_eq!(theme.style(StyleTag::Punctuation), Style::fg(Color::White).with_bold());
        assert_eq!(theme.style(StyleTag::Comment), Theme::default().style(StyleTag::Comment));

        let bad = HashMap::from([("shiny".to_string(), "red".to_string())]);
        assert!(matches!(Theme::with_overrides(&bad), Err(PrettifyError::UnknownStyle(_))));
    }
}
