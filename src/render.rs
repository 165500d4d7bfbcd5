//! Output renderers
//!
//! Turns decorated source into HTML spans, ANSI-coloured terminal text, or
//! a plain listing of the runs.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crossterm::queue;
use crossterm::style::{self, Attribute, Print, SetAttribute, SetForegroundColor};
use serde::Deserialize;

use crate::error::{PrettifyError, Result};
use crate::syntax::Highlighted;
use crate::theme::{Color, Style, Theme};

/// How decorated source is written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Ansi,
    Html,
    Runs,
}

impl FromStr for OutputFormat {
    type Err = PrettifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ansi" => Ok(OutputFormat::Ansi),
            "html" => Ok(OutputFormat::Html),
            "runs" => Ok(OutputFormat::Runs),
            _ => Err(PrettifyError::Message(format!("unknown output format: {s}"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Ansi => "ansi",
            OutputFormat::Html => "html",
            OutputFormat::Runs => "runs",
        })
    }
}

impl From<Color> for style::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Default => style::Color::Reset,
            Color::Black => style::Color::Black,
            Color::Red => style::Color::DarkRed,
            Color::Green => style::Color::DarkGreen,
            Color::Yellow => style::Color::DarkYellow,
            Color::Blue => style::Color::DarkBlue,
            Color::Magenta => style::Color::DarkMagenta,
            Color::Cyan => style::Color::DarkCyan,
            Color::White => style::Color::Grey,
            Color::BrightBlack => style::Color::DarkGrey,
            Color::BrightRed => style::Color::Red,
            Color::BrightGreen => style::Color::Green,
            Color::BrightYellow => style::Color::Yellow,
            Color::BrightBlue => style::Color::Blue,
            Color::BrightMagenta => style::Color::Magenta,
            Color::BrightCyan => style::Color::Cyan,
            Color::BrightWhite => style::Color::White,
        }
    }
}

/// Escape text for use in HTML element content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render as HTML, one `<span class="...">` per run
pub fn to_html(highlighted: &Highlighted) -> String {
    let mut html = String::with_capacity(highlighted.source.len() * 2);
    for (text, tag) in highlighted.spans() {
        html.push_str("<span class=\"");
        html.push_str(tag.class_name());
        html.push_str("\">");
        html.push_str(&escape_html(text));
        html.push_str("</span>");
    }
    html
}

fn queue_style<W: Write>(out: &mut W, style: Style) -> Result<()> {
    if style.fg != Color::Default {
        queue!(out, SetForegroundColor(style.fg.into()))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    Ok(())
}

/// Write with ANSI colours, painting each run with its theme style
pub fn write_ansi<W: Write>(out: &mut W, highlighted: &Highlighted, theme: &Theme) -> Result<()> {
    for (text, tag) in highlighted.spans() {
        let style = theme.style(tag);
        if style.is_default() {
            queue!(out, Print(text))?;
        } else {
            queue_style(out, style)?;
            queue!(out, Print(text), SetAttribute(Attribute::Reset))?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write one `start end class` line per run
pub fn write_runs<W: Write>(out: &mut W, highlighted: &Highlighted) -> Result<()> {
    for (range, tag) in highlighted.decorations.runs(highlighted.source.len()) {
        writeln!(out, "{} {} {}", range.start, range.end, tag.class_name())?;
    }
    Ok(())
}

/// Write in the given format
pub fn write<W: Write>(
    out: &mut W,
    highlighted: &Highlighted,
    format: OutputFormat,
    theme: &Theme,
) -> Result<()> {
    match format {
        OutputFormat::Ansi => write_ansi(out, highlighted, theme),
        OutputFormat::Html => {
            writeln!(out, "<pre class=\"prettyprint\">{}</pre>", to_html(highlighted))?;
            Ok(())
        }
        OutputFormat::Runs => write_runs(out, highlighted),
    }
}
