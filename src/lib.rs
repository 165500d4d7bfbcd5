//! prettify - a regex-driven source code highlighter
//!
//! Turns plain source text into a run-length encoded list of
//! `(offset, style)` decorations, recursing into embedded languages
//! such as script inside markup.
//!
//! ```no_run
//! use prettify::syntax::Highlighter;
//!
//! let highlighter = Highlighter::new()?;
//! let highlighted = highlighter.highlight("int x = 42;", Some("c"), true);
//! for (text, style) in highlighted.spans() {
//!     println!("{style}: {text:?}");
//! }
//! # Ok::<(), prettify::error::PrettifyError>(())
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod syntax;
pub mod theme;

pub use error::{PrettifyError, Result};
