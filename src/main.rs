//! prettify - decorate source code with syntax styles
//!
//! Reads a file (or stdin), guesses or takes its language, and writes it
//! out with ANSI colours, as HTML, or as a list of styled runs.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use prettify::config::Config;
use prettify::render::{self, OutputFormat};
use prettify::syntax::Highlighter;
use prettify::{PrettifyError, Result};

/// Command line options
#[derive(Debug, Default)]
struct Options {
    language: Option<String>,
    format: Option<OutputFormat>,
    collapse_whitespace: bool,
    file: Option<PathBuf>,
}

enum Command {
    Run(Options),
    Help,
    Version,
}

fn main() {
    // Log to stderr; stdout carries the decorated source
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_args(&args)? {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            print_version();
            return Ok(());
        }
        Command::Run(options) => options,
    };

    let config = Config::load()?;
    let mut highlighter = Highlighter::new()?;
    config.register_languages(highlighter.registry_mut())?;

    let text = match &options.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let language = resolve_language(&options, &config, &highlighter);
    debug!(language = ?language, "resolved language");

    let preformatted = config.preformatted && !options.collapse_whitespace;
    let highlighted = highlighter.highlight(&text, language.as_deref(), preformatted);

    let format = options.format.unwrap_or(config.format);
    let theme = config.theme()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::write(&mut out, &highlighted, format, &theme)
}

/// Language from the command line, then the file extension, then the
/// config file. `None` lets the highlighter sniff the source.
fn resolve_language(options: &Options, config: &Config, highlighter: &Highlighter) -> Option<String> {
    options
        .language
        .clone()
        .or_else(|| {
            options
                .file
                .as_deref()
                .and_then(|path: &Path| highlighter.registry().detect_language(path))
        })
        .or_else(|| config.default_language.clone())
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--lang" | "-l" => {
                let value = iter.next().ok_or_else(|| missing_value(arg))?;
                options.language = Some(value.clone());
            }
            "--format" | "-f" => {
                let value = iter.next().ok_or_else(|| missing_value(arg))?;
                options.format = Some(value.parse()?);
            }
            "--collapse-whitespace" => options.collapse_whitespace = true,
            "-" => options.file = None,
            _ if arg.starts_with('-') => {
                return Err(PrettifyError::Message(format!("unknown option: {arg}")));
            }
            _ => {
                if options.file.is_some() {
                    return Err(PrettifyError::Message("only one input file may be given".to_string()));
                }
                options.file = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(Command::Run(options))
}

fn missing_value(option: &str) -> PrettifyError {
    PrettifyError::Message(format!("option {option} needs a value"))
}

fn print_usage() {
    println!("prettify {} - syntax highlighter", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: prettify [OPTIONS] [FILE]");
    println!();
    println!("Reads standard input when no FILE (or -) is given.");
    println!();
    println!("Options:");
    println!("  -l, --lang LANG          Language key (c, js, py, html, ...)");
    println!("  -f, --format FORMAT      Output format: ansi, html or runs");
    println!("      --collapse-whitespace");
    println!("                           Treat the input as non-preformatted text");
    println!("  -h, --help               Show this help message");
    println!("  -V, --version            Show version information");
    println!();
    println!("Settings and extra languages are read from ~/.prettify.toml.");
    println!("Set RUST_LOG=debug to see how the language was chosen.");
}

fn print_version() {
    println!("prettify {}", env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_options(list: &[&str]) -> Options {
        match parse_args(&args(list)).unwrap() {
            Command::Run(options) => options,
            _ => panic!("expected options"),
        }
    }

    #[test]
    fn test_parse_args() {
        let options = run_options(&["-l", "py", "--format", "html", "--collapse-whitespace", "a.txt"]);
        assert_eq!(options.language.as_deref(), Some("py"));
        assert_eq!(options.format, Some(OutputFormat::Html));
        assert!(options.collapse_whitespace);
        assert_eq!(options.file, Some(PathBuf::from("a.txt")));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["-l"])).is_err());
        assert!(parse_args(&args(&["-f", "pdf"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["a", "b"])).is_err());
        assert!(matches!(parse_args(&args(&["-h"])).unwrap(), Command::Help));
        assert!(matches!(parse_args(&args(&["-V"])).unwrap(), Command::Version));
    }

    #[test]
    fn test_resolve_language_order() {
        let highlighter = Highlighter::new().unwrap();
        let config = Config {
            default_language: Some("c".to_string()),
            ..Config::default()
        };

        let options = run_options(&["-l", "js", "x.py"]);
        assert_eq!(resolve_language(&options, &config, &highlighter).as_deref(), Some("js"));

        let options = run_options(&["x.py"]);
        assert_eq!(resolve_language(&options, &config, &highlighter).as_deref(), Some("py"));

        let options = run_options(&["notes.txt"]);
        assert_eq!(resolve_language(&options, &config, &highlighter).as_deref(), Some("c"));

        let options = run_options(&[]);
        assert_eq!(resolve_language(&options, &Config::default(), &highlighter), None);
    }
}
