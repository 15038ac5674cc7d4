//! Command-line interface module.
//!
//! Every command reads one or more icons (`-` for stdin), works on them
//! through the engine, and writes documents or JSON to stdout unless told
//! otherwise. Diagnostics go to stderr through the logger.

mod args;
pub mod edit;
pub mod inspect;
pub mod preview;

pub use args::{Cli, Commands, EditArgs, HexArg, ModeArg, SourceArgs};

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use crate::color::{Hex8, NormalizedColor, normalize};
use crate::engine::{ColorConfiguration, EditSession};
use crate::log;
use crate::logger::status_warning;

pub const NOTHING_CUSTOMIZABLE: &str = "no customizable colors detected";

/// Read an SVG file, or stdin for `-`.
pub fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read SVG from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read `{}`", path.display()))
}

/// Write `text` to `output`, or stdout when absent.
pub fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write `{}`", path.display()))?;
            log!("write"; "wrote {}", path.display());
        }
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{text}")?;
            out.flush()?;
            crate::logger::note_output();
        }
    }
    Ok(())
}

/// Load and check a saved `svg-color-map` configuration.
pub fn load_configuration(path: &Path) -> Result<ColorConfiguration> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read `{}`", path.display()))?;
    ColorConfiguration::from_json(&text)
        .with_context(|| format!("Invalid color configuration `{}`", path.display()))
}

/// Read the icon and start an edit session, resuming saved edits if given.
///
/// Returns the source alongside `None` (after telling the user) when the
/// icon has nothing to customize.
pub fn open_session(source: &SourceArgs) -> Result<(String, Option<EditSession>)> {
    let svg = read_source(&source.file)?;
    let describe = || format!("Failed to load `{}`", source.file.display());

    let session = match &source.mapping {
        Some(mapping) => {
            let config = load_configuration(mapping)?;
            EditSession::resume(&svg, &config).with_context(describe)?
        }
        None => EditSession::open(&svg).with_context(describe)?,
    };

    if session.is_none() {
        status_warning(NOTHING_CUSTOMIZABLE);
    }
    Ok((svg, session))
}

/// Parse a user-supplied color into a concrete HEX8.
pub fn parse_color(raw: &str) -> Result<Hex8> {
    match normalize(raw) {
        Some(NormalizedColor::Hex(color)) => Ok(color),
        Some(_) => bail!("`{raw}` is not a solid color"),
        None => Err(anyhow!("unsupported color `{raw}`")),
    }
}

/// Format count with singular/plural noun
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#0f0").unwrap(), Hex8::opaque(0, 255, 0));
        assert_eq!(parse_color("rgba(0,0,255,0.5)").unwrap().a, 128);
        assert!(parse_color("none").is_err());
        assert!(parse_color("url(#g)").is_err());
        assert!(parse_color("not-a-color").is_err());
    }

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(1, "path"), "1 path");
        assert_eq!(plural_count(3, "path"), "3 paths");
        assert_eq!(plural_count(0, "color"), "0 colors");
    }

    #[test]
    fn test_open_session_resumes_mapping() {
        let dir = TempDir::new().unwrap();
        let icon = dir.path().join("icon.svg");
        fs::write(&icon, r#"<svg><path fill="red"/></svg>"#).unwrap();
        let mapping = dir.path().join("map.json");
        fs::write(
            &mapping,
            r##"{"type":"svg-color-map","version":1,"mappings":{"path[0]":{"fill":{"original":"#FF0000FF","current":"#0000FFFF","isGradient":false}}}}"##,
        )
        .unwrap();

        let source = SourceArgs {
            file: icon,
            mapping: Some(mapping),
        };
        let (_, session) = open_session(&source).unwrap();
        assert_eq!(
            session.unwrap().render(),
            r##"<svg><path fill="#0000FF"/></svg>"##
        );
    }

    #[test]
    fn test_open_session_nothing_customizable() {
        let dir = TempDir::new().unwrap();
        let icon = dir.path().join("empty.svg");
        fs::write(&icon, "<svg><g/></svg>").unwrap();
        let source = SourceArgs {
            file: icon,
            mapping: None,
        };
        let (svg, session) = open_session(&source).unwrap();
        assert_eq!(svg, "<svg><g/></svg>");
        assert!(session.is_none());
        assert!(read_source(&PathBuf::from("/nonexistent/icon.svg")).is_err());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.svg");
        write_output(Some(&out), "<svg/>").unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), "<svg/>");
    }
}
