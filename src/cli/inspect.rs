//! Inspect command implementation.
//!
//! Builds the color state of each icon in parallel and prints it as JSON:
//! the full map, the derived slots, or the implicit groups.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::{Map, Value as JsonValue};

use super::{NOTHING_CUSTOMIZABLE, plural_count, read_source, write_output};
use crate::engine::{self, derive_slots, implicit_groups};
use crate::log;
use crate::logger::status_warning;

/// What to print for each icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectView {
    /// `{elementColorMap, gradientDefinitions}`
    Map,
    Slots,
    Groups,
}

impl InspectView {
    pub fn from_flags(slots: bool, groups: bool) -> Self {
        match (slots, groups) {
            (true, _) => Self::Slots,
            (_, true) => Self::Groups,
            _ => Self::Map,
        }
    }
}

/// Execute inspect command
pub fn run_inspect(files: &[PathBuf], view: InspectView, pretty: bool) -> Result<()> {
    log!("inspect"; "inspecting {}", plural_count(files.len(), "file"));

    let results = files
        .par_iter()
        .map(|file| inspect_file(file, view))
        .collect::<Result<Vec<_>>>()?;

    let output = match results.as_slice() {
        [single] => {
            if single.is_null() {
                status_warning(NOTHING_CUSTOMIZABLE);
                return Ok(());
            }
            single.clone()
        }
        _ => {
            let mut by_file = Map::new();
            for (file, value) in files.iter().zip(results) {
                by_file.insert(file.display().to_string(), value);
            }
            JsonValue::Object(by_file)
        }
    };

    let formatted = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    write_output(None, &formatted)
}

/// JSON for one icon; `null` when it has nothing customizable.
fn inspect_file(file: &Path, view: InspectView) -> Result<JsonValue> {
    let svg = read_source(file)?;
    let state = engine::build(&svg).with_context(|| format!("Failed to load `{}`", file.display()))?;
    let Some(state) = state else {
        log!("inspect"; "{}: {}", file.display(), NOTHING_CUSTOMIZABLE);
        return Ok(JsonValue::Null);
    };

    let value = match view {
        InspectView::Map => serde_json::to_value(&state)?,
        InspectView::Slots => serde_json::to_value(derive_slots(&state))?,
        InspectView::Groups => serde_json::to_value(implicit_groups(&derive_slots(&state)))?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn icon(dir: &TempDir, name: &str, svg: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, svg).unwrap();
        path
    }

    #[test]
    fn test_view_from_flags() {
        assert_eq!(InspectView::from_flags(false, false), InspectView::Map);
        assert_eq!(InspectView::from_flags(true, false), InspectView::Slots);
        assert_eq!(InspectView::from_flags(false, true), InspectView::Groups);
    }

    #[test]
    fn test_inspect_map_json() {
        let dir = TempDir::new().unwrap();
        let path = icon(&dir, "a.svg", r#"<svg><circle r="5"/></svg>"#);
        let value = inspect_file(&path, InspectView::Map).unwrap();
        let fill = &value["elementColorMap"]["circle[0]"]["fill"];
        assert_eq!(fill["original"], "UNSPECIFIED");
        assert_eq!(fill["current"], "#000000FF");
    }

    #[test]
    fn test_inspect_groups_json() {
        let dir = TempDir::new().unwrap();
        let path = icon(
            &dir,
            "b.svg",
            r##"<svg><path fill="#FF0000"/><path fill="#FF0000"/></svg>"##,
        );
        let value = inspect_file(&path, InspectView::Groups).unwrap();
        assert_eq!(value[0]["key"], "#FF0000FF");
        assert_eq!(value[0]["slotIds"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_inspect_nothing_customizable_and_invalid() {
        let dir = TempDir::new().unwrap();
        let empty = icon(&dir, "empty.svg", "<svg/>");
        assert!(inspect_file(&empty, InspectView::Map).unwrap().is_null());

        let broken = icon(&dir, "broken.svg", "<svg><path></svg>");
        assert!(inspect_file(&broken, InspectView::Map).is_err());
    }
}
