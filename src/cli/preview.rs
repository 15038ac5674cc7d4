//! Read-only commands: affected, preview and isolate.

use std::path::Path;

use anyhow::Result;

use super::{ModeArg, SourceArgs, open_session, plural_count, write_output};
use crate::config::TinctConfig;
use crate::engine::preview::{PreviewState, pulse_frames, render_hints};
use crate::engine::{EditSession, MemberKey};
use crate::logger::{status_success, status_warning};
use crate::{debug, log};

/// Print the element paths an identifier affects, one per line.
pub fn run_affected(source: &SourceArgs, identifier: &str) -> Result<()> {
    let (_, session) = open_session(source)?;
    let Some(session) = session else {
        return Ok(());
    };

    let paths = session.affected_paths(identifier);
    if paths.is_empty() {
        status_warning(&format!("`{identifier}` affects no element"));
        return Ok(());
    }
    let listing = paths.into_iter().collect::<Vec<_>>().join("\n");
    write_output(None, &listing)
}

/// Write a dimming preview of the current colors.
pub fn run_preview(
    source: &SourceArgs,
    identifier: &str,
    mode: ModeArg,
    output: Option<&Path>,
    config: &TinctConfig,
) -> Result<()> {
    let (svg, session) = open_session(source)?;
    let Some(session) = session else {
        return write_output(output, &svg);
    };

    let state = preview_state(&session, identifier, mode, config);
    if state.affected_paths.is_empty() {
        status_warning(&format!("`{identifier}` affects no element"));
    }
    debug!("preview"; "{}", plural_count(state.affected_paths.len(), "affected path"));

    let rendered = session.render_with(config.output.hex);
    let document = match mode {
        ModeArg::Pulse => {
            let frames = pulse_frames(
                config.preview.pulse_half_cycles,
                config.preview.pulse_interval_ms,
            );
            for frame in &frames {
                match frame.dim {
                    Some(dim) => log!("pulse"; "{:>5}ms dim {:?}", frame.at_ms, dim),
                    None => log!("pulse"; "{:>5}ms clear", frame.at_ms),
                }
            }
            match frames.first().and_then(|frame| frame.dim) {
                Some(dim) => render_hints(&rendered, &state, dim),
                None => rendered,
            }
        }
        ModeArg::Hover | ModeArg::Click => render_hints(&rendered, &state, state.dim_target()),
    };
    write_output(output, &document)
}

fn preview_state(
    session: &EditSession,
    identifier: &str,
    mode: ModeArg,
    config: &TinctConfig,
) -> PreviewState {
    let paths = session.affected_paths(identifier);
    let preview = &config.preview;
    match mode {
        ModeArg::Hover => match identifier.parse::<MemberKey>() {
            Ok(MemberKey::Stop { gradient_id, index }) => {
                PreviewState::stop(&gradient_id, index, paths, preview.hover_opacity)
            }
            _ => PreviewState::hover(paths, preview.hover_opacity),
        },
        ModeArg::Click => PreviewState::click(paths, preview.click_opacity, preview.transition_ms),
        ModeArg::Pulse => PreviewState::pulse(paths, preview.hover_opacity, preview.pulse_interval_ms),
    }
}

/// Write the icon with one gradient stop isolated.
pub fn run_isolate(
    source: &SourceArgs,
    gradient: &str,
    index: usize,
    output: Option<&Path>,
    config: &TinctConfig,
) -> Result<()> {
    let (svg, session) = open_session(source)?;
    let Some(session) = session else {
        return write_output(output, &svg);
    };

    let stops = session
        .state()
        .gradient_definitions
        .get(gradient)
        .map(|def| def.stops.len());
    match stops {
        None => status_warning(&format!("no gradient `{gradient}`")),
        Some(len) if index >= len => status_warning(&format!(
            "gradient `{gradient}` has {}",
            plural_count(len, "stop")
        )),
        Some(_) => status_success(&format!("isolated stop {index} of `{gradient}`")),
    }

    let document = session.isolate(
        gradient,
        index,
        config.isolate.dim_opacity,
        config.output.hex,
    );
    write_output(output, &document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ICON: &str = r#"<svg><linearGradient id="g"><stop stop-color="red"/><stop stop-color="lime"/><stop stop-color="blue"/></linearGradient><rect fill="url(#g)"/><path fill="red"/></svg>"#;

    fn source(dir: &TempDir) -> SourceArgs {
        let file = dir.path().join("icon.svg");
        fs::write(&file, ICON).unwrap();
        SourceArgs {
            file,
            mapping: None,
        }
    }

    #[test]
    fn test_preview_hover_dims_rest() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("hover.svg");
        run_preview(&source(&dir), "g", ModeArg::Hover, Some(&out), &TinctConfig::default()).unwrap();

        let svg = fs::read_to_string(out).unwrap();
        assert!(svg.contains(r#"<rect fill="url(#g)"/>"#), "{svg}");
        assert!(svg.contains(r#"<path fill="red" opacity="0.3"/>"#), "{svg}");
    }

    #[test]
    fn test_preview_click_dims_affected_with_transition() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("click.svg");
        run_preview(&source(&dir), "path[0]", ModeArg::Click, Some(&out), &TinctConfig::default())
            .unwrap();

        let svg = fs::read_to_string(out).unwrap();
        assert!(svg.contains(r#"<rect fill="url(#g)"/>"#), "{svg}");
        assert!(
            svg.contains(r#"<path fill="red" opacity="0.3" style="transition: opacity 150ms"/>"#),
            "{svg}"
        );
    }

    #[test]
    fn test_preview_stop_identifier() {
        let session = EditSession::open(ICON).unwrap().unwrap();
        let state = preview_state(&session, "stop-g:1", ModeArg::Hover, &TinctConfig::default());
        let stop = state.gradient_stop_preview.unwrap();
        assert_eq!((stop.gradient_id.as_str(), stop.stop_index), ("g", 1));
        assert_eq!(state.affected_paths.into_iter().collect::<Vec<_>>(), ["rect[0]"]);
    }

    #[test]
    fn test_isolate_writes_stop_opacities() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("isolated.svg");
        run_isolate(&source(&dir), "g", 1, Some(&out), &TinctConfig::default()).unwrap();

        let svg = fs::read_to_string(out).unwrap();
        assert!(svg.contains(r#"<stop stop-color="red" stop-opacity="0.1"/>"#), "{svg}");
        assert!(svg.contains(r#"<stop stop-color="lime" stop-opacity="1"/>"#), "{svg}");
        assert!(svg.contains(r#"<stop stop-color="blue" stop-opacity="0.1"/>"#), "{svg}");
    }
}
