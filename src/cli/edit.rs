//! Commands that change colors: apply, set and adjust.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::{EditArgs, load_configuration, open_session, parse_color, plural_count, read_source, write_output};
use crate::config::TinctConfig;
use crate::engine::{AdjustmentState, EditSession, MemberKey, Scope};
use crate::log;
use crate::logger::{status_success, status_warning};

/// Render a saved configuration onto an icon.
pub fn run_apply(file: &Path, mapping: &Path, output: Option<&Path>, config: &TinctConfig) -> Result<()> {
    let svg = read_source(file)?;
    let configuration = load_configuration(mapping)?;
    let rendered = configuration.apply(&svg, config.output.hex);
    write_output(output, &rendered)?;
    status_success(&format!(
        "applied {} to {}",
        plural_count(configuration.mappings.len(), "mapping"),
        file.display()
    ));
    Ok(())
}

/// Bulk-set one member to an absolute color.
pub fn run_set(edit: &EditArgs, target: &str, color: &str, config: &TinctConfig) -> Result<()> {
    let key: MemberKey = target.parse().map_err(|err: String| anyhow!(err))?;
    let color = parse_color(color)?;

    let (svg, session) = open_session(&edit.source)?;
    let Some(mut session) = session else {
        return write_output(edit.output.as_deref(), &svg);
    };

    let changed = session.set_member_color(&key, color);
    if changed == 0 {
        status_warning(&format!("`{target}` matches no customizable color"));
    }
    log!("set"; "{} set to {}", plural_count(changed, "color"), color);
    finish(&session, edit, config)
}

/// Shift hue, saturation, lightness and alpha of a scope.
///
/// A `target` member is adjusted through a one-off explicit group, so a
/// gradient or color group covers every slot it stands for.
pub fn run_adjust(
    edit: &EditArgs,
    target: Option<&str>,
    gradient: Option<&str>,
    next: AdjustmentState,
    config: &TinctConfig,
) -> Result<()> {
    let (svg, session) = open_session(&edit.source)?;
    let Some(mut session) = session else {
        return write_output(edit.output.as_deref(), &svg);
    };

    let scope = match (target, gradient) {
        (_, Some(id)) => {
            if !session.state().gradient_definitions.contains_key(id) {
                status_warning(&format!("no gradient `{id}`"));
            }
            Scope::Gradient(id.to_string())
        }
        (Some(target), None) => {
            let key: MemberKey = target.parse().map_err(|err: String| anyhow!(err))?;
            let group = session.groups_mut().create_group(target);
            session.groups_mut().assign(key, &group);
            Scope::Group(group)
        }
        (None, None) => Scope::Global,
    };

    let changed = session.adjust(scope, next);
    log!("adjust"; "adjusted {}", plural_count(changed, "color"));
    finish(&session, edit, config)
}

/// Write the recolored icon and, if asked, the configuration behind it.
fn finish(session: &EditSession, edit: &EditArgs, config: &TinctConfig) -> Result<()> {
    write_output(edit.output.as_deref(), &session.render_with(config.output.hex))?;

    if let Some(save) = &edit.save {
        let json = session.to_configuration().to_json(true)?;
        fs::write(save, json).with_context(|| format!("Failed to write `{}`", save.display()))?;
        status_success(&format!("saved color configuration to {}", save.display()));
    }
    Ok(())
}
