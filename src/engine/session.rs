//! One editing session for one icon.
//!
//! Owns the live color state, the state as loaded (for resets and stop
//! originals), explicit groups and per-scope slider states.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::color::{Hex8, HexStyle};
use crate::error::Result;
use crate::svg::ElementPath;
use crate::{debug, log};

use super::builder;
use super::group::adjust::{self, AdjustmentState, Scope, Targets};
use super::group::{GroupBook, MemberKey};
use super::map::ColorState;
use super::persist::ColorConfiguration;
use super::preview::{self, affected_by_member};
use super::slots::{self, ColorSlot, ImplicitGroup, SlotTarget};
use super::transform::transform_with;

#[derive(Debug, Clone)]
pub struct EditSession {
    source: String,
    state: ColorState,
    baseline: ColorState,
    groups: GroupBook,
    adjustments: FxHashMap<Scope, AdjustmentState>,
}

impl EditSession {
    /// Start editing `svg`. `Ok(None)` when it has nothing customizable.
    pub fn open(svg: &str) -> Result<Option<Self>> {
        let Some(state) = builder::build(svg)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            source: svg.to_string(),
            baseline: state.clone(),
            state,
            groups: GroupBook::default(),
            adjustments: FxHashMap::default(),
        }))
    }

    /// Resume from a persisted configuration. Entries for paths the document
    /// no longer has are dropped; resets still go back to the document.
    pub fn resume(svg: &str, config: &ColorConfiguration) -> Result<Option<Self>> {
        let Some(mut session) = Self::open(svg)? else {
            return Ok(None);
        };
        for (path, colors) in &config.mappings {
            match session.state.element_color_map.get_mut(path) {
                Some(slot) => *slot = colors.clone(),
                None => debug!("session"; "dropping mapping for stale path {}", path),
            }
        }
        if let Some(gradients) = &config.gradients {
            for (id, def) in gradients {
                if let Some(live) = session.state.gradient_definitions.get_mut(id) {
                    *live = def.clone();
                }
            }
        }
        Ok(Some(session))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> &ColorState {
        &self.state
    }

    pub fn groups(&self) -> &GroupBook {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut GroupBook {
        &mut self.groups
    }

    pub fn slots(&self) -> Vec<ColorSlot> {
        slots::derive_slots_with_baseline(&self.state, Some(&self.baseline.gradient_definitions))
    }

    pub fn implicit_groups(&self) -> Vec<ImplicitGroup> {
        slots::implicit_groups(&self.slots())
    }

    pub fn adjustment(&self, scope: &Scope) -> AdjustmentState {
        self.adjustments.get(scope).copied().unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    pub fn set_slot_color(&mut self, target: &SlotTarget, color: Hex8) -> bool {
        match target {
            SlotTarget::Channel { path, channel } => self
                .state
                .entry_mut(path, *channel)
                .is_some_and(|entry| entry.set_color(color)),
            SlotTarget::Stop { gradient_id, index } => match self.state.stop_mut(gradient_id, *index) {
                Some(stop) => {
                    stop.color = color;
                    true
                }
                None => false,
            },
        }
    }

    /// Set everything `key` stands for to `color`.
    pub fn set_member_color(&mut self, key: &MemberKey, color: Hex8) -> usize {
        let mut targets = Targets::default();
        targets.add_member(key, &self.state, None);
        adjust::set_color(&targets, color, &mut self.state)
    }

    /// Set every member of an explicit group to `color`.
    pub fn set_group_color(&mut self, group_id: &str, color: Hex8) -> usize {
        let targets = self.targets(&Scope::Group(group_id.to_string()));
        adjust::set_color(&targets, color, &mut self.state)
    }

    /// Move the sliders of `scope` to `next`, applying only the change since
    /// the last committed state of that scope.
    pub fn adjust(&mut self, scope: Scope, next: AdjustmentState) -> usize {
        let prev = self.adjustment(&scope);
        let targets = self.targets(&scope);
        let changed = adjust::apply_delta(&targets, prev, next, &mut self.state);
        self.adjustments.insert(scope, next);
        changed
    }

    /// Restore a scope's members as loaded and zero its sliders. A global
    /// reset clears every scope's sliders.
    pub fn reset(&mut self, scope: &Scope) -> usize {
        let targets = self.targets(scope);
        let changed = adjust::reset(&targets, &self.baseline, &mut self.state);
        match scope {
            Scope::Global => self.adjustments.clear(),
            other => {
                self.adjustments.remove(other);
            }
        }
        log!("session"; "reset {} colors", changed);
        changed
    }

    pub fn delete_group(&mut self, group_id: &str) -> bool {
        self.adjustments.remove(&Scope::Group(group_id.to_string()));
        self.groups.delete_group(group_id)
    }

    fn targets(&self, scope: &Scope) -> Targets {
        adjust::resolve_targets(scope, &self.groups, &self.state)
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Paths an identifier refers to; explicit group ids cover all their
    /// members.
    pub fn affected_paths(&self, identifier: &str) -> BTreeSet<ElementPath> {
        let map = &self.state.element_color_map;
        if self.groups.group(identifier).is_none() {
            return preview::affected_paths(identifier, map, &self.state.gradient_definitions);
        }
        self.groups
            .members_of(identifier)
            .iter()
            .flat_map(|member| affected_by_member(member, map))
            .collect()
    }

    pub fn render(&self) -> String {
        self.render_with(HexStyle::default())
    }

    pub fn render_with(&self, style: HexStyle) -> String {
        transform_with(
            &self.source,
            &self.state.element_color_map,
            Some(&self.state.gradient_definitions),
            style,
        )
    }

    pub fn isolate(
        &self,
        gradient_id: &str,
        stop_index: usize,
        dim_opacity: f64,
        style: HexStyle,
    ) -> String {
        preview::isolate_gradient_stop(
            &self.render_with(style),
            &self.state.gradient_definitions,
            gradient_id,
            stop_index,
            dim_opacity,
            style,
        )
    }

    pub fn to_configuration(&self) -> ColorConfiguration {
        ColorConfiguration::new(&self.state)
    }
}
