//! Bulk color edits: absolute set, incremental HSL/alpha deltas, reset.
//!
//! Adjustments are slider states per scope. Moving a slider applies only the
//! difference to the previous committed state of that scope, read against
//! each member's *current* color.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::color::Hex8;
use crate::debug;
use crate::svg::ElementPath;

use super::{GroupBook, MemberKey};
use crate::engine::map::{Channel, ColorState, Paint};
use crate::engine::slots::ImplicitKey;

/// Hue in degrees `[-180, 180]`; saturation, lightness and alpha in percent
/// `[-100, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentState {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl AdjustmentState {
    pub const ZERO: Self = Self {
        hue: 0.0,
        saturation: 0.0,
        lightness: 0.0,
        alpha: 0.0,
    };

    /// Slider state, clamped to the slider ranges.
    pub fn new(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            hue: hue.clamp(-180.0, 180.0),
            saturation: saturation.clamp(-100.0, 100.0),
            lightness: lightness.clamp(-100.0, 100.0),
            alpha: alpha.clamp(-100.0, 100.0),
        }
    }

    /// Per-channel change from `prev` to `self`.
    pub fn delta_from(self, prev: Self) -> Self {
        Self {
            hue: self.hue - prev.hue,
            saturation: self.saturation - prev.saturation,
            lightness: self.lightness - prev.lightness,
            alpha: self.alpha - prev.alpha,
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Apply this state as a delta to `color`.
    pub fn apply_to(self, color: Hex8) -> Hex8 {
        color.shift(self.hue, self.saturation, self.lightness, self.alpha)
    }
}

/// What an adjustment applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Every customizable channel and every gradient stop.
    Global,
    /// Members of an explicit group.
    Group(String),
    /// Every stop of one gradient.
    Gradient(String),
}

/// Resolved slots and stops of a scope or member set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub channels: Vec<(ElementPath, Channel)>,
    /// Gradient-level members and the stop indices they cover.
    pub gradients: Vec<(String, Vec<usize>)>,
    /// Individually addressed stops.
    pub stops: Vec<(String, usize)>,
}

impl Targets {
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.gradients.is_empty() && self.stops.is_empty()
    }

    /// Every stop to touch, each once. Gradient-level members go first so an
    /// individually listed stop of the same gradient is recognized as already
    /// processed.
    pub fn unique_stops(&self) -> Vec<(String, usize)> {
        let mut processed: FxHashSet<(String, usize)> = FxHashSet::default();
        let mut out = Vec::new();
        let whole = self
            .gradients
            .iter()
            .flat_map(|(id, indices)| indices.iter().map(move |index| (id.clone(), *index)));
        for stop in whole.chain(self.stops.iter().cloned()) {
            if processed.insert(stop.clone()) {
                out.push(stop);
            }
        }
        out
    }

    pub fn unique_channels(&self) -> Vec<(ElementPath, Channel)> {
        let mut processed: FxHashSet<(ElementPath, Channel)> = FxHashSet::default();
        self.channels
            .iter()
            .filter(|slot| processed.insert((*slot).clone()))
            .cloned()
            .collect()
    }

    /// Add the slots a single member stands for. Constituents that belong to
    /// another group (or are excluded) are skipped when `group` is given.
    pub fn add_member(&mut self, key: &MemberKey, state: &ColorState, filter: Option<(&GroupBook, &str)>) {
        let belongs = |member: &MemberKey| match filter {
            Some((book, group)) => book
                .effective_membership(member, state)
                .is_some_and(|m| m.group_id == group),
            None => true,
        };

        match key {
            MemberKey::Slot { path, channel } => {
                if state.entry(path, *channel).is_some() {
                    self.channels.push((path.clone(), *channel));
                }
            }
            MemberKey::Stop { gradient_id, index } => {
                if state.stop(gradient_id, *index).is_some() {
                    self.stops.push((gradient_id.clone(), *index));
                }
            }
            MemberKey::Group(ImplicitKey::Gradient(id)) => {
                let indices: Vec<usize> = key
                    .constituents(state)
                    .iter()
                    .filter(|stop| belongs(stop))
                    .filter_map(|stop| match stop {
                        MemberKey::Stop { index, .. } => Some(*index),
                        _ => None,
                    })
                    .collect();
                if !indices.is_empty() {
                    self.gradients.push((id.clone(), indices));
                }
            }
            MemberKey::Group(_) | MemberKey::Path(_) => {
                for slot in key.constituents(state) {
                    if belongs(&slot)
                        && let MemberKey::Slot { path, channel } = slot
                    {
                        self.channels.push((path, channel));
                    }
                }
            }
        }
    }
}

/// Slots and stops covered by a scope.
pub fn resolve_targets(scope: &Scope, book: &GroupBook, state: &ColorState) -> Targets {
    let mut targets = Targets::default();
    match scope {
        Scope::Global => {
            for (path, colors) in &state.element_color_map {
                for (channel, entry) in colors.entries() {
                    if !entry.cannot_customize {
                        targets.channels.push((path.clone(), channel));
                    }
                }
            }
            for (id, def) in &state.gradient_definitions {
                targets
                    .gradients
                    .push((id.clone(), (0..def.stops.len()).collect()));
            }
        }
        Scope::Gradient(id) => {
            if let Some(def) = state.gradient_definitions.get(id) {
                targets
                    .gradients
                    .push((id.clone(), (0..def.stops.len()).collect()));
            }
        }
        Scope::Group(group) => {
            for member in book.members_of(group) {
                targets.add_member(&member, state, Some((book, group)));
            }
        }
    }
    targets
}

/// Apply the change from `prev` to `next` to every target's current color.
///
/// Channels currently painted with a gradient are left alone; their stops are
/// adjusted through the gradient. Returns how many colors changed.
pub fn apply_delta(
    targets: &Targets,
    prev: AdjustmentState,
    next: AdjustmentState,
    state: &mut ColorState,
) -> usize {
    let delta = next.delta_from(prev);
    if delta.is_zero() {
        return 0;
    }

    let mut changed = 0;
    for (id, index) in targets.unique_stops() {
        if let Some(stop) = state.stop_mut(&id, index) {
            let shifted = delta.apply_to(stop.color);
            changed += usize::from(shifted != stop.color);
            stop.color = shifted;
        }
    }
    for (path, channel) in targets.unique_channels() {
        let Some(entry) = state.entry_mut(&path, channel) else {
            continue;
        };
        if let Paint::Solid(color) = entry.current {
            let shifted = delta.apply_to(color);
            if shifted != color && entry.set_color(shifted) {
                changed += 1;
            }
        }
    }

    debug!("adjust"; "delta {:?} changed {} colors", delta, changed);
    changed
}

/// Set every target to `color`. Gradient-painted channels become solid.
pub fn set_color(targets: &Targets, color: Hex8, state: &mut ColorState) -> usize {
    let mut changed = 0;
    for (id, index) in targets.unique_stops() {
        if let Some(stop) = state.stop_mut(&id, index) {
            stop.color = color;
            changed += 1;
        }
    }
    for (path, channel) in targets.unique_channels() {
        if let Some(entry) = state.entry_mut(&path, channel) {
            changed += usize::from(entry.set_color(color));
        }
    }
    changed
}

/// Restore every target from `baseline`: channels to their original paint,
/// stops to the stop as loaded.
pub fn reset(targets: &Targets, baseline: &ColorState, state: &mut ColorState) -> usize {
    let mut changed = 0;
    for (id, index) in targets.unique_stops() {
        let Some(original) = baseline.stop(&id, index) else {
            continue;
        };
        if let Some(stop) = state.stop_mut(&id, index) {
            *stop = original.clone();
            changed += 1;
        }
    }
    for (path, channel) in targets.unique_channels() {
        if let Some(entry) = state.entry_mut(&path, channel) {
            entry.reset();
            changed += 1;
        }
    }
    changed
}
