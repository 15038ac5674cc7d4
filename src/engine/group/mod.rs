//! Explicit color groups.
//!
//! Members are addressed by [`MemberKey`]. A member that stands for several
//! slots (an implicit color group, a gradient, a whole element) covers them
//! by inheritance; a slot or stop with its own record overrides that,
//! including the "no group" exclusion record.
//!
//! Selection is a small state machine:
//!
//! ```text
//! Ungrouped --begin_selecting(G)--> Selecting(G) --finish/cancel--> Ungrouped
//! ```
//!
//! Deleting the group being edited also returns to `Ungrouped`.

pub mod adjust;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::debug;
use crate::svg::ElementPath;

use super::map::{Channel, ColorState, OriginalColor};
use super::slots::{ImplicitKey, SlotTarget};

/// Address of an explicit-group member.
///
/// Written as `group-<key>`, `slot-<path>:<channel>`, `stop-<gradient>:<index>`
/// or a bare element path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKey {
    Group(ImplicitKey),
    Slot { path: ElementPath, channel: Channel },
    Stop { gradient_id: String, index: usize },
    Path(ElementPath),
}

impl MemberKey {
    pub fn slot(path: &str, channel: Channel) -> Self {
        Self::Slot {
            path: path.to_string(),
            channel,
        }
    }

    pub fn stop(gradient_id: &str, index: usize) -> Self {
        Self::Stop {
            gradient_id: gradient_id.to_string(),
            index,
        }
    }

    /// Members this one inherits a group from, nearest first.
    pub fn parents(&self, state: &ColorState) -> Vec<Self> {
        match self {
            Self::Slot { path, channel } => {
                let mut parents = vec![Self::Path(path.clone())];
                match state.entry(path, *channel).map(|entry| entry.original()) {
                    Some(OriginalColor::Solid(color)) => {
                        parents.push(Self::Group(ImplicitKey::Solid(color)));
                    }
                    Some(OriginalColor::Unspecified) => {
                        parents.push(Self::Group(ImplicitKey::Unspecified));
                    }
                    _ => {}
                }
                parents
            }
            Self::Stop { gradient_id, .. } => {
                vec![Self::Group(ImplicitKey::Gradient(gradient_id.clone()))]
            }
            Self::Group(_) | Self::Path(_) => Vec::new(),
        }
    }

    /// Slots and stops this member stands for. Empty for single slots/stops.
    pub fn constituents(&self, state: &ColorState) -> Vec<Self> {
        match self {
            Self::Group(ImplicitKey::Solid(color)) => {
                slots_where(state, |_, original| original == OriginalColor::Solid(*color))
            }
            Self::Group(ImplicitKey::Unspecified) => {
                slots_where(state, |_, original| original == OriginalColor::Unspecified)
            }
            Self::Group(ImplicitKey::Gradient(id)) => state
                .gradient_definitions
                .get(id)
                .map(|def| (0..def.stops.len()).map(|i| Self::stop(id, i)).collect())
                .unwrap_or_default(),
            Self::Path(target) => slots_where(state, |path, _| path == target.as_str()),
            Self::Slot { .. } | Self::Stop { .. } => Vec::new(),
        }
    }
}

/// Customizable channel slots whose path and original color pass `keep`.
fn slots_where(state: &ColorState, keep: impl Fn(&str, OriginalColor) -> bool) -> Vec<MemberKey> {
    let mut out = Vec::new();
    for (path, colors) in &state.element_color_map {
        for (channel, entry) in colors.entries() {
            if !entry.cannot_customize && keep(path, entry.original()) {
                out.push(MemberKey::slot(path, channel));
            }
        }
    }
    out
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(key) => write!(f, "group-{key}"),
            Self::Slot { path, channel } => write!(f, "slot-{path}:{channel}"),
            Self::Stop { gradient_id, index } => write!(f, "stop-{gradient_id}:{index}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

impl FromStr for MemberKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid member `{s}`");
        if let Some(key) = s.strip_prefix("group-") {
            if key.is_empty() {
                return Err(invalid());
            }
            return key.parse().map(Self::Group).map_err(|_| invalid());
        }
        if let Some(id) = s.strip_prefix("slot-") {
            return match SlotTarget::parse_channel(id) {
                Some(SlotTarget::Channel { path, channel }) => Ok(Self::Slot { path, channel }),
                _ => Err(invalid()),
            };
        }
        if let Some(id) = s.strip_prefix("stop-") {
            return match SlotTarget::parse_stop(id) {
                Some(SlotTarget::Stop { gradient_id, index }) => Ok(Self::Stop { gradient_id, index }),
                _ => Err(invalid()),
            };
        }
        if s.is_empty() {
            return Err(invalid());
        }
        Ok(Self::Path(s.to_string()))
    }
}

impl Serialize for MemberKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Groups
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplicitGroup {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Ungrouped,
    Selecting {
        group_id: String,
        selection: BTreeSet<MemberKey>,
    },
}

/// Resolved group of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub group_id: String,
    /// Covered through a parent rather than a record of its own.
    pub is_inherited: bool,
}

/// User-defined groups and their membership records.
#[derive(Debug, Clone, Default)]
pub struct GroupBook {
    groups: Vec<ExplicitGroup>,
    /// `None` records exclude a member from whatever its parent belongs to.
    membership: BTreeMap<MemberKey, Option<String>>,
    mode: SelectionMode,
    next_id: u32,
}

impl GroupBook {
    pub fn groups(&self) -> &[ExplicitGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&ExplicitGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn mode(&self) -> &SelectionMode {
        &self.mode
    }

    pub fn create_group(&mut self, name: &str) -> String {
        self.next_id += 1;
        let id = format!("cg-{}", self.next_id);
        self.groups.push(ExplicitGroup {
            id: id.clone(),
            name: name.to_string(),
        });
        debug!("group"; "created {} `{}`", id, name);
        id
    }

    pub fn rename_group(&mut self, id: &str, name: &str) -> bool {
        match self.groups.iter_mut().find(|group| group.id == id) {
            Some(group) => {
                group.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a group and every record pointing at it.
    pub fn delete_group(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|group| group.id != id);
        if self.groups.len() == before {
            return false;
        }
        self.membership
            .retain(|_, group| group.as_deref() != Some(id));
        if matches!(&self.mode, SelectionMode::Selecting { group_id, .. } if group_id == id) {
            self.mode = SelectionMode::Ungrouped;
        }
        debug!("group"; "deleted {}", id);
        true
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Enter `Selecting(id)`, seeded with the group's current direct members.
    pub fn begin_selecting(&mut self, id: &str) -> bool {
        if self.group(id).is_none() {
            return false;
        }
        self.mode = SelectionMode::Selecting {
            group_id: id.to_string(),
            selection: self.members_of(id).into_iter().collect(),
        };
        true
    }

    /// Flip a member in the pending selection. Returns whether it is now
    /// selected; `false` outside `Selecting`.
    pub fn toggle_selection(&mut self, key: MemberKey) -> bool {
        let SelectionMode::Selecting { selection, .. } = &mut self.mode else {
            return false;
        };
        if selection.remove(&key) {
            false
        } else {
            selection.insert(key);
            true
        }
    }

    /// Commit the pending selection as the group's direct membership.
    pub fn finish_selecting(&mut self) -> Option<String> {
        let SelectionMode::Selecting {
            group_id,
            selection,
        } = std::mem::take(&mut self.mode)
        else {
            return None;
        };

        self.membership
            .retain(|key, group| group.as_deref() != Some(group_id.as_str()) || selection.contains(key));
        for key in selection {
            self.membership.insert(key, Some(group_id.clone()));
        }
        Some(group_id)
    }

    pub fn cancel_selecting(&mut self) {
        self.mode = SelectionMode::Ungrouped;
    }

    // ------------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------------

    /// Record `key` directly under group `id`.
    pub fn assign(&mut self, key: MemberKey, id: &str) -> bool {
        if self.group(id).is_none() {
            return false;
        }
        self.membership.insert(key, Some(id.to_string()));
        true
    }

    /// Members recorded directly under group `id`.
    pub fn members_of(&self, id: &str) -> Vec<MemberKey> {
        self.membership
            .iter()
            .filter(|(_, group)| group.as_deref() == Some(id))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Group of `key`, direct or inherited from a parent.
    pub fn effective_membership(&self, key: &MemberKey, state: &ColorState) -> Option<Membership> {
        if let Some(record) = self.membership.get(key) {
            return record.as_ref().map(|group_id| Membership {
                group_id: group_id.clone(),
                is_inherited: false,
            });
        }
        key.parents(state).into_iter().find_map(|parent| {
            let group_id = self.membership.get(&parent)?.clone()?;
            Some(Membership {
                group_id,
                is_inherited: true,
            })
        })
    }

    /// Take `key` out of its group.
    ///
    /// When the membership is inherited, the parent record is dropped, every
    /// sibling is re-added individually to the same group and `key` is left
    /// ungrouped.
    pub fn remove_from_group(&mut self, key: &MemberKey, state: &ColorState) -> bool {
        let Some(membership) = self.effective_membership(key, state) else {
            return false;
        };
        if !membership.is_inherited {
            self.membership.remove(key);
            if self.effective_membership(key, state).is_some() {
                self.membership.insert(key.clone(), None);
            }
            return true;
        }

        let Some(parent) = key.parents(state).into_iter().find(|parent| {
            self.membership.get(parent).and_then(Option::as_deref) == Some(membership.group_id.as_str())
        }) else {
            return false;
        };

        self.membership.remove(&parent);
        for sibling in parent.constituents(state) {
            if &sibling != key {
                self.membership
                    .entry(sibling)
                    .or_insert_with(|| Some(membership.group_id.clone()));
            }
        }
        if self.effective_membership(key, state).is_some() {
            self.membership.insert(key.clone(), None);
        }
        debug!("group"; "demoted {} out of {}", parent, membership.group_id);
        true
    }
}
