//! Color slots and implicit groups, derived on demand from a [`ColorState`].
//!
//! Nothing here is stored: slots are regenerated from the element map and
//! gradient definitions on every read.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::Hex8;
use crate::svg::ElementPath;

use super::map::{Channel, ColorState, GradientDefinitions, OriginalColor, Paint};

/// What a slot edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlotTarget {
    Channel { path: ElementPath, channel: Channel },
    #[serde(rename_all = "camelCase")]
    Stop { gradient_id: String, index: usize },
}

impl SlotTarget {
    /// `path:channel` or `gradientId:index`.
    pub fn id(&self) -> String {
        match self {
            Self::Channel { path, channel } => format!("{path}:{channel}"),
            Self::Stop { gradient_id, index } => format!("{gradient_id}:{index}"),
        }
    }

    pub fn parse_channel(id: &str) -> Option<Self> {
        let (path, channel) = id.rsplit_once(':')?;
        Some(Self::Channel {
            path: path.to_string(),
            channel: Channel::parse(channel)?,
        })
    }

    pub fn parse_stop(id: &str) -> Option<Self> {
        let (gradient_id, index) = id.rsplit_once(':')?;
        Some(Self::Stop {
            gradient_id: gradient_id.to_string(),
            index: index.parse().ok()?,
        })
    }
}

/// One editable color: an element channel or a gradient stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSlot {
    pub id: String,
    pub label: String,
    pub target: SlotTarget,
    pub original_color: OriginalColor,
    pub current_color: Paint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_id: Option<String>,
}

impl ColorSlot {
    pub fn implicit_key(&self) -> Option<ImplicitKey> {
        match (&self.target, self.original_color) {
            (SlotTarget::Stop { gradient_id, .. }, _) => Some(ImplicitKey::Gradient(gradient_id.clone())),
            (SlotTarget::Channel { .. }, OriginalColor::Solid(color)) => Some(ImplicitKey::Solid(color)),
            (SlotTarget::Channel { .. }, OriginalColor::Unspecified) => Some(ImplicitKey::Unspecified),
            (SlotTarget::Channel { .. }, OriginalColor::Gradient) => None,
        }
    }
}

/// Slots of a state, using the state's own stops as stop originals.
pub fn derive_slots(state: &ColorState) -> Vec<ColorSlot> {
    derive_slots_with_baseline(state, None)
}

/// Slots of a state. Stop originals come from `baseline` (the definitions
/// at load time) when given.
///
/// Channel slots come first in path order, then the stops of every
/// gradient some channel currently paints with.
pub fn derive_slots_with_baseline(
    state: &ColorState,
    baseline: Option<&GradientDefinitions>,
) -> Vec<ColorSlot> {
    let mut slots = Vec::new();
    let mut referenced: Vec<String> = Vec::new();

    for (path, colors) in &state.element_color_map {
        for (channel, entry) in colors.entries() {
            if entry.cannot_customize {
                continue;
            }
            let gradient_id = entry.current.gradient_id();
            if let Some(id) = &gradient_id
                && !referenced.contains(id)
            {
                referenced.push(id.clone());
            }

            let target = SlotTarget::Channel {
                path: path.clone(),
                channel,
            };
            slots.push(ColorSlot {
                id: target.id(),
                label: format!("{path} {channel}"),
                target,
                original_color: entry.original(),
                current_color: entry.current.clone(),
                gradient_id,
            });
        }
    }

    referenced.sort();
    for id in referenced {
        let Some(def) = state.gradient_definitions.get(&id) else {
            continue;
        };
        let originals = baseline.and_then(|defs| defs.get(&id));

        for (index, stop) in def.stops.iter().enumerate() {
            let original = originals
                .and_then(|def| def.stops.get(index))
                .map_or(stop.color, |stop| stop.color);
            let target = SlotTarget::Stop {
                gradient_id: id.clone(),
                index,
            };
            slots.push(ColorSlot {
                id: target.id(),
                label: format!("{id} stop {index}"),
                target,
                original_color: OriginalColor::Solid(original),
                current_color: Paint::Solid(stop.color),
                gradient_id: Some(id.clone()),
            });
        }
    }

    slots
}

// ============================================================================
// Implicit groups
// ============================================================================

/// Key of an implicit group: a shared original color, the unspecified
/// placeholder, or a gradient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImplicitKey {
    Solid(Hex8),
    Unspecified,
    Gradient(String),
}

impl ImplicitKey {
    pub const UNSPECIFIED: &'static str = "UNSPECIFIED_GROUP";
}

impl fmt::Display for ImplicitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => color.fmt(f),
            Self::Unspecified => f.write_str(Self::UNSPECIFIED),
            Self::Gradient(id) => f.write_str(id),
        }
    }
}

impl FromStr for ImplicitKey {
    type Err = std::convert::Infallible;

    /// `UNSPECIFIED_GROUP`, a `#RRGGBB[AA]` color, or a gradient id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::UNSPECIFIED {
            return Ok(Self::Unspecified);
        }
        Ok(match s.parse::<Hex8>() {
            Ok(color) => Self::Solid(color),
            Err(_) => Self::Gradient(s.to_string()),
        })
    }
}

impl Serialize for ImplicitKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplicitGroup {
    pub key: ImplicitKey,
    pub slot_ids: Vec<String>,
}

/// Group slots by shared original color or gradient, in order of first
/// appearance. Channels painted with a gradient belong to no implicit group;
/// the gradient's stops do.
pub fn implicit_groups(slots: &[ColorSlot]) -> Vec<ImplicitGroup> {
    let mut groups: Vec<ImplicitGroup> = Vec::new();
    for slot in slots {
        let Some(key) = slot.implicit_key() else {
            continue;
        };
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.slot_ids.push(slot.id.clone()),
            None => groups.push(ImplicitGroup {
                key,
                slot_ids: vec![slot.id.clone()],
            }),
        }
    }
    groups
}
