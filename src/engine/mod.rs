//! Recoloring engine.
//!
//! # Pipeline
//!
//! ```text
//! SVG text ─► builder ─► ColorState ─► (slots, groups, adjust) ─► transform ─► SVG text
//!                                 └─► persist (JSON configuration)
//! ```
//!
//! - [`builder`]: read every paintable node into a [`ColorState`]
//! - [`slots`]: editable slots and implicit same-color groups
//! - [`group`]: explicit groups and HSL/alpha adjustments
//! - [`transform`]: write a color map back onto the source document
//! - [`preview`]: dimming previews and gradient stop isolation
//! - [`persist`]: the stored `svg-color-map` configuration
//! - [`session`]: all of the above for one icon being edited

pub mod builder;
pub mod group;
pub mod map;
pub mod persist;
pub mod preview;
pub mod session;
pub mod slots;
pub mod transform;

pub use builder::{build, build_from_document};
pub use group::adjust::{AdjustmentState, Scope, Targets};
pub use group::{ExplicitGroup, GroupBook, MemberKey, Membership, SelectionMode};
pub use map::{
    Channel, ColorEntry, ColorState, ElementColorMap, ElementColors, GradientDefinition,
    GradientDefinitions, GradientKind, GradientStop, OriginalColor, Paint,
};
pub use persist::ColorConfiguration;
pub use preview::{PreviewMode, PreviewState, affected_paths, apply_preview, isolate_gradient_stop};
pub use session::EditSession;
pub use slots::{ColorSlot, ImplicitGroup, ImplicitKey, SlotTarget, derive_slots, implicit_groups};
pub use transform::{transform, transform_with, try_transform};
