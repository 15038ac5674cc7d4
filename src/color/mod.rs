//! Color model and normalization.

mod model;
mod named;
mod normalize;

pub use model::{Hex8, HexStyle, ParseHexError};
pub use normalize::{GradientRef, NormalizedColor, normalize, parse_url};
