//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! hex = "auto"    # "auto": #RRGGBB when opaque, "long": always #RRGGBBAA
//! ```

use serde::{Deserialize, Serialize};

use crate::color::HexStyle;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// How colors are written back into documents.
    pub hex: HexStyle,
}
