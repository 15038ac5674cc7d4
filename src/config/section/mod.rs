//! Configuration section definitions.
//!
//! Each module corresponds to sections in `tinct.toml`:
//!
//! | Module    | TOML Section             | Purpose                         |
//! |-----------|--------------------------|---------------------------------|
//! | `output`  | `[output]`               | How colors are written back     |
//! | `preview` | `[preview]`, `[isolate]` | Dimming and stop isolation      |
//!
//! `[log]` is small enough to live in the root module.

mod output;
mod preview;

pub use output::OutputConfig;
pub use preview::{IsolateConfig, PreviewConfig};
