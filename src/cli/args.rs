//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::color::HexStyle;
use crate::engine::PreviewMode;

/// Recolor SVG icons through color maps, groups and HSL adjustments
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: tinct.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "tinct.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// How colors are written back (overrides `[output] hex`)
    #[arg(long, global = true, value_enum)]
    pub hex: Option<HexArg>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the color map, slots or implicit groups of icons
    #[command(visible_alias = "i")]
    Inspect {
        /// SVG files to inspect. Use `-` to read one from stdin.
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,

        /// Print editable slots instead of the color map
        #[arg(short, long, conflicts_with = "groups")]
        slots: bool,

        /// Print implicit same-color groups instead of the color map
        #[arg(short, long)]
        groups: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Render a saved color configuration onto an icon
    #[command(visible_alias = "a")]
    Apply {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Saved `svg-color-map` JSON
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        mapping: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Set a slot, group, gradient stop or element to one color
    Set {
        #[command(flatten)]
        edit: EditArgs,

        /// Member to recolor: `group-<color>`, `group-<gradient>`,
        /// `slot-<path>:<fill|stroke>`, `stop-<gradient>:<index>` or a path
        #[arg(short, long)]
        target: String,

        /// New color (any CSS color the engine understands)
        #[arg(long = "to", value_name = "COLOR")]
        to: String,
    },

    /// Shift hue, saturation, lightness and alpha
    #[command(visible_alias = "adj")]
    Adjust {
        #[command(flatten)]
        edit: EditArgs,

        /// Limit the adjustment to one member (default: every color)
        #[arg(short, long, conflicts_with = "gradient")]
        target: Option<String>,

        /// Limit the adjustment to the stops of one gradient
        #[arg(short, long)]
        gradient: Option<String>,

        /// Hue shift in degrees [-180, 180]
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        hue: f64,

        /// Saturation shift in percent [-100, 100]
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        saturation: f64,

        /// Lightness shift in percent [-100, 100]
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lightness: f64,

        /// Alpha shift in percent [-100, 100]
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        alpha: f64,
    },

    /// List the element paths an identifier affects
    Affected {
        #[command(flatten)]
        source: SourceArgs,

        /// Group key, gradient id, slot, stop or element path
        identifier: String,
    },

    /// Render a dimming preview for an identifier
    #[command(visible_alias = "p")]
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        identifier: String,

        /// Preview style
        #[arg(long, value_enum, default_value = "hover")]
        mode: ModeArg,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Render one gradient stop with its siblings faded out
    Isolate {
        #[command(flatten)]
        source: SourceArgs,

        /// Gradient id
        gradient: String,

        /// Stop index within the gradient
        index: usize,

        /// Write output to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

/// Icon to read, optionally with saved edits applied first.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// SVG file. Use `-` to read from stdin.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Resume from a saved `svg-color-map` JSON
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub mapping: Option<PathBuf>,
}

/// Shared arguments for commands that edit colors.
#[derive(clap::Args, Debug, Clone)]
pub struct EditArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the recolored SVG to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also save the resulting color configuration as JSON
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub save: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexArg {
    /// `#RRGGBB` when opaque
    Auto,
    /// Always `#RRGGBBAA`
    Long,
}

impl From<HexArg> for HexStyle {
    fn from(arg: HexArg) -> Self {
        match arg {
            HexArg::Auto => Self::Auto,
            HexArg::Long => Self::Long,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Dim everything else
    Hover,
    /// Dim the affected shapes, with a transition
    Click,
    /// Print the pulse schedule and render its first frame
    Pulse,
}

impl From<ModeArg> for PreviewMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Hover => Self::Hover,
            ModeArg::Click => Self::Click,
            ModeArg::Pulse => Self::AffectedPulse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_adjust_negative() {
        let cli = Cli::parse_from([
            "tinct", "adjust", "icon.svg", "--gradient", "g1", "--hue", "-30", "--alpha", "-10",
        ]);
        let Commands::Adjust { gradient, hue, alpha, target, .. } = cli.command else {
            panic!("expected adjust");
        };
        assert_eq!(gradient.as_deref(), Some("g1"));
        assert_eq!(target, None);
        assert_eq!(hue, -30.0);
        assert_eq!(alpha, -10.0);
    }

    #[test]
    fn test_parse_set() {
        let cli = Cli::parse_from([
            "tinct", "--color", "never", "set", "-", "-t", "group-#FF0000FF", "--to", "#00FF00", "-s", "out.json",
        ]);
        let Commands::Set { edit, target, to } = cli.command else {
            panic!("expected set");
        };
        assert_eq!(edit.source.file, PathBuf::from("-"));
        assert_eq!(edit.save, Some(PathBuf::from("out.json")));
        assert_eq!(target, "group-#FF0000FF");
        assert_eq!(to, "#00FF00");
    }

    #[test]
    fn test_adjust_target_conflicts_with_gradient() {
        let result = Cli::try_parse_from([
            "tinct", "adjust", "icon.svg", "-t", "path[0]", "-g", "g1",
        ]);
        assert!(result.is_err());
    }
}
