//! tinct - recolor SVG icons from the command line.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tinct::cli::{self, Cli, Commands, inspect::InspectView};
use tinct::config::TinctConfig;
use tinct::engine::AdjustmentState;
use tinct::logger::status_error;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    if let Err(err) = run(&cli) {
        let detail = err
            .chain()
            .skip(1)
            .map(|cause| format!("  {cause}"))
            .collect::<Vec<_>>()
            .join("\n");
        status_error(&err.to_string(), &detail);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = TinctConfig::load(cli)?;

    match &cli.command {
        Commands::Inspect {
            files,
            slots,
            groups,
            pretty,
        } => cli::inspect::run_inspect(files, InspectView::from_flags(*slots, *groups), *pretty),
        Commands::Apply {
            file,
            mapping,
            output,
        } => cli::edit::run_apply(file, mapping, output.as_deref(), &config),
        Commands::Set { edit, target, to } => cli::edit::run_set(edit, target, to, &config),
        Commands::Adjust {
            edit,
            target,
            gradient,
            hue,
            saturation,
            lightness,
            alpha,
        } => {
            let next = AdjustmentState::new(*hue, *saturation, *lightness, *alpha);
            cli::edit::run_adjust(edit, target.as_deref(), gradient.as_deref(), next, &config)
        }
        Commands::Affected { source, identifier } => cli::preview::run_affected(source, identifier),
        Commands::Preview {
            source,
            identifier,
            mode,
            output,
        } => cli::preview::run_preview(source, identifier, *mode, output.as_deref(), &config),
        Commands::Isolate {
            source,
            gradient,
            index,
            output,
        } => cli::preview::run_isolate(source, gradient, *index, output.as_deref(), &config),
    }
}
