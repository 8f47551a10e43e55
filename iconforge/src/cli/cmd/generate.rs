use crate::{
    cli::{cmd::load_config, progress::GenerateProgress},
    config::Config,
    container::ContainerOutcome,
    generator::{Generator, RunSummary},
    rasterize::Conversion,
};
use console::Style;
use std::{path::Path, process::ExitCode};
use tracing::error;

use super::GenerateArgs;

/// Apply command line overrides on top of the config file.
fn apply_args(config: &mut Config, args: GenerateArgs) {
    if let Some(svg) = args.svg {
        config.svg = Some(svg);
    }
    if let Some(iconset_dir) = args.iconset_dir {
        config.iconset_dir = iconset_dir;
    }
    if let Some(icns) = args.icns {
        config.icns_path = icns;
    }
    if args.no_icns {
        config.icns = false;
    }
    if args.no_verify {
        config.verify_dimensions = false;
    }
}

fn container_line(outcome: &ContainerOutcome) -> String {
    format!(".icns file {outcome}")
}

fn print_summary(summary: &RunSummary) {
    let ok = Style::new().green();
    let warn = Style::new().yellow();
    let failed = Style::new().red();

    println!();
    for (size, conversion) in &summary.report.results {
        match conversion {
            Conversion::Primary(_) => println!("  {} {size}", ok.apply_to("created ")),
            Conversion::Fallback(rasterizer) => {
                println!("  {} {size} with {rasterizer}", warn.apply_to("created "))
            }
            Conversion::Failed => println!("  {} {}", failed.apply_to("failed  "), size.filename),
        }
    }

    let style = match &summary.container {
        ContainerOutcome::Built(_) => &ok,
        ContainerOutcome::Skipped => &warn,
        ContainerOutcome::Failed(_) => &failed,
    };
    println!("  {}", style.apply_to(container_line(&summary.container)));

    println!();
    if summary.succeeded() {
        println!(
            "{} ({}/{} images)",
            ok.apply_to("Icon creation complete"),
            summary.report.succeeded(),
            summary.report.results.len()
        );
    } else {
        println!("{}", failed.apply_to("Icon creation failed"));
    }
}

pub fn run(dir: &Path, args: GenerateArgs, config: Option<&Path>) -> ExitCode {
    let mut config = match load_config(dir, config) {
        Ok(config) => config,
        Err(error) => {
            error!("Failed to load config: {error:#}");
            return ExitCode::FAILURE;
        }
    };
    apply_args(&mut config, args);

    let generator = Generator::from(&config);

    match generator.run(&GenerateProgress::default()) {
        Ok(summary) => {
            print_summary(&summary);
            if summary.succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
