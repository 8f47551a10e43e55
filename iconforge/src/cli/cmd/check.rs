use crate::{
    cli::cmd::load_config,
    tools::{self, Rasterizer, Toolbox},
};
use console::Style;
use std::{path::Path, process::ExitCode};
use tracing::error;

/// Print the status of every external tool and return the rasterizer a run
/// would use.
fn report(tools: &Toolbox) -> Option<Rasterizer> {
    let found = Style::new().green();
    let missing = Style::new().red();

    for (rasterizer, available) in tools::availability(tools) {
        let program = rasterizer.program(tools).display();
        if available {
            println!("{} {rasterizer} ({program})", found.apply_to("found  "));
        } else {
            println!("{} {rasterizer} ({program})", missing.apply_to("missing"));
        }
    }

    if tools::installed(&tools.iconutil) {
        println!("{} iconutil ({})", found.apply_to("found  "), tools.iconutil.display());
    } else {
        println!(
            "{} iconutil ({}), .icns files can only be built on macOS",
            missing.apply_to("missing"),
            tools.iconutil.display()
        );
    }

    tools::probe(tools)
}

pub fn run(dir: &Path, config: Option<&Path>) -> ExitCode {
    let config = match load_config(dir, config) {
        Ok(config) => config,
        Err(error) => {
            error!("Failed to load config: {error:#}");
            return ExitCode::FAILURE;
        }
    };

    match report(&config.tools) {
        Some(rasterizer) => {
            println!();
            println!("Using {rasterizer}");
            ExitCode::SUCCESS
        }
        None => {
            error!("{}", tools::install_hints());
            ExitCode::FAILURE
        }
    }
}
