use clap::Parser;
use iconforge::cli::cmd::{self, Commands, GenerateArgs};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CommandLine {
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Enable debug output
    #[clap(long, num_args = 0, global = true)]
    debug: bool,

    /// Config file to use instead of ./iconforge.toml or ./iconforge.json
    #[clap(long, global = true)]
    config: Option<PathBuf>,
}

pub fn main() -> ExitCode {
    // Parse command line options before we configure logging so we can set the
    // default level
    let command_line = CommandLine::parse();

    // Configure logging
    {
        let default_filter = if command_line.debug { "debug" } else { "info" };

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_filter)),
            )
            .init();
    }

    debug!(
        version = iconforge::built_info::PKG_VERSION,
        target = iconforge::built_info::TARGET,
        built = iconforge::built_info::BUILT_TIME_UTC,
        "Starting iconforge"
    );

    let dir = Path::new(".");
    let config = command_line.config.as_deref();

    // Dispatch command
    match command_line
        .command
        .unwrap_or_else(|| Commands::Generate(GenerateArgs::default()))
    {
        Commands::Generate(args) => cmd::generate::run(dir, args, config),
        Commands::Check {} => cmd::check::run(dir, config),
        Commands::Sizes {} => cmd::sizes::run(),
        Commands::ExportSvg { path } => cmd::export::run(dir, path, config),
        Commands::Init { format } => cmd::init::run(dir, format),
    }
}
