//! `scenepack` binary entry point.

use clap::Parser;
use scenepack_config::ConfigLoader;
use scenepack_host::{cli, commands, error::HostError, logger};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let args = cli::Cli::parse();
    run(args).await.map_err(miette::Report::new)
}

async fn run(args: cli::Cli) -> scenepack_host::Result<()> {
    let cwd = std::env::current_dir().map_err(HostError::WorkingDirectory)?;
    let mut loader = ConfigLoader::new(&cwd).overrides(args.overrides());
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let config = loader.load()?;

    logger::init_logger(
        args.verbose,
        args.quiet,
        args.no_color,
        config.log_level.as_deref(),
    );

    match args.command() {
        cli::Command::Serve(_) => commands::serve_execute(&config).await,
        cli::Command::Build(build_args) => commands::build_execute(&config, &build_args).await,
        cli::Command::Vendors(vendor_args) => commands::vendors_execute(&config, &vendor_args),
    }
}
