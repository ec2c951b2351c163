//! Command-line interface for the `scenepack` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

/// Scenepack - preview bundler service for 3D/XR scene code
#[derive(Parser, Debug)]
#[command(
    name = "scenepack",
    version,
    about = "Preview bundler service for 3D/XR scene code",
    long_about = "Scenepack bundles in-memory scene sources (JSX, TypeScript, TSX) into a single\n\
                  IIFE script, rewriting vendored package imports to pre-built asset URLs.\n\
                  By default it serves JSON commands over stdin/stdout, one per line."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all logs except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to load instead of scenepack.toml / scenepack.json
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Global variable name the bundle is assigned to
    #[arg(long, global = true, value_name = "NAME")]
    pub global_name: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve JSON commands over stdin/stdout (default)
    Serve(ServeArgs),
    /// Run a single command read from stdin and print its reply
    Build(BuildArgs),
    /// Print the effective vendor table
    Vendors(VendorsArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Delay before the ready announcement, in milliseconds
    #[arg(long, value_name = "MS")]
    pub ready_delay_ms: Option<u64>,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// Print only the bundle code; fail with the build errors otherwise
    #[arg(long)]
    pub code_only: bool,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorsArgs {
    /// Print as a JSON object
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }

    /// Config values set on the command line, merged above every other source.
    pub fn overrides(&self) -> Value {
        let mut overrides = Map::new();
        if let Some(name) = &self.global_name {
            overrides.insert("global_name".into(), Value::from(name.clone()));
        }
        if let Some(Command::Serve(ServeArgs {
            ready_delay_ms: Some(delay),
        })) = &self.command
        {
            overrides.insert("ready_delay_ms".into(), Value::from(*delay));
        }
        Value::Object(overrides)
    }
}
