//! Subcommand implementations.

use std::fmt::Write as _;

use tokio::io::AsyncReadExt;

use scenepack_config::ServiceConfig;

use crate::channel::JsonLinesChannel;
use crate::cli::{BuildArgs, VendorsArgs};
use crate::dispatcher::CommandDispatcher;
use crate::error::{HostError, ProtocolError, Result};
use crate::protocol::Reply;

/// Serve stdin/stdout until the host closes stdin.
pub async fn serve_execute(config: &ServiceConfig) -> Result<()> {
    let mut dispatcher = CommandDispatcher::from_config(config)?;
    let mut channel = JsonLinesChannel::stdio();
    dispatcher.run(&mut channel).await?;
    Ok(())
}

pub async fn build_execute(config: &ServiceConfig, args: &BuildArgs) -> Result<()> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .map_err(ProtocolError::Io)?;

    let mut dispatcher = CommandDispatcher::from_config(config)?;
    let output = run_once(&mut dispatcher, &input, args.code_only).await?;
    println!("{}", output);
    Ok(())
}

/// Dispatch one command and render what `build` prints.
///
/// With `code_only`, a successful build yields the bare bundle and anything
/// else is an error.
pub async fn run_once(
    dispatcher: &mut CommandDispatcher,
    input: &str,
    code_only: bool,
) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(HostError::EmptyInput);
    }

    let reply = dispatcher.dispatch(input).await;
    if !code_only {
        return Ok(reply.to_json());
    }

    match reply {
        Reply::Build(result) => Ok((*result).into_bundle()?),
        Reply::Error(error) => Err(ProtocolError::Malformed(error.message).into()),
        _ => Err(ProtocolError::Malformed("--code-only expects a build command".into()).into()),
    }
}

pub fn vendors_execute(config: &ServiceConfig, args: &VendorsArgs) -> Result<()> {
    print!("{}", render_vendors(config, args.json)?);
    Ok(())
}

pub fn render_vendors(config: &ServiceConfig, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&config.vendor)? + "\n");
    }

    let width = config.vendor.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (package, url) in &config.vendor {
        let _ = writeln!(out, "{:width$}  {}", package, url, width = width);
    }
    Ok(out)
}
