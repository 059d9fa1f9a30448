//! Emit command
//!
//! Usage: reqlog emit <MESSAGE> [--level <LEVEL>] [--component <NAME>]
//!        [--operation <NAME>] [--request] [--attr KEY=VALUE]...

use anyhow::anyhow;
use clap::Args;
use reqlog_logging::{parse_log_level_strict, Attr, Context, Logger};

#[derive(Debug, Args)]
pub struct EmitArgs {
    /// Message text
    pub message: String,

    /// Record level
    #[arg(short, long, default_value = "info")]
    pub level: String,

    /// Bind a component attribute
    #[arg(long)]
    pub component: Option<String>,

    /// Bind an operation attribute
    #[arg(long)]
    pub operation: Option<String>,

    /// Open a request scope and bind its request_id
    #[arg(long)]
    pub request: bool,

    /// Extra call-site attribute, repeatable
    #[arg(short = 'a', long = "attr", value_parser = parse_key_value)]
    pub attrs: Vec<(String, String)>,
}

/// Execute emit command
pub fn execute(logger: &Logger, args: EmitArgs) -> anyhow::Result<()> {
    let level = parse_log_level_strict(&args.level)?
        .into_level()
        .ok_or_else(|| anyhow!("level {:?} cannot be emitted", args.level))?;

    let mut logger = logger.clone();
    if let Some(component) = args.component {
        logger = logger.with_component(component);
    }
    if let Some(operation) = args.operation {
        logger = logger.with_operation(operation);
    }
    if args.request {
        let (_ctx, scoped) = logger.with_request_id(&Context::background());
        logger = scoped;
    }

    let attrs: Vec<Attr> = args
        .attrs
        .into_iter()
        .map(|(key, value)| Attr::new(key, value))
        .collect();
    logger.log(level, &args.message, &attrs);
    Ok(())
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}
