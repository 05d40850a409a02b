//! # rcompute CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Print the REST path for an operation
//! rcompute path Rhino.Geometry.Mesh CreateFromBrep -o Brep
//!
//! # Call a self-hosted server
//! rcompute call Rhino.Geometry.Curve GetLength \
//!     --url http://127.0.0.1:8081 \
//!     --args '[{"url": "https://files.example.com/curve.json"}]'
//!
//! # Two results (value + out value) are printed as a JSON array
//! rcompute call Rhino.Geometry.Curve ClosestPoint -o Curve -o Point3d -o double \
//!     --arity 2 --args '[{"url": "..."}, {"X": 0, "Y": 0, "Z": 0}]'
//!
//! # Batch several argument lists into one request
//! rcompute call Rhino.Geometry.Mesh CreateFromBrep -o Brep --multiple \
//!     --args '[[{"url": "a.json"}], [{"url": "b.json"}]]'
//! ```
//!
//! Logs go to stderr and are controlled by `RUST_LOG` (default `warn`), so
//! stdout only ever carries the JSON result.

use std::time::Duration;

use anyhow::{bail, Result};
use argh::FromArgs;
use rcompute_cli::invoke;
use rcompute_client::{ComputeClient, ComputeConfig};
use rcompute_common::OperationAddress;

/// rcompute - call remote geometry compute operations
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Path(PathArgs),
    Call(CallArgs),
}

/// print the REST path for an operation
#[derive(FromArgs)]
#[argh(subcommand, name = "path")]
struct PathArgs {
    /// owning type, e.g. Rhino.Geometry.Curve
    #[argh(positional)]
    owner: String,

    /// member name, e.g. Offset
    #[argh(positional)]
    member: String,

    /// parameter type of the overload, repeat once per parameter
    #[argh(option, short = 'o')]
    overload: Vec<String>,
}

/// call an operation and print its result as JSON
#[derive(FromArgs)]
#[argh(subcommand, name = "call")]
struct CallArgs {
    /// owning type, e.g. Rhino.Geometry.Curve
    #[argh(positional)]
    owner: String,

    /// member name, e.g. Offset
    #[argh(positional)]
    member: String,

    /// JSON array of positional arguments (array of arrays with --multiple)
    #[argh(option, short = 'a', long = "args", default = "\"[]\".into()")]
    args: String,

    /// parameter type of the overload, repeat once per parameter
    #[argh(option, short = 'o')]
    overload: Vec<String>,

    /// number of declared results: 1, 2 or 3
    #[argh(option, short = 'n', default = "1")]
    arity: usize,

    /// send all argument lists in one batch request
    #[argh(switch)]
    multiple: bool,

    /// server base address (overrides RHINO_COMPUTE_URL)
    #[argh(option, short = 'u')]
    url: Option<String>,

    /// bearer token (overrides RHINO_COMPUTE_TOKEN)
    #[argh(option, short = 't')]
    token: Option<String>,

    /// API key for self-hosted servers (overrides RHINO_COMPUTE_KEY)
    #[argh(option, short = 'k')]
    api_key: Option<String>,

    /// request timeout in milliseconds (overrides RHINO_COMPUTE_TIMEOUT_MS)
    #[argh(option)]
    timeout_ms: Option<u64>,
}

fn address(owner: &str, member: &str, overload: &[String]) -> OperationAddress {
    let params: Vec<&str> = overload.iter().map(String::as_str).collect();
    OperationAddress::with_overload(owner, member, &params)
}

fn build_config(args: &CallArgs) -> Result<ComputeConfig> {
    build_config_from(|name| std::env::var(name).ok(), args)
}

/// Layers the command-line flags over settings read through `lookup`.
fn build_config_from(lookup: impl Fn(&str) -> Option<String>, args: &CallArgs) -> Result<ComputeConfig> {
    let mut config = ComputeConfig::from_lookup(lookup)?;
    if let Some(url) = &args.url {
        config = config.with_base_address(url.clone());
    }
    if let Some(token) = &args.token {
        config = config.with_bearer_token(token.clone());
    }
    if let Some(key) = &args.api_key {
        config = config.with_api_key(key.clone());
    }
    if let Some(ms) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    config.validate()?;
    Ok(config)
}

async fn run_call(args: CallArgs) -> Result<()> {
    if !(1..=3).contains(&args.arity) {
        bail!("--arity must be 1, 2 or 3, got {}", args.arity);
    }
    if args.multiple && args.arity != 1 {
        bail!("--multiple only supports single-result operations");
    }

    let config = build_config(&args)?;
    tracing::info!("Using {} ({})", config.base_address(), config.credentials());

    let addr = address(&args.owner, &args.member, &args.overload);
    let client = ComputeClient::new(config)?;

    let result = if args.multiple {
        let batches = invoke::parse_batches(&args.args)?;
        invoke::invoke_multiple(&client, &addr, &batches).await?
    } else {
        let positional = invoke::parse_positional(&args.args)?;
        invoke::invoke(&client, &addr, &positional, args.arity).await?
    };

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Path(args) => {
            println!("{}", address(&args.owner, &args.member, &args.overload));
            Ok(())
        }
        Commands::Call(args) => run_call(args).await,
    }
}
