//! `tagxml` CLI: convert JSON to type-tagged XML and back from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode JSON to tagged XML (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | tagxml to-xml
//!
//! # Encode from file to file
//! tagxml to-xml -i data.json -o data.xml
//!
//! # Decode tagged XML back to pretty-printed JSON
//! tagxml to-json --pretty -i data.xml
//!
//! # Wrap the result in a {"success": ..., "data": ...} envelope
//! tagxml to-json --envelope -i data.xml
//!
//! # Validate a document against the tagged-element convention
//! tagxml check -i data.xml
//!
//! # Raise the nesting limit and turn on debug logging
//! TAGXML_MAX_DEPTH=1024 tagxml -vv to-json -i deep.xml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{self, Read};
use std::process;
use tagxml_core::{DecodeOptions, Value, DEFAULT_MAX_DEPTH};
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(
    name = "tagxml",
    version,
    about = "Type-preserving JSON <-> tagged XML converter"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Deepest element nesting accepted when reading XML
    #[arg(long, global = true, env = "TAGXML_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON into tagged XML
    ToXml {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode tagged XML back into JSON
    ToJson {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Wrap output as {"success": true, "data": ...}; failures become
        /// {"success": false, "errors": "..."} on stdout
        #[arg(long)]
        envelope: bool,
    },
    /// Check that tagged XML decodes cleanly
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = DecodeOptions::with_max_depth(cli.max_depth);
    debug!(max_depth = options.max_depth, "decode options");

    match cli.command {
        Commands::ToXml { input, output } => {
            let json = read_input(input.as_deref())?;
            let value =
                tagxml_core::parse_json_bytes(&json).context("Failed to parse JSON input")?;
            let xml = tagxml_core::encode_to_markup(&value);
            info!(
                json_bytes = json.len(),
                xml_bytes = xml.len(),
                root = %value.tag(),
                "encoded JSON to XML"
            );
            write_output(output.as_deref(), &xml)?;
        }
        Commands::ToJson {
            input,
            output,
            pretty,
            envelope,
        } => {
            let decoded = read_input(input.as_deref()).and_then(|xml| {
                let value = tagxml_core::decode_markup_with(&xml, &options)
                    .context("Failed to decode XML to JSON")?;
                info!(xml_bytes = xml.len(), root = %value.tag(), "decoded XML");
                Ok(value)
            });
            let rendered = match (decoded, envelope) {
                (Ok(value), false) => render_json(&serde_json::Value::from(&value), pretty)?,
                (Ok(value), true) => render_json(&success_envelope(&value), pretty)?,
                (Err(err), false) => return Err(err),
                (Err(err), true) => {
                    error!("{err:#}");
                    let body = render_json(&error_envelope(&err), pretty)?;
                    write_output(output.as_deref(), body.as_bytes())?;
                    process::exit(1);
                }
            };
            write_output(output.as_deref(), rendered.as_bytes())?;
        }
        Commands::Check { input } => {
            let xml = read_input(input.as_deref())?;
            let root = tagxml_core::markup::parse_markup_with(&xml, &options)
                .context("Failed to parse XML")?;
            let value = tagxml_core::decode_element_with(&root, &options)
                .context("XML does not follow the tagged-element convention")?;
            println!("ok: {} (depth {})", value.tag(), root.depth());
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber for logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tagxml={level},tagxml_core={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// `{"success": true, "data": <value>}`
fn success_envelope(value: &Value) -> serde_json::Value {
    json!({ "success": true, "data": serde_json::Value::from(value) })
}

/// `{"success": false, "errors": "<message chain>"}`
fn error_envelope(err: &anyhow::Error) -> serde_json::Value {
    json!({ "success": false, "errors": format!("{err:#}") })
}

fn render_json(value: &serde_json::Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    let bytes = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    debug!(bytes = bytes.len(), source = path.unwrap_or("<stdin>"), "read input");
    Ok(bytes)
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            use std::io::Write;
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    debug!(bytes = content.len(), dest = path.unwrap_or("<stdout>"), "wrote output");
    Ok(())
}
