//! # schema-check
//!
//! Checks a JSON document against one registered IdeaVerse request shape and
//! prints the normalized record, or the field errors, as an API envelope.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ideaverse_core::ValidationError;
use ideaverse_schemas::registry::{self, ShapeEntry};
use ideaverse_schemas::{ErrorResponse, StandardResponse};
use serde::Serialize;
use serde_json::Value;

mod config;
mod telemetry;

use config::CheckConfig;

#[derive(Debug, Parser)]
#[command(name = "schema-check", version, about)]
struct Args {
    /// List every registered shape and exit.
    #[arg(long)]
    list: bool,

    /// Shape to check against, e.g. `paper.create`.
    #[arg(long, required_unless_present = "list")]
    shape: Option<String>,

    /// JSON document to check; `-` reads stdin.
    #[arg(long, default_value = "-")]
    input: String,
}

#[derive(Debug, Serialize)]
struct ShapeInfo {
    name: &'static str,
    kind: &'static str,
}

/// Result of checking one document.
#[derive(Debug)]
enum Outcome {
    Accepted(StandardResponse<Value>),
    Rejected(ErrorResponse),
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = CheckConfig::from_env();
    telemetry::init_telemetry(&config);

    match run(&args, &config) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "schema-check failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args, config: &CheckConfig) -> Result<ExitCode> {
    if args.list {
        let shapes: Vec<ShapeInfo> = registry::SHAPES
            .iter()
            .map(|entry| ShapeInfo {
                name: entry.name,
                kind: entry.kind.as_str(),
            })
            .collect();
        emit(&StandardResponse::ok(shapes), config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(name) = args.shape.as_deref() else {
        bail!("--shape is required unless --list is given");
    };
    let Some(entry) = registry::lookup(name) else {
        bail!("unknown shape `{name}`; run with --list to see registered shapes");
    };

    let text = read_input(&args.input)?;
    tracing::info!(shape = entry.name, input = %args.input, "Checking document");

    match check_document(entry, &text) {
        Outcome::Accepted(response) => {
            emit(&response, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(response) => {
            emit(&response, config)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn check_document(entry: &ShapeEntry, text: &str) -> Outcome {
    let checked = serde_json::from_str::<Value>(text)
        .map_err(ValidationError::from_serde)
        .and_then(|raw| entry.check(raw));

    match checked {
        Ok(record) => Outcome::Accepted(StandardResponse::ok_with_message(
            record,
            format!("Document is a valid {}", entry.name),
        )),
        Err(err) => {
            tracing::info!(shape = entry.name, violations = err.len(), "Document rejected");
            Outcome::Rejected(ErrorResponse::validation(&err))
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read document from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read `{input}`"))
    }
}

fn emit<T: Serialize>(value: &T, config: &CheckConfig) -> Result<()> {
    let rendered = if config.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to render response")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write response")?;
    Ok(())
}
