use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use jval_core::{Error, Schema, SchemaNode, ValidateOptions};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;

/// Exit code for data that does not conform, and for unreadable input.
const EXIT_INVALID: i32 = 1;
/// Exit code for an ill-formed schema document.
const EXIT_SCHEMA: i32 = 2;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "jval", version)]
#[command(about = "Validate JSON documents against annotated JSON schemas")]
struct Cli {
    /// Emit debug logs to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a data file and print its normalized form.
    Validate(ValidateArgs),
    /// Check that a schema file is well-formed.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// JSON data file, or `-` for stdin.
    data: PathBuf,
    /// Schema file.
    schema: PathBuf,
    /// Omit keys not declared in the schema instead of rejecting them.
    #[arg(long)]
    drop_extra_keys: bool,
    /// YAML file with validation options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format for the normalized value.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema file.
    schema: PathBuf,
}

/// A command failure and the exit code it maps to.
#[derive(Debug)]
enum Failure {
    /// I/O, parse, or argument problems.
    Input(String),
    /// Schema or data rejected by the validator.
    Rejected(Error),
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::Input(message)
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Self::Rejected(err)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Check(args) => run_check(args),
    };

    match result {
        Ok(()) => {}
        Err(Failure::Input(message)) => {
            eprintln!("error: {message}");
            std::process::exit(EXIT_INVALID);
        }
        Err(Failure::Rejected(err)) => {
            eprintln!("error: {}", describe_error(&err));
            let code = if err.is_schema_error() {
                EXIT_SCHEMA
            } else {
                EXIT_INVALID
            };
            std::process::exit(code);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(args: ValidateArgs) -> Result<(), Failure> {
    let mut options = match &args.config {
        Some(path) => config::load_options(path)?,
        None => ValidateOptions::default(),
    };
    if args.drop_extra_keys {
        options = options.drop_extra_keys(true);
    }
    debug!(?options, "resolved validation options");

    let schema = compile_schema(&args.schema)?;
    let data = read_json(&args.data)?;
    let output = schema
        .validate(&data, &options)
        .map_err(|err| Failure::Rejected(err.into()))?;

    println!("{}", format_value(&output, args.format)?);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), Failure> {
    let schema = compile_schema(&args.schema)?;
    let summary = match schema.root() {
        SchemaNode::NestedObject(fields) => {
            let required = fields.iter().filter(|field| !field.optional).count();
            format!(
                "object with {} field(s), {required} required",
                fields.len()
            )
        }
        node => node.describe().to_string(),
    };
    println!("Schema '{}' is valid: {summary}.", args.schema.display());
    Ok(())
}

fn compile_schema(path: &Path) -> Result<Schema, Failure> {
    let raw = read_json(path)?;
    let schema = Schema::compile(&raw).map_err(|err| Failure::Rejected(err.into()))?;
    debug!(path = %path.display(), "schema compiled");
    Ok(schema)
}

fn read_json(path: &Path) -> Result<Value, String> {
    let raw = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        buffer
    } else {
        fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?
    };
    serde_json::from_str(&raw)
        .map_err(|err| format!("Error decoding JSON in '{}': {err}", path.display()))
}

fn format_value(value: &Value, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Renders `<code> at <location>: <detail>`.
fn describe_error(err: &Error) -> String {
    let location = err.location();
    let location = if location.is_root() {
        "root".to_string()
    } else {
        location.to_string()
    };
    let detail = match err {
        Error::Schema(err) => err.kind.to_string(),
        Error::Validation(err) => err.kind.to_string(),
    };
    format!("{} at {location}: {detail}", err.code())
}
