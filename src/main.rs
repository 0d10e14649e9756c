//! Hale - Main entrypoint.
//!
//! Builds a chain map from configuration, replays the operations given on the
//! command line against it, and prints the step trace and bucket layout.

use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use hale_lib::config::{self, ConfigLoader, HaleConfig, LogConfig, ENV_PREFIX};
use hale_lib::data_structures::hale_chain_map::{
    HaleChainMap, HaleChainMapError, TableSnapshot, TaggedValue, ValueKind,
};
use hale_lib::error::{
    report_error, set_error_reporter, ErrorContext, HaleError, HaleResult, TracingErrorReporter,
};

/// Command line arguments for Hale.
#[derive(Parser, Debug)]
#[clap(name = "Hale", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Replay operations against a fresh table and print the step trace.
    ///
    /// Operations: insert:K=V, put:K=V, get:K, erase:K, contains:K, find:V,
    /// reserve:N, rehash:N, clear
    Run {
        /// Override the configured key kind
        #[clap(long)]
        key_kind: Option<ValueKind>,

        /// Override the configured value kind
        #[clap(long)]
        value_kind: Option<ValueKind>,

        /// Print a JSON report instead of plain text
        #[clap(long)]
        json: bool,

        /// Operations to apply, in order
        ops: Vec<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// One table operation parsed from the command line.
#[derive(Debug, Clone, PartialEq)]
enum Operation {
    Insert(String, String),
    Put(String, String),
    Get(String),
    Erase(String),
    Contains(String),
    Find(String),
    Reserve(usize),
    Rehash(usize),
    Clear,
}

impl FromStr for Operation {
    type Err = HaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Operands are trimmed before conversion, so `put: x = red` stores "x".
        let (name, arg) = s.split_once(':').unwrap_or((s, ""));
        let (name, arg) = (name.trim(), arg.trim());
        let pair = || {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| HaleError::Custom(format!("expected KEY=VALUE in {s:?}")))
        };
        let count = || {
            arg.parse::<usize>()
                .map_err(|e| HaleError::Custom(format!("invalid count in {s:?}: {e}")))
        };

        match name {
            "insert" => pair().map(|(k, v)| Operation::Insert(k, v)),
            "put" => pair().map(|(k, v)| Operation::Put(k, v)),
            "get" => Ok(Operation::Get(arg.to_string())),
            "erase" => Ok(Operation::Erase(arg.to_string())),
            "contains" => Ok(Operation::Contains(arg.to_string())),
            "find" => Ok(Operation::Find(arg.to_string())),
            "reserve" => count().map(Operation::Reserve),
            "rehash" => count().map(Operation::Rehash),
            "clear" => Ok(Operation::Clear),
            other => Err(HaleError::Custom(format!("unknown operation: {other:?}"))),
        }
    }
}

/// JSON report printed by `run --json`.
#[derive(Serialize)]
struct RunReport<'a> {
    steps: &'a [String],
    table: TableSnapshot,
}

/// Initialize the logging system.
fn init_logging(log: &LogConfig) -> HaleResult<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(log.source_location)
        .with_file(log.source_location)
        .with_writer(std::io::stderr);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };
    result.map_err(|e| HaleError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn parse_pair(
    table: &HaleChainMap,
    key: &str,
    value: &str,
) -> Result<(TaggedValue, TaggedValue), HaleChainMapError> {
    Ok((table.parse_key(key)?, table.parse_value(value)?))
}

/// Applies one operation, annotating the trace with its outcome.
fn apply(table: &mut HaleChainMap, op: &Operation) {
    let outcome = match op {
        Operation::Insert(k, v) => parse_pair(table, k, v)
            .map(|(key, value)| format!("Result: insert({k}, {v}) = {}", table.insert(key, value))),
        Operation::Put(k, v) => parse_pair(table, k, v).map(|(key, value)| {
            let added = table.put(key, value);
            format!("Result: put({k}, {v}) {}", if added { "added" } else { "updated" })
        }),
        Operation::Get(k) => table.parse_key(k).map(|key| match table.get(&key) {
            Some(value) => format!("Result: found key {k} → value {value}"),
            None => format!("Result: key {k} not found"),
        }),
        Operation::Erase(k) => table
            .parse_key(k)
            .map(|key| format!("Result: erase({k}) = {}", table.erase(&key))),
        Operation::Contains(k) => table
            .parse_key(k)
            .map(|key| format!("Result: contains({k}) = {}", table.contains(&key))),
        Operation::Find(v) => table.parse_value(v).map(|value| match table.find_by_value(&value) {
            Some(key) => format!("Result: value {v} found under key {key}"),
            None => format!("Result: value {v} not found"),
        }),
        Operation::Reserve(n) => {
            table.reserve(*n);
            Ok(format!("Result: {} buckets", table.bucket_count()))
        }
        Operation::Rehash(n) => {
            let done = table.rehash(*n);
            Ok(format!("Result: rehash({n}) = {done}"))
        }
        Operation::Clear => {
            table.clear();
            Ok("Result: table cleared".to_string())
        }
    };

    match outcome {
        Ok(line) => table.annotate(line),
        Err(err) => {
            table.annotate(format!("Input rejected: {err}"));
            report_error(
                ErrorContext::new(HaleError::Table(err), "driver").with_details(format!("{op:?}")),
            );
        }
    }
}

fn print_table(table: &HaleChainMap) {
    for step in table.steps() {
        println!("{step}");
    }
    println!();
    println!(
        "size = {}, buckets = {}, load factor = {:.2} (max {:.2})",
        table.size(),
        table.bucket_count(),
        table.load_factor(),
        table.max_load_factor()
    );
    for (index, chain) in table.bucket_contents().iter().enumerate() {
        let rendered: Vec<String> = chain.iter().map(|(k, v)| format!("({k},{v})")).collect();
        println!("[{index:>3}] {}", rendered.join(" -> "));
    }
}

fn load_or_exit(loader: &ConfigLoader) -> HaleConfig {
    match loader.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

/// Main entry point for the application.
fn main() -> HaleResult<()> {
    let args = Args::parse();
    let config_loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);

    // Logging follows the configured level when the configuration loads;
    // otherwise defaults are used so the load error itself gets logged.
    let log_config = config_loader
        .load()
        .map(|config| config.log)
        .unwrap_or_default();
    init_logging(&log_config)?;

    set_error_reporter(Arc::new(TracingErrorReporter));

    match args.command {
        Command::Run {
            key_kind,
            value_kind,
            json,
            ops,
        } => {
            config::init_global_config(load_or_exit(&config_loader));
            let mut table_config = config::get_global_config().get().table.clone();
            if let Some(kind) = key_kind {
                table_config.key_kind = kind;
            }
            if let Some(kind) = value_kind {
                table_config.value_kind = kind;
            }

            info!(
                "Replaying {} operations on a {}/{} table with {} buckets",
                ops.len(),
                table_config.key_kind,
                table_config.value_kind,
                table_config.initial_bucket_count
            );

            let operations = ops
                .iter()
                .map(|raw| raw.parse::<Operation>())
                .collect::<HaleResult<Vec<_>>>()?;

            let mut table = HaleChainMap::with_config(table_config)?;
            for op in &operations {
                apply(&mut table, op);
            }

            if json {
                let report = RunReport {
                    steps: table.steps(),
                    table: table.snapshot(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_table(&table);
            }
            Ok(())
        }
        Command::Validate => {
            info!("Validating configuration");
            load_or_exit(&config_loader);
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let default_config = HaleConfig::default();

            // Create parent directories if they don't exist
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| HaleError::Custom(format!("Failed to serialize config: {e}")))?;

            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
