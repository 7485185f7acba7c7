//! Launix command line client
//!
//! Exercises the connector from a shell: browse the schema descriptor,
//! inspect inferred form fields, run custom actions and record operations.
//!
//! Usage:
//!   launix --base-url https://erp.example.com --token $TOKEN tables
//!   launix --config launix.toml dispatch orders print --id 42 -o order.pdf
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use launix_connector::{
    Connector, ConnectorConfig, FailurePolicy, ItemOutcome, RecordRequest, ResponseClassification,
    classify_response, parse_filter, run_items,
};
use launix_model::{BinaryPayload, OCTET_STREAM, Operation};
use serde_json::{Map, Value, json};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "launix")]
#[command(about = "Command line client for Launix installations")]
struct Args {
    /// TOML config file with connection settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the installation (overrides the config file)
    #[arg(long, env = "LAUNIX_BASE_URL")]
    base_url: Option<String>,

    /// API token (overrides the config file)
    #[arg(long, env = "LAUNIX_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify that the URL and token yield a descriptor
    Check,

    /// List tables, optionally filtered by label
    Tables {
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// List the custom actions of a table
    Actions {
        table: String,
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the form fields inferred for a table
    Fields {
        table: String,
        /// Operation the form is for (create, edit, ...)
        #[arg(long, default_value = "create")]
        operation: String,
    },

    /// Show the parameter fields of a custom action
    ActionParams { table: String, action: String },

    /// Show the options offered for a reference to a table
    Options { table: String },

    /// Run a custom action
    Dispatch {
        table: String,
        action: String,
        /// Parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,
        /// Record id, used when the action has no explicit id
        #[arg(long)]
        id: Option<String>,
        /// Where to write a PDF response
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a record operation (create, view, edit, delete, list)
    Record {
        operation: String,
        table: String,
        #[arg(long)]
        id: Option<String>,
        /// Column values as a JSON object
        #[arg(long)]
        columns: Option<String>,
        /// List filter as a JSON object
        #[arg(long)]
        filter: Option<String>,
    },

    /// Run a record operation for every entry of a JSON array file
    Batch {
        operation: String,
        /// File holding `[{"table": .., "id": .., "columns": {..}, "filter": {..}}, ...]`
        file: PathBuf,
        /// Keep going after a failed entry
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// Download a stored file
    RetrieveFile {
        id: String,
        /// Target path; defaults to the announced file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a local file
    UploadFile {
        path: PathBuf,
        /// File name to announce; defaults to the local name
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = OCTET_STREAM)]
        mime: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(&args)?;
    let connector = Connector::new(config).context("Failed to set up connector")?;

    match args.command {
        Command::Check => {
            connector
                .check_credentials()
                .await
                .context("Credential check failed")?;
            print_json(&json!({ "ok": true }))?;
        }
        Command::Tables { filter } => {
            let entries = connector.search_tables(filter.as_deref()).await?;
            print_json(&entries)?;
        }
        Command::Actions { table, filter } => {
            let entries = connector.search_actions(&table, filter.as_deref()).await?;
            print_json(&entries)?;
        }
        Command::Fields { table, operation } => {
            let operation: Operation = operation.parse()?;
            let fields = connector.table_fields(&table, operation).await?;
            print_json(&fields)?;
        }
        Command::ActionParams { table, action } => {
            let fields = connector.action_param_fields(&table, &action).await?;
            print_json(&fields)?;
        }
        Command::Options { table } => {
            let options = connector.load_reference_options(&table).await;
            print_json(&options)?;
        }
        Command::Dispatch {
            table,
            action,
            params,
            id,
            output,
        } => {
            let params = json_object(params.as_deref(), "--params")?;
            let prepared = connector
                .prepare_dispatch(&table, &action, &params, id.as_deref())
                .await?;
            let response = connector.send_prepared(&prepared).await?;
            let url = connector.config().url(&prepared.path);
            let classification = classify_response(&response, || prepared.default_file_name());
            if let ResponseClassification::Binary(payload) = &classification {
                let target = output.unwrap_or_else(|| {
                    PathBuf::from(payload.local_file_name(&prepared.default_file_name()))
                });
                write_payload(&target, payload).await?;
            }
            print_json(&classification.to_item_json(&url))?;
        }
        Command::Record {
            operation,
            table,
            id,
            columns,
            filter,
        } => {
            let operation: Operation = operation.parse()?;
            let request = RecordRequest {
                table,
                id,
                columns: json_object(columns.as_deref(), "--columns")?,
                filter: parse_filter(&filter.map(Value::String).unwrap_or(Value::Null))?,
            };
            let result = connector.run_record_operation(operation, &request).await?;
            print_json(&result)?;
        }
        Command::Batch {
            operation,
            file,
            continue_on_fail,
        } => {
            let operation: Operation = operation.parse()?;
            let requests = read_batch(&file).await?;
            let policy = if continue_on_fail {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Stop
            };
            let connector = &connector;
            let outcomes = run_items(requests, policy, |_, request| async move {
                connector.run_record_operation(operation, &request).await
            })
            .await?;
            let results: Vec<Value> = outcomes
                .into_iter()
                .map(|outcome| match outcome {
                    ItemOutcome::Succeeded(value) => value,
                    ItemOutcome::Failed { index, error } => {
                        json!({ "error": error.to_string(), "index": index })
                    }
                })
                .collect();
            print_json(&results)?;
        }
        Command::RetrieveFile { id, output } => {
            let payload = connector.retrieve_file(&id).await?;
            let target = output
                .unwrap_or_else(|| PathBuf::from(payload.local_file_name(&format!("file_{id}"))));
            write_payload(&target, &payload).await?;
            print_json(&payload)?;
        }
        Command::UploadFile { path, name, mime } => {
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = name
                .or_else(|| {
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                })
                .unwrap_or_default();
            let result = connector
                .upload_file(BinaryPayload::new(file_name, mime, data))
                .await?;
            print_json(&result)?;
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<ConnectorConfig> {
    let mut config = match &args.config {
        Some(path) => ConnectorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ConnectorConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(token) = &args.token {
        config.token = token.clone();
    }
    Ok(config)
}

fn json_object(source: Option<&str>, flag: &str) -> Result<Map<String, Value>> {
    let Some(source) = source else {
        return Ok(Map::new());
    };
    let parsed = serde_json::from_str::<Value>(source)
        .with_context(|| format!("{flag} is not valid JSON"))?;
    match parsed {
        Value::Object(object) => Ok(object),
        _ => bail!("{flag} must be a JSON object"),
    }
}

async fn read_batch(path: &Path) -> Result<Vec<RecordRequest>> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entries: Vec<Value> = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| -> Result<RecordRequest> {
            let table = entry
                .get("table")
                .and_then(Value::as_str)
                .with_context(|| format!("entry {index} has no table"))?;
            Ok(RecordRequest {
                table: table.to_string(),
                id: entry
                    .get("id")
                    .filter(|id| !id.is_null())
                    .map(launix_model::display_string),
                columns: entry
                    .get("columns")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
                filter: parse_filter(entry.get("filter").unwrap_or(&Value::Null))?,
            })
        })
        .collect()
}

async fn write_payload(target: &Path, payload: &BinaryPayload) -> Result<()> {
    tokio::fs::write(target, &payload.data)
        .await
        .with_context(|| format!("Failed to write {}", target.display()))?;
    info!("Wrote {} bytes to {}", payload.len(), target.display());
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
