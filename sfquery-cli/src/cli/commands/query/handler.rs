//! Query command handler

use anyhow::{Context, Result};
use colored::*;
use serde_json::Value;
use std::fs;
use std::time::Instant;

use super::{DisplayStyle, OutputFormat, QueryCommands};
use sfquery::api::{
    Credentials, QueryError, QueryOptions, QueryOutput, Transport, bootstrap, execute_query,
};

/// Key Salesforce adds to every record with its type and URL
const ATTRIBUTES_KEY: &str = "attributes";

/// Handle the query command
pub async fn handle_query_command(
    args: QueryCommands,
    transport: &dyn Transport,
    credentials: Credentials,
) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }
    let verbose = matches!(args.style, DisplayStyle::Verbose);

    let query_text = read_query_text(&args, verbose)?;

    if verbose {
        println!("Query: {}", query_text.dimmed());
        println!();
    }

    let start_session = Instant::now();
    let session = bootstrap(transport, credentials)
        .await
        .context("Failed to start session")?;

    if verbose {
        println!(
            "Connected to {} ({}) in {:.2}ms",
            session.base_uri().bright_green().bold(),
            session.data_path(),
            start_session.elapsed().as_secs_f64() * 1000.0
        );
        println!("Executing query...");
    }

    let mut options = QueryOptions::new()
        .expand_fields(args.expand)
        .fetch_all_pages(args.all);
    if let Some(path) = &args.output {
        options = options.sink(path);
    }

    let start_exec = Instant::now();
    let output = match execute_query(transport, &session, &query_text, &options).await {
        Ok(output) => output,
        Err(err @ QueryError::Pagination { .. }) => {
            eprintln!(
                "{} query stopped early, {} records were fetched before the failure",
                "warning:".yellow().bold(),
                err.partial_records().len()
            );
            return Err(err).context("Failed to execute query");
        }
        Err(err) => return Err(err).context("Failed to execute query"),
    };

    if verbose {
        println!(
            "Execution time: {:.2}ms",
            start_exec.elapsed().as_secs_f64() * 1000.0
        );
        println!();
    }

    match &output {
        QueryOutput::Persisted { .. } => {
            println!("{}", output.to_string().bright_green());
        }
        QueryOutput::Records(records) => {
            if verbose {
                println!("Results ({} records):", records.len());
                println!();
            }
            println!("{}", format_output(records, &args.format)?);
        }
    }

    Ok(())
}

/// Query text from the positional argument or `--file`, exactly one of them
fn read_query_text(args: &QueryCommands, verbose: bool) -> Result<String> {
    match (&args.query, &args.file) {
        (None, None) => {
            anyhow::bail!("Either provide a query string or use --file to specify a query file")
        }
        (Some(_), Some(_)) => anyhow::bail!("Cannot specify both query string and --file option"),
        (Some(query), None) => Ok(query.clone()),
        (None, Some(file_path)) => {
            if !file_path.exists() {
                anyhow::bail!("Query file does not exist: {}", file_path.display());
            }

            let content = fs::read_to_string(file_path)
                .with_context(|| format!("Failed to read query file: {}", file_path.display()))?;

            let trimmed = content.trim();
            if trimmed.is_empty() {
                anyhow::bail!("Query file is empty: {}", file_path.display());
            }

            if verbose {
                println!(
                    "Reading query from: {}",
                    file_path.display().to_string().cyan()
                );
            }
            Ok(trimmed.to_string())
        }
    }
}

/// Format query records according to the specified output format
fn format_output(records: &[Value], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(records).context("Failed to format JSON output")
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(records).context("Failed to format JSON output")
        }
        OutputFormat::Csv => records_to_csv(records),
    }
}

/// CSV with headers taken from the first record, minus the attributes envelope
fn records_to_csv(records: &[Value]) -> Result<String> {
    let Some(Value::Object(first)) = records.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&str> = first
        .keys()
        .map(String::as_str)
        .filter(|key| *key != ATTRIBUTES_KEY)
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| json_value_to_string(record.get(*h).unwrap_or(&Value::Null)))
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Convert a JSON value to a CSV cell
fn json_value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
