//! CLI command implementations
//!
//! Every command loads the configuration, opens the store from
//! `data_dir` and hands it explicitly to the loader, engine or checker.
//! Each command writes exactly one JSON response to stdout.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};

use crate::integrity::IntegrityChecker;
use crate::loader::BulkLoader;
use crate::observability::{log_event_with_fields, Event};
use crate::query::{AnalyzeRequest, CountyQuery, QueryEngine, QueryError};
use crate::storage::FileStore;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Subdirectories created by `init`
const LAYOUT: [&str; 2] = ["data", "metadata"];

/// Main CLI entry point
///
/// Parses arguments, dispatches, and reports failures as a JSON error
/// response before returning them.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let result = run_command(&cli.config, cli.command);

    if let Err(ref e) = result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Run one command against the configuration at `config_path`
pub fn run_command(config_path: &Path, cmd: Command) -> CliResult<()> {
    let config = Config::load(config_path)?;
    log_event_with_fields(Event::ConfigLoaded, &[("data_dir", &config.data_dir)]);

    let data = match cmd {
        Command::Init => init(&config)?,
        Command::Load { csv } => load(&config, &csv)?,
        Command::Summary => {
            let store = open_store(&config)?;
            to_json(&engine(&config, &store).summary()?)?
        }
        Command::County {
            name,
            page,
            page_size,
            model_year,
            sort_by,
            sort_order,
        } => {
            let mut query = CountyQuery::new(name)
                .page(page, page_size.unwrap_or(config.default_page_size))
                .sort(sort_by, sort_order);
            query.model_year = model_year;

            let store = open_store(&config)?;
            to_json(&engine(&config, &store).county_listing(&query)?)?
        }
        Command::Models { make } => {
            let store = open_store(&config)?;
            to_json(&engine(&config, &store).models_by_make(&make)?)?
        }
        Command::Trends => {
            let store = open_store(&config)?;
            json!({ "trends": engine(&config, &store).trends()? })
        }
        Command::BevRange => {
            let store = open_store(&config)?;
            json!({ "average_bev_range": engine(&config, &store).bev_average_range()? })
        }
        Command::Analyze => {
            let request = parse_analyze(read_request()?)?;
            let store = open_store(&config)?;
            json!({ "results": engine(&config, &store).analyze_request(&request)? })
        }
        Command::Verify => {
            let store = open_store(&config)?;
            to_json(&IntegrityChecker::new(&store).check_all()?)?
        }
    };

    write_response(data)
}

/// Create the data directory layout. Safe to run again.
pub fn init(config: &Config) -> CliResult<Value> {
    let data_dir = config.data_path();
    let created = !is_initialized(data_dir);

    for dir in LAYOUT {
        let path = data_dir.join(dir);
        fs::create_dir_all(&path).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {:?}: {}", path, e))
        })?;
    }

    Ok(json!({ "initialized": true, "created": created }))
}

/// Load a CSV file into the store
pub fn load(config: &Config, csv: &Path) -> CliResult<Value> {
    let mut store = open_store(config)?;
    let summary = BulkLoader::new(&mut store)
        .with_batch_size(config.batch_size)
        .load_path(csv)?;
    to_json(&summary)
}

fn is_initialized(data_dir: &Path) -> bool {
    LAYOUT.iter().all(|dir| data_dir.join(dir).is_dir())
}

fn open_store(config: &Config) -> CliResult<FileStore> {
    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    let store = FileStore::open(data_dir)?;
    log_event_with_fields(
        Event::StoreOpened,
        &[
            ("data_dir", &config.data_dir),
            ("documents", &store.len().to_string()),
        ],
    );
    Ok(store)
}

fn engine<'a>(config: &Config, store: &'a FileStore) -> QueryEngine<'a, FileStore> {
    QueryEngine::new(store)
        .with_top_makes_limit(config.top_makes_limit)
        .with_max_page_size(config.max_page_size)
}

fn parse_analyze(request: Value) -> CliResult<AnalyzeRequest> {
    serde_json::from_value(request).map_err(|e| {
        QueryError::invalid_argument(format!("Malformed analyze request: {}", e)).into()
    })
}

fn to_json<T: Serialize>(value: &T) -> CliResult<Value> {
    Ok(serde_json::to_value(value)?)
}
