//! CLI commands, argument parsing and execution.

use clap::{Parser, Subcommand};
use flight_search_repository::FlightSearchService;
use flight_search_shared::PageQuery;
use serde_json::{json, Map, Value};

use crate::AppError;

/// Flight search CLI
#[derive(Parser, Debug)]
#[command(name = "flight-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Look up a flight by nose number
    Lookup {
        /// The nose number to match
        nose_number: String,
    },

    /// Fetch a document by id
    Get {
        /// Document id
        id: String,
    },

    /// Run a single search request
    Search {
        /// Query predicate as JSON (default: match all)
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of documents to return
        #[arg(long, default_value = "10")]
        size: usize,
    },

    /// Store a document
    Index {
        /// Document id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Document attributes as a JSON object
        document: String,
    },

    /// Delete a document by id
    Delete {
        /// Document id
        id: String,
    },

    /// Collect the id of every matching document
    Ids {
        /// Query predicate as JSON (default: match all)
        #[arg(long)]
        filter: Option<String>,

        /// Documents per page (default: ELASTIC_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
    },
}

impl Command {
    /// The subcommand name, without its arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Lookup { .. } => "lookup",
            Command::Get { .. } => "get",
            Command::Search { .. } => "search",
            Command::Index { .. } => "index",
            Command::Delete { .. } => "delete",
            Command::Ids { .. } => "ids",
        }
    }
}

fn parse_json(name: &str, raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::invalid_input(format!("{} is not valid JSON: {}", name, e)))
}

fn parse_filter(raw: Option<&str>) -> Result<Option<Value>, AppError> {
    raw.map(|raw| parse_json("filter", raw)).transpose()
}

fn parse_document(raw: &str) -> Result<Map<String, Value>, AppError> {
    match parse_json("document", raw)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::invalid_input(format!(
            "document must be a JSON object, got {}",
            other
        ))),
    }
}

/// Execute one command against the service and return its JSON output.
pub async fn run(command: Command, service: &FlightSearchService) -> Result<Value, AppError> {
    let output = match command {
        Command::Lookup { nose_number } => {
            let flights = service.find_flight_by_nose_number(&nose_number).await?;
            json!(flights)
        }
        Command::Get { id } => match service.get(&id).await? {
            Some(doc) => serde_json::to_value(doc).map_err(|e| AppError::output(e.to_string()))?,
            None => Value::Null,
        },
        Command::Search { filter, size } => {
            let mut query = PageQuery::new(service.index_name(), size);
            query.filter = parse_filter(filter.as_deref())?;
            let page = service.search(query).await?;
            serde_json::to_value(page).map_err(|e| AppError::output(e.to_string()))?
        }
        Command::Index { id, document } => {
            let source = parse_document(&document)?;
            let stored = service.index(id.as_deref(), source).await?;
            json!({ "id": stored })
        }
        Command::Delete { id } => {
            let deleted = service.delete(&id).await?;
            json!({ "id": id, "deleted": deleted })
        }
        Command::Ids { filter, page_size } => {
            let filter = parse_filter(filter.as_deref())?;
            let collected = service.collect_ids(filter, page_size).await?;
            json!({
                "count": collected.len(),
                "fetches": collected.fetches,
                "termination": collected.termination.as_str(),
                "ids": collected.sorted_keys(),
            })
        }
    };

    Ok(output)
}
