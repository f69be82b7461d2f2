//! Integration tests for the flight search CLI commands.
//!
//! These tests wire the real `FlightSearchService` and command runner to an
//! in-memory backend, so no cluster is needed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flight_search::cli::{run, Command};
use flight_search::config::ConnectionMode;
use flight_search::{AppError, Dependencies, Settings};
use flight_search_repository::{SearchBackend, SearchBackendError};
use flight_search_shared::{PageQuery, SearchDocument, SearchPage};
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

/// In-memory backend with documents kept in key order.
struct InMemoryBackend {
    documents: Mutex<BTreeMap<String, Map<String, Value>>>,
    generated: AtomicUsize,
}

impl InMemoryBackend {
    fn new() -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            generated: AtomicUsize::new(0),
        }
    }

    async fn with_flights(count: usize) -> Self {
        let backend = Self::new();
        {
            let mut docs = backend.documents.lock().await;
            for i in 1..=count {
                let mut source = Map::new();
                source.insert("noseNumber".to_string(), json!(format!("N{:03}", i)));
                source.insert("origin".to_string(), json!("LIS"));
                docs.insert(format!("flight-{:03}", i), source);
            }
        }
        backend
    }

    fn matches(filter: &Option<Value>, source: &Map<String, Value>) -> bool {
        let Some(Value::Object(filter)) = filter else {
            return true;
        };
        let Some(Value::Object(clause)) = filter.get("match") else {
            return true;
        };
        clause
            .iter()
            .all(|(field, expected)| source.get(field) == Some(expected))
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn search(&self, query: &PageQuery) -> Result<SearchPage, SearchBackendError> {
        let docs = self.documents.lock().await;
        let documents: Vec<SearchDocument> = docs
            .iter()
            .filter(|(id, _)| match query.search_after {
                Some(ref after) => id.as_str() > after.as_str(),
                None => true,
            })
            .filter(|(_, source)| Self::matches(&query.filter, source))
            .take(query.size)
            .map(|(id, source)| {
                let source = match query.source_fields {
                    Some(ref fields) => source
                        .iter()
                        .filter(|(k, _)| fields.contains(k))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                    None => source.clone(),
                };
                SearchDocument::new(id.clone(), source)
            })
            .collect();
        Ok(SearchPage::new(documents, Some(docs.len() as u64)))
    }

    async fn get_document(
        &self,
        _index: &str,
        id: &str,
    ) -> Result<Option<SearchDocument>, SearchBackendError> {
        let docs = self.documents.lock().await;
        Ok(docs
            .get(id)
            .map(|source| SearchDocument::new(id, source.clone())))
    }

    async fn index_document(
        &self,
        _index: &str,
        id: Option<&str>,
        source: &Map<String, Value>,
    ) -> Result<String, SearchBackendError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => format!("gen-{}", self.generated.fetch_add(1, Ordering::SeqCst)),
        };
        self.documents
            .lock()
            .await
            .insert(id.clone(), source.clone());
        Ok(id)
    }

    async fn delete_document(&self, _index: &str, id: &str) -> Result<bool, SearchBackendError> {
        Ok(self.documents.lock().await.remove(id).is_some())
    }

    async fn check_index_exists(&self, _index: &str) -> Result<(), SearchBackendError> {
        Ok(())
    }
}

/// Backend whose readiness check fails a fixed number of times.
struct FlakyBackend {
    failures_left: AtomicUsize,
    checks: AtomicUsize,
    failure: SearchBackendError,
}

impl FlakyBackend {
    fn new(failures: usize, failure: SearchBackendError) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            checks: AtomicUsize::new(0),
            failure,
        }
    }
}

#[async_trait]
impl SearchBackend for FlakyBackend {
    async fn search(&self, _query: &PageQuery) -> Result<SearchPage, SearchBackendError> {
        Ok(SearchPage::empty())
    }

    async fn get_document(
        &self,
        _index: &str,
        _id: &str,
    ) -> Result<Option<SearchDocument>, SearchBackendError> {
        Ok(None)
    }

    async fn index_document(
        &self,
        _index: &str,
        _id: Option<&str>,
        _source: &Map<String, Value>,
    ) -> Result<String, SearchBackendError> {
        Ok("unused".to_string())
    }

    async fn delete_document(&self, _index: &str, _id: &str) -> Result<bool, SearchBackendError> {
        Ok(false)
    }

    async fn check_index_exists(&self, _index: &str) -> Result<(), SearchBackendError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(self.failure.clone());
        }
        Ok(())
    }
}

fn settings(pairs: &[(&str, &str)]) -> Settings {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}

async fn deps_with_flights(count: usize, pairs: &[(&str, &str)]) -> Dependencies {
    let backend = Arc::new(InMemoryBackend::with_flights(count).await);
    Dependencies::from_backend(backend, &settings(pairs))
}

#[tokio::test]
async fn test_lookup_returns_matching_flight() {
    let deps = deps_with_flights(5, &[("ELASTIC_FETCH_SOURCE", "noseNumber")]).await;

    let output = run(
        Command::Lookup {
            nose_number: "N003".to_string(),
        },
        &deps.service,
    )
    .await
    .unwrap();

    assert_eq!(output, json!([{ "noseNumber": "N003" }]));
}

#[tokio::test]
async fn test_lookup_without_match_is_empty() {
    let deps = deps_with_flights(5, &[]).await;

    let output = run(
        Command::Lookup {
            nose_number: "N999".to_string(),
        },
        &deps.service,
    )
    .await
    .unwrap();

    assert_eq!(output, json!([]));
}

#[tokio::test]
async fn test_index_get_delete_cycle() {
    let deps = deps_with_flights(0, &[]).await;

    let output = run(
        Command::Index {
            id: Some("flight-100".to_string()),
            document: r#"{"noseNumber":"N100","origin":"OPO"}"#.to_string(),
        },
        &deps.service,
    )
    .await
    .unwrap();
    assert_eq!(output, json!({ "id": "flight-100" }));

    let output = run(
        Command::Get {
            id: "flight-100".to_string(),
        },
        &deps.service,
    )
    .await
    .unwrap();
    assert_eq!(output["id"], json!("flight-100"));
    assert_eq!(output["source"]["origin"], json!("OPO"));

    let output = run(
        Command::Delete {
            id: "flight-100".to_string(),
        },
        &deps.service,
    )
    .await
    .unwrap();
    assert_eq!(output, json!({ "id": "flight-100", "deleted": true }));

    let output = run(
        Command::Get {
            id: "flight-100".to_string(),
        },
        &deps.service,
    )
    .await
    .unwrap();
    assert_eq!(output, Value::Null);
}

#[tokio::test]
async fn test_index_without_id_generates_one() {
    let deps = deps_with_flights(0, &[]).await;

    let output = run(
        Command::Index {
            id: None,
            document: r#"{"noseNumber":"N1"}"#.to_string(),
        },
        &deps.service,
    )
    .await
    .unwrap();

    assert_eq!(output, json!({ "id": "gen-0" }));
}

#[tokio::test]
async fn test_index_rejects_non_object_document() {
    let deps = deps_with_flights(0, &[]).await;

    let result = run(
        Command::Index {
            id: None,
            document: "42".to_string(),
        },
        &deps.service,
    )
    .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test]
async fn test_search_returns_single_page() {
    let deps = deps_with_flights(8, &[]).await;

    let output = run(
        Command::Search {
            filter: None,
            size: 3,
        },
        &deps.service,
    )
    .await
    .unwrap();

    assert_eq!(output["documents"].as_array().map(Vec::len), Some(3));
    assert_eq!(output["total_hint"], json!(8));
}

#[tokio::test]
async fn test_ids_collects_every_flight() {
    let deps = deps_with_flights(25, &[("ELASTIC_PAGE_SIZE", "10")]).await;

    let output = run(
        Command::Ids {
            filter: None,
            page_size: None,
        },
        &deps.service,
    )
    .await
    .unwrap();

    assert_eq!(output["count"], json!(25));
    assert_eq!(output["fetches"], json!(3));
    assert_eq!(output["termination"], json!("last_page"));
    assert_eq!(output["ids"][0], json!("flight-001"));
    assert_eq!(output["ids"][24], json!("flight-025"));
}

#[tokio::test]
async fn test_ids_with_filter_and_page_size() {
    let deps = deps_with_flights(25, &[]).await;

    let output = run(
        Command::Ids {
            filter: Some(r#"{"match":{"noseNumber":"N007"}}"#.to_string()),
            page_size: Some(4),
        },
        &deps.service,
    )
    .await
    .unwrap();

    assert_eq!(output["count"], json!(1));
    assert_eq!(output["ids"], json!(["flight-007"]));
}

#[tokio::test]
async fn test_ids_rejects_zero_page_size() {
    let deps = deps_with_flights(3, &[]).await;

    let result = run(
        Command::Ids {
            filter: None,
            page_size: Some(0),
        },
        &deps.service,
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::SearchError(SearchBackendError::ValidationError(_)))
    ));
}

#[tokio::test]
async fn test_invalid_filter_json() {
    let deps = deps_with_flights(3, &[]).await;

    let result = run(
        Command::Ids {
            filter: Some("{oops".to_string()),
            page_size: None,
        },
        &deps.service,
    )
    .await;

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
}

#[tokio::test(start_paused = true)]
async fn test_wait_until_ready_retries_transient_failures() {
    let backend = Arc::new(FlakyBackend::new(
        2,
        SearchBackendError::unavailable("connection refused"),
    ));
    let deps = Dependencies::from_backend(backend.clone(), &settings(&[]));

    Dependencies::wait_until_ready(
        &deps.service,
        ConnectionMode::Retry,
        Duration::from_secs(15),
    )
    .await
    .unwrap();

    assert_eq!(backend.checks.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_wait_until_ready_fail_fast() {
    let backend = Arc::new(FlakyBackend::new(
        1,
        SearchBackendError::unavailable("connection refused"),
    ));
    let deps = Dependencies::from_backend(backend.clone(), &settings(&[]));

    let result = Dependencies::wait_until_ready(
        &deps.service,
        ConnectionMode::FailFast,
        Duration::from_secs(15),
    )
    .await;

    assert!(matches!(result, Err(AppError::ConfigError(_))));
    assert_eq!(backend.checks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_wait_until_ready_missing_index_is_not_retried() {
    let backend = Arc::new(FlakyBackend::new(
        5,
        SearchBackendError::index_not_found("flights"),
    ));
    let deps = Dependencies::from_backend(backend.clone(), &settings(&[]));

    let result = Dependencies::wait_until_ready(
        &deps.service,
        ConnectionMode::Retry,
        Duration::from_secs(15),
    )
    .await;

    assert!(matches!(result, Err(AppError::ConfigError(_))));
    assert_eq!(backend.checks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_until_ready_auth_failure_is_not_retried() {
    let backend = Arc::new(FlakyBackend::new(
        usize::MAX,
        SearchBackendError::from_status(401, "security_exception: missing authentication"),
    ));
    let deps = Dependencies::from_backend(backend.clone(), &settings(&[]));

    let result = tokio::time::timeout(
        Duration::from_secs(3600),
        Dependencies::wait_until_ready(
            &deps.service,
            ConnectionMode::Retry,
            Duration::from_secs(15),
        ),
    )
    .await
    .expect("readiness check should give up on an auth failure");

    assert!(matches!(result, Err(AppError::ConfigError(_))));
    assert_eq!(backend.checks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_until_ready_retries_server_errors() {
    let backend = Arc::new(FlakyBackend::new(
        2,
        SearchBackendError::from_status(503, "cluster_block_exception"),
    ));
    let deps = Dependencies::from_backend(backend.clone(), &settings(&[]));

    Dependencies::wait_until_ready(
        &deps.service,
        ConnectionMode::Retry,
        Duration::from_secs(15),
    )
    .await
    .unwrap();

    assert_eq!(backend.checks.load(Ordering::SeqCst), 3);
}
