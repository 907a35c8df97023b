//! Query engine
//!
//! Init -> [field expansion] -> first fetch -> [page loop] -> done | failed.
//! A pagination failure returns every record gathered before it. A sink
//! failure returns only the write error, even though the fetch succeeded.

use super::expand::expand_query;
use super::options::{QueryOptions, QueryOutput};
use super::pages::QueryPages;
use super::sink::{FileSink, Sink, persist};
use crate::api::errors::QueryError;
use crate::api::session::Session;
use crate::api::transport::Transport;
use log::{info, warn};
use serde_json::Value;

/// Run a query, persisting to the local filesystem when `options.sink` is set
pub async fn execute_query(
    transport: &dyn Transport,
    session: &Session,
    query: &str,
    options: &QueryOptions,
) -> Result<QueryOutput, QueryError> {
    execute_query_with_sink(transport, session, query, options, &FileSink).await
}

/// Run a query, persisting through `sink` when `options.sink` is set
pub async fn execute_query_with_sink(
    transport: &dyn Transport,
    session: &Session,
    query: &str,
    options: &QueryOptions,
    sink: &dyn Sink,
) -> Result<QueryOutput, QueryError> {
    let query = if options.expand_fields {
        expand_query(transport, session, query).await?
    } else {
        query.to_string()
    };

    let records = fetch_records(transport, session, &query, options.fetch_all_pages).await?;
    info!("Query returned {} records", records.len());

    match &options.sink {
        None => Ok(QueryOutput::Records(records)),
        Some(path) => Ok(persist(sink, path, &records).await?),
    }
}

/// First page only, or every page in arrival order
async fn fetch_records(
    transport: &dyn Transport,
    session: &Session,
    query: &str,
    fetch_all_pages: bool,
) -> Result<Vec<Value>, QueryError> {
    let mut pages = QueryPages::new(transport, session, query);
    let mut records = Vec::new();

    while let Some(page) = pages.next_page().await {
        match page {
            Ok(page) => {
                records.extend(page.records);
                if !fetch_all_pages {
                    break;
                }
            }
            Err(source) => {
                warn!(
                    "Query stopped after {} pages ({} records): {}",
                    pages.pages_fetched(),
                    records.len(),
                    source
                );
                return Err(QueryError::Pagination {
                    source,
                    partial_records: records,
                });
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::{ApiError, PageFailure, SinkError};
    use crate::api::session::bootstrap;
    use crate::api::session::tests::{bootstrapped_transport, credentials};
    use crate::api::testing::ScriptedTransport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    const QUERY: &str = "/services/data/v59.0/query";
    const DESCRIBE: &str = "/services/data/v59.0/sobjects/Account/describe";

    fn two_pages() -> ScriptedTransport {
        bootstrapped_transport()
            .respond(
                QUERY,
                200,
                json!({"done": false, "records": [{"Id": "A"}, {"Id": "B"}], "nextRecordsUrl": "p2"}),
            )
            .respond("p2", 200, json!({"done": true, "records": [{"Id": "C"}]}))
    }

    /// Keeps what it was asked to write, or fails every write
    #[derive(Default)]
    struct MemorySink {
        fail: bool,
        written: Mutex<Vec<(PathBuf, String)>>,
    }

    #[async_trait]
    impl Sink for MemorySink {
        async fn write(&self, path: &Path, contents: &str) -> std::io::Result<()> {
            if self.fail {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only volume",
                ));
            }
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), contents.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_first_page_only() {
        let transport = two_pages();
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let output = execute_query(&transport, &session, "SELECT Id FROM Account", &QueryOptions::new())
            .await
            .unwrap();

        assert_eq!(
            output,
            QueryOutput::Records(vec![json!({"Id": "A"}), json!({"Id": "B"})])
        );
        assert!(!transport.paths().contains(&"p2".to_string()));
    }

    #[tokio::test]
    async fn test_first_page_only_without_cursor() {
        let transport = bootstrapped_transport().respond(
            QUERY,
            200,
            json!({"done": false, "records": [{"Id": "A"}]}),
        );
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let output = execute_query(&transport, &session, "SELECT Id FROM Account", &QueryOptions::new())
            .await
            .unwrap();

        assert_eq!(output, QueryOutput::Records(vec![json!({"Id": "A"})]));
    }

    #[tokio::test]
    async fn test_all_pages_without_cursor_keeps_first_page() {
        let transport = bootstrapped_transport().respond(
            QUERY,
            200,
            json!({"done": false, "records": [{"Id": "A"}, {"Id": "B"}]}),
        );
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let err = execute_query(
            &transport,
            &session,
            "SELECT Id FROM Account",
            &QueryOptions::new().fetch_all_pages(true),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            QueryError::Pagination {
                source: PageFailure::Malformed(_),
                ..
            }
        ));
        assert_eq!(err.partial_records(), &[json!({"Id": "A"}), json!({"Id": "B"})]);
    }

    #[tokio::test]
    async fn test_all_pages_in_arrival_order() {
        let transport = two_pages();
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let output = execute_query(
            &transport,
            &session,
            "SELECT Id FROM Account",
            &QueryOptions::new().fetch_all_pages(true),
        )
        .await
        .unwrap();

        assert_eq!(
            output.records().unwrap(),
            &[json!({"Id": "A"}), json!({"Id": "B"}), json!({"Id": "C"})]
        );
    }

    #[tokio::test]
    async fn test_malformed_page_keeps_partial_records() {
        let transport = bootstrapped_transport()
            .respond(
                QUERY,
                200,
                json!({"done": false, "records": [{"Id": "A"}], "nextRecordsUrl": "p2"}),
            )
            .respond(
                "p2",
                200,
                json!({"done": false, "records": [{"Id": "B"}], "nextRecordsUrl": "p3"}),
            )
            .respond("p3", 200, json!({"records": [{"Id": "X"}]}));
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let err = execute_query(
            &transport,
            &session,
            "SELECT Id FROM Account",
            &QueryOptions::new().fetch_all_pages(true),
        )
        .await
        .unwrap_err();

        match err {
            QueryError::Pagination {
                source: PageFailure::Malformed(_),
                partial_records,
            } => assert_eq!(partial_records, vec![json!({"Id": "A"}), json!({"Id": "B"})]),
            other => panic!("expected pagination error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_page_fetch_keeps_partial_records() {
        let transport = bootstrapped_transport()
            .respond(
                QUERY,
                200,
                json!({"done": false, "records": [{"Id": "A"}, {"Id": "B"}], "nextRecordsUrl": "p2"}),
            )
            .respond("p2", 500, json!([{"errorCode": "QUERY_TIMEOUT"}]));
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let err = execute_query(
            &transport,
            &session,
            "SELECT Id FROM Account",
            &QueryOptions::new().fetch_all_pages(true),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            &err,
            QueryError::Pagination {
                source: PageFailure::Api(ApiError::Status {
                    status_code: 500,
                    ..
                }),
                ..
            }
        ));
        assert_eq!(err.partial_records(), &[json!({"Id": "A"}), json!({"Id": "B"})]);
    }

    #[tokio::test]
    async fn test_first_fetch_failure_has_no_records() {
        let transport = bootstrapped_transport().fail(QUERY, "connection reset");
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let err = execute_query(&transport, &session, "SELECT Id FROM Account", &QueryOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            QueryError::Pagination {
                source: PageFailure::Api(ApiError::Transport(_)),
                ..
            }
        ));
        assert!(err.partial_records().is_empty());
    }

    #[tokio::test]
    async fn test_field_expansion_rewrites_query() {
        let transport = bootstrapped_transport()
            .respond(
                DESCRIBE,
                200,
                json!({"fields": [{"name": "Id"}, {"name": "Name"}]}),
            )
            .respond(QUERY, 200, json!({"done": true, "records": []}));
        let session = bootstrap(&transport, credentials()).await.unwrap();

        execute_query(
            &transport,
            &session,
            "FROM Account WHERE Id=1",
            &QueryOptions::new().expand_fields(true),
        )
        .await
        .unwrap();

        let calls = transport.calls();
        let query_call = calls.last().unwrap();
        assert_eq!(query_call.path, QUERY);
        assert_eq!(
            query_call.params,
            vec![(
                "q".to_string(),
                "SELECT Id,Name FROM Account WHERE Id=1".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_field_expansion_multiline_query() {
        let transport = bootstrapped_transport()
            .respond(DESCRIBE, 200, json!({"fields": [{"name": "Id"}]}))
            .respond(QUERY, 200, json!({"done": true, "records": []}));
        let session = bootstrap(&transport, credentials()).await.unwrap();

        execute_query(
            &transport,
            &session,
            "FROM\n  Account\nLIMIT 10",
            &QueryOptions::new().expand_fields(true),
        )
        .await
        .unwrap();

        let calls = transport.calls();
        assert_eq!(
            calls.last().unwrap().params,
            vec![("q".to_string(), "SELECT Id FROM\n  Account\nLIMIT 10".to_string())]
        );
    }

    #[tokio::test]
    async fn test_field_expansion_without_table() {
        let transport = bootstrapped_transport();
        let session = bootstrap(&transport, credentials()).await.unwrap();
        let calls_before = transport.calls().len();

        let err = execute_query(
            &transport,
            &session,
            "from Account",
            &QueryOptions::new().expand_fields(true),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, QueryError::MissingTable(_)));
        assert_eq!(transport.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_field_expansion_metadata_failure() {
        let transport = bootstrapped_transport().respond(DESCRIBE, 404, json!([]));
        let session = bootstrap(&transport, credentials()).await.unwrap();

        let err = execute_query(
            &transport,
            &session,
            "FROM Account",
            &QueryOptions::new().expand_fields(true),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, QueryError::Expansion(_)));
        assert!(!transport.paths().contains(&QUERY.to_string()));
    }

    #[tokio::test]
    async fn test_sink_confirmation_references_path() {
        let transport = two_pages();
        let session = bootstrap(&transport, credentials()).await.unwrap();
        let sink = MemorySink::default();

        let output = execute_query_with_sink(
            &transport,
            &session,
            "SELECT Id FROM Account",
            &QueryOptions::new().fetch_all_pages(true).sink("exports/accounts.json"),
            &sink,
        )
        .await
        .unwrap();

        assert_eq!(
            output,
            QueryOutput::Persisted {
                path: PathBuf::from("exports/accounts.json"),
                record_count: 3,
            }
        );
        assert!(output.to_string().contains("exports/accounts.json"));

        let written = sink.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        let stored: Value = serde_json::from_str(&written[0].1).unwrap();
        assert_eq!(stored, json!([{"Id": "A"}, {"Id": "B"}, {"Id": "C"}]));
    }

    /// A failed write reports only the write error: the fully fetched
    /// records are not attached, unlike a pagination failure.
    #[tokio::test]
    async fn test_sink_write_failure_carries_no_records() {
        let transport = two_pages();
        let session = bootstrap(&transport, credentials()).await.unwrap();
        let sink = MemorySink {
            fail: true,
            ..MemorySink::default()
        };

        let err = execute_query_with_sink(
            &transport,
            &session,
            "SELECT Id FROM Account",
            &QueryOptions::new().fetch_all_pages(true).sink("exports/accounts.json"),
            &sink,
        )
        .await
        .unwrap_err();

        match &err {
            QueryError::Sink(SinkError::Write { path, .. }) => {
                assert_eq!(path, Path::new("exports/accounts.json"))
            }
            other => panic!("expected sink write error, got {:?}", other),
        }
        assert!(err.partial_records().is_empty());
    }

    #[tokio::test]
    async fn test_sink_not_written_when_pagination_fails() {
        let transport = bootstrapped_transport()
            .respond(
                QUERY,
                200,
                json!({"done": false, "records": [{"Id": "A"}], "nextRecordsUrl": "p2"}),
            )
            .respond("p2", 200, json!({"done": true}));
        let session = bootstrap(&transport, credentials()).await.unwrap();
        let sink = MemorySink::default();

        let err = execute_query_with_sink(
            &transport,
            &session,
            "SELECT Id FROM Account",
            &QueryOptions::new().fetch_all_pages(true).sink("out.json"),
            &sink,
        )
        .await
        .unwrap_err();

        assert_eq!(err.partial_records(), &[json!({"Id": "A"})]);
        assert!(sink.written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_shared_across_concurrent_queries() {
        let transport = bootstrapped_transport()
            .respond(QUERY, 200, json!({"done": true, "records": [{"Id": "A"}]}))
            .respond(QUERY, 200, json!({"done": true, "records": [{"Id": "B"}]}));
        let session = bootstrap(&transport, credentials()).await.unwrap();
        let options = QueryOptions::new();

        let (first, second) = tokio::join!(
            execute_query(&transport, &session, "SELECT Id FROM Account", &options),
            execute_query(&transport, &session, "SELECT Id FROM Account", &options),
        );

        let mut ids: Vec<Value> = first
            .unwrap()
            .records()
            .unwrap()
            .iter()
            .chain(second.as_ref().unwrap().records().unwrap())
            .map(|r| r["Id"].clone())
            .collect();
        ids.sort_by_key(|v| v.to_string());
        assert_eq!(ids, vec![json!("A"), json!("B")]);
    }
}
