//! Result pages and the lazy page pull
//!
//! Each page's cursor is only known once the previous page has arrived, so
//! pages are fetched strictly one at a time. [`QueryPages`] holds nothing but
//! the next cursor, which keeps memory flat however many pages a query has.

use crate::api::constants::{
    FIELD_DONE, FIELD_NEXT_RECORDS_URL, FIELD_RECORDS, FIELD_TOTAL_SIZE, QUERY_PARAM,
};
use crate::api::errors::PageFailure;
use crate::api::session::Session;
use crate::api::transport::{RequestContext, Transport, get_success};
use futures::Stream;
use log::debug;
use serde_json::Value;

/// One page of query results
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub records: Vec<Value>,
    pub done: bool,
    /// Server-supplied relative reference to the next page
    pub next_page_ref: Option<String>,
    /// Total matches across all pages, when reported
    pub total_size: Option<u64>,
}

impl QueryPage {
    /// Validate a page body: `done` and `records` are required.
    ///
    /// A missing `nextRecordsUrl` is only a problem once the next page is
    /// actually pulled, see [`QueryPages::next_page`].
    pub fn parse(body: Value) -> Result<Self, PageFailure> {
        let mut map = match body {
            Value::Object(map) => map,
            other => {
                return Err(PageFailure::Malformed(format!(
                    "expected an object, got {}",
                    other
                )));
            }
        };

        let done = map
            .get(FIELD_DONE)
            .and_then(Value::as_bool)
            .ok_or_else(|| PageFailure::Malformed(format!("missing boolean `{}`", FIELD_DONE)))?;
        let records = match map.remove(FIELD_RECORDS) {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(PageFailure::Malformed(format!(
                    "missing array `{}`",
                    FIELD_RECORDS
                )));
            }
        };
        let next_page_ref = map
            .get(FIELD_NEXT_RECORDS_URL)
            .and_then(Value::as_str)
            .map(str::to_string);
        let total_size = map.get(FIELD_TOTAL_SIZE).and_then(Value::as_u64);

        Ok(Self {
            records,
            done,
            next_page_ref,
            total_size,
        })
    }
}

enum Cursor {
    First(String),
    Next(String),
    /// Previous page was not done but gave no next reference
    Dangling,
    Finished,
}

/// Pull-based sequence of result pages for one query.
///
/// The first pull GETs the query path with `q=<query>`; later pulls GET the
/// previous page's `nextRecordsUrl` with no extra parameter. The sequence
/// ends after a page reports `done` or after the first failure. Pulling past
/// a page that is not done and has no `nextRecordsUrl` yields a malformed
/// page failure.
pub struct QueryPages<'a> {
    transport: &'a dyn Transport,
    ctx: RequestContext,
    query_path: String,
    cursor: Cursor,
    fetched: usize,
}

impl<'a> QueryPages<'a> {
    pub fn new(transport: &'a dyn Transport, session: &Session, query: impl Into<String>) -> Self {
        Self {
            transport,
            ctx: session.request_context(),
            query_path: session.query_path().to_string(),
            cursor: Cursor::First(query.into()),
            fetched: 0,
        }
    }

    /// Number of pages fetched successfully so far
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    /// Fetch the next page, or `None` once the sequence is over
    pub async fn next_page(&mut self) -> Option<Result<QueryPage, PageFailure>> {
        let body = match std::mem::replace(&mut self.cursor, Cursor::Finished) {
            Cursor::Finished => return None,
            Cursor::Dangling => {
                return Some(Err(PageFailure::Malformed(format!(
                    "page {} is not done but has no `{}`",
                    self.fetched, FIELD_NEXT_RECORDS_URL
                ))));
            }
            Cursor::First(query) => {
                get_success(
                    self.transport,
                    &self.ctx,
                    &self.query_path,
                    &[(QUERY_PARAM, query.as_str())],
                )
                .await
            }
            Cursor::Next(next_ref) => get_success(self.transport, &self.ctx, &next_ref, &[]).await,
        };

        let page = match body {
            Ok(body) => QueryPage::parse(body),
            Err(e) => Err(PageFailure::Api(e)),
        };

        if let Ok(page) = &page {
            self.fetched += 1;
            debug!(
                "Page {}: {} records (total size {:?}, done {})",
                self.fetched,
                page.records.len(),
                page.total_size,
                page.done
            );
            self.cursor = match (page.done, &page.next_page_ref) {
                (true, _) => Cursor::Finished,
                (false, Some(next_ref)) => Cursor::Next(next_ref.clone()),
                (false, None) => Cursor::Dangling,
            };
        }
        Some(page)
    }

    /// The same sequence as an async stream
    pub fn into_stream(self) -> impl Stream<Item = Result<QueryPage, PageFailure>> + 'a {
        futures::stream::unfold(self, |mut pages| async move {
            let item = pages.next_page().await?;
            Some((item, pages))
        })
    }
}
