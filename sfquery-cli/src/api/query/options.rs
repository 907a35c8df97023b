//! Query options and results

use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// How one query execution behaves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Generate the SELECT clause from the table's field metadata
    pub expand_fields: bool,
    /// Follow `nextRecordsUrl` until the server reports `done`
    pub fetch_all_pages: bool,
    /// Persist the records here instead of returning them
    pub sink: Option<PathBuf>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand_fields(mut self, expand: bool) -> Self {
        self.expand_fields = expand;
        self
    }

    pub fn fetch_all_pages(mut self, all: bool) -> Self {
        self.fetch_all_pages = all;
        self
    }

    pub fn sink(mut self, path: impl Into<PathBuf>) -> Self {
        self.sink = Some(path.into());
        self
    }
}

/// Successful query result
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// Records inline, in page-arrival order
    Records(Vec<Value>),
    /// Records were written to a sink
    Persisted { path: PathBuf, record_count: usize },
}

impl QueryOutput {
    pub fn records(&self) -> Option<&[Value]> {
        match self {
            Self::Records(records) => Some(records),
            Self::Persisted { .. } => None,
        }
    }

    pub fn sink_path(&self) -> Option<&Path> {
        match self {
            Self::Records(_) => None,
            Self::Persisted { path, .. } => Some(path),
        }
    }
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Records(records) => write!(f, "{} records", records.len()),
            Self::Persisted { path, record_count } => {
                write!(f, "Wrote {} records to {}", record_count, path.display())
            }
        }
    }
}
