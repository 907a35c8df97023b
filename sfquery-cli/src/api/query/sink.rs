//! Persistent destinations for query results

use super::options::QueryOutput;
use crate::api::errors::SinkError;
use async_trait::async_trait;
use log::info;
use serde_json::Value;
use std::path::Path;

/// Somewhere a serialized result set can be written
#[async_trait]
pub trait Sink: Send + Sync {
    async fn write(&self, path: &Path, contents: &str) -> std::io::Result<()>;
}

/// Writes to the local filesystem, replacing any existing file
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

#[async_trait]
impl Sink for FileSink {
    async fn write(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        tokio::fs::write(path, contents).await
    }
}

/// Serialize every record as a pretty JSON array and hand it to the sink
pub(crate) async fn persist(
    sink: &dyn Sink,
    path: &Path,
    records: &[Value],
) -> Result<QueryOutput, SinkError> {
    let contents = serde_json::to_string_pretty(records)?;
    sink.write(path, &contents)
        .await
        .map_err(|source| SinkError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(QueryOutput::Persisted {
        path: path.to_path_buf(),
        record_count: records.len(),
    })
}
