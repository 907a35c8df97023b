//! API version discovery

use super::constants::VERSIONS_PATH;
use super::errors::ApiError;
use super::transport::{RequestContext, Transport, get_success};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One entry of the `services/data` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Numeric string such as "59.0"
    pub version: String,
    /// Data path for that version, e.g. "/services/data/v59.0"
    pub url: String,
    /// Release name ("Winter '24"), when the server sends it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl VersionEntry {
    pub fn new(version: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            url: url.into(),
            label: None,
        }
    }

    /// Integer part of the version string ("59.9" -> 59)
    pub fn major(&self) -> Option<u32> {
        let whole = self.version.split('.').next()?;
        whole.trim().parse().ok()
    }
}

/// List every API version the instance supports
pub async fn list_versions(
    transport: &dyn Transport,
    ctx: &RequestContext,
) -> Result<Vec<VersionEntry>, ApiError> {
    let body = get_success(transport, ctx, VERSIONS_PATH, &[]).await?;
    let entries: Vec<VersionEntry> = serde_json::from_value(body)
        .map_err(|e| ApiError::malformed(VERSIONS_PATH, e.to_string()))?;
    debug!("Server supports {} API versions", entries.len());
    Ok(entries)
}

/// Position of the highest version.
///
/// Versions compare by their integer part only, and a later entry replaces
/// the running maximum only when strictly greater: on a tie the first entry
/// seen wins. Entries whose version does not parse are skipped.
pub fn latest_index(entries: &[VersionEntry]) -> Option<usize> {
    let mut best: Option<(u32, usize)> = None;
    for (index, entry) in entries.iter().enumerate() {
        let Some(major) = entry.major() else {
            warn!("Skipping unparsable API version {:?}", entry.version);
            continue;
        };
        match best {
            Some((max, _)) if major <= max => {}
            _ => best = Some((major, index)),
        }
    }
    best.map(|(_, index)| index)
}

/// Data path of the highest version, see [`latest_index`]
pub fn pick_latest(entries: &[VersionEntry]) -> Option<&str> {
    latest_index(entries).map(|index| entries[index].url.as_str())
}
