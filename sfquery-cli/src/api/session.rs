//! Session bootstrap
//!
//! A [`Session`] bundles the resolved resource paths with a live access token.
//! It is only ever produced by [`bootstrap`], which runs an ordered sequence of
//! steps over an immutable state value. Each step hands back the advanced state
//! or stops the chain with an error, and a failed chain never yields a partial
//! session.

use super::auth::{AccessToken, Credentials, Secret, acquire_token};
use super::constants::{DESCRIBE_SEGMENT, QUERY_SEGMENT, SOBJECTS_SEGMENT};
use super::errors::BootstrapError;
use super::metadata::fetch_object_list;
use super::transport::{RequestContext, Transport, join_url};
use super::versions::{list_versions, pick_latest};
use log::{debug, info};

/// Authenticated, fully resolved view of one Salesforce instance.
///
/// Immutable once built; share it freely between concurrent queries.
#[derive(Debug, Clone)]
pub struct Session {
    credentials: Credentials,
    token: AccessToken,
    data_path: String,
    objects_path: String,
    query_path: String,
    query_size_limit: u64,
}

impl Session {
    pub fn base_uri(&self) -> &str {
        &self.credentials.base_uri
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    pub fn client_secret(&self) -> &Secret {
        &self.credentials.client_secret
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.token
    }

    /// Version-specific data path, e.g. "/services/data/v59.0"
    pub fn data_path(&self) -> &str {
        &self.data_path
    }

    pub fn objects_path(&self) -> &str {
        &self.objects_path
    }

    pub fn query_path(&self) -> &str {
        &self.query_path
    }

    /// Tenant's maximum batch size as reported by the object listing
    pub fn query_size_limit(&self) -> u64 {
        self.query_size_limit
    }

    /// Path of the describe resource for one object
    pub fn describe_path(&self, object_name: &str) -> String {
        join_url(&join_url(&self.objects_path, object_name), DESCRIBE_SEGMENT)
    }

    /// Base URI plus bearer token, for every authenticated call
    pub fn request_context(&self) -> RequestContext {
        RequestContext::authenticated(&self.credentials.base_uri, self.token.token())
    }
}

/// Snapshot threaded through the bootstrap steps. Every field after
/// `credentials` is filled by exactly one step, in order.
#[derive(Debug, Clone)]
struct BootstrapState {
    credentials: Credentials,
    token: Option<AccessToken>,
    context: Option<RequestContext>,
    data_path: Option<String>,
    paths: Option<ResourcePaths>,
    query_size_limit: Option<u64>,
}

#[derive(Debug, Clone)]
struct ResourcePaths {
    objects: String,
    query: String,
}

impl BootstrapState {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token: None,
            context: None,
            data_path: None,
            paths: None,
            query_size_limit: None,
        }
    }

    fn context(&self) -> &RequestContext {
        match &self.context {
            Some(ctx) => ctx,
            None => unreachable!("bootstrap step ran before the request context was built"),
        }
    }

    fn into_session(self) -> Session {
        match (self.token, self.data_path, self.paths, self.query_size_limit) {
            (Some(token), Some(data_path), Some(paths), Some(query_size_limit)) => Session {
                credentials: self.credentials,
                token,
                data_path,
                objects_path: paths.objects,
                query_path: paths.query,
                query_size_limit,
            },
            _ => unreachable!("bootstrap finished with a step missing"),
        }
    }
}

/// Build a [`Session`]: token, request context, latest data path, derived
/// resource paths, batch size limit. Stops at the first failing step.
pub async fn bootstrap(
    transport: &dyn Transport,
    credentials: Credentials,
) -> Result<Session, BootstrapError> {
    let state = BootstrapState::new(credentials);
    let state = authenticate(transport, state).await?;
    let state = build_request_context(state);
    let state = resolve_data_path(transport, state).await?;
    let state = derive_resource_paths(state);
    let state = read_query_size_limit(transport, state).await?;

    let session = state.into_session();
    info!(
        "Session ready for {} (data path {}, batch limit {})",
        session.base_uri(),
        session.data_path(),
        session.query_size_limit()
    );
    Ok(session)
}

async fn authenticate(
    transport: &dyn Transport,
    state: BootstrapState,
) -> Result<BootstrapState, BootstrapError> {
    let token = acquire_token(transport, &state.credentials).await?;
    Ok(BootstrapState {
        token: Some(token),
        ..state
    })
}

fn build_request_context(state: BootstrapState) -> BootstrapState {
    let context = state
        .token
        .as_ref()
        .map(|token| RequestContext::authenticated(&state.credentials.base_uri, token.token()));
    BootstrapState { context, ..state }
}

async fn resolve_data_path(
    transport: &dyn Transport,
    state: BootstrapState,
) -> Result<BootstrapState, BootstrapError> {
    let versions = list_versions(transport, state.context())
        .await
        .map_err(BootstrapError::Versions)?;
    let data_path = pick_latest(&versions)
        .ok_or(BootstrapError::NoVersions)?
        .to_string();
    debug!("Selected data path {}", data_path);
    Ok(BootstrapState {
        data_path: Some(data_path),
        ..state
    })
}

fn derive_resource_paths(state: BootstrapState) -> BootstrapState {
    let paths = state.data_path.as_deref().map(|data_path| ResourcePaths {
        objects: join_url(data_path, SOBJECTS_SEGMENT),
        query: join_url(data_path, QUERY_SEGMENT),
    });
    BootstrapState { paths, ..state }
}

async fn read_query_size_limit(
    transport: &dyn Transport,
    state: BootstrapState,
) -> Result<BootstrapState, BootstrapError> {
    let objects_path = match &state.paths {
        Some(paths) => paths.objects.clone(),
        None => unreachable!("object listing requested before resource paths were derived"),
    };
    let listing = fetch_object_list(transport, state.context(), &objects_path)
        .await
        .map_err(BootstrapError::Objects)?;
    Ok(BootstrapState {
        query_size_limit: Some(listing.max_batch_size),
        ..state
    })
}
