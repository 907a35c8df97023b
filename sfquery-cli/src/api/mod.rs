//! Salesforce REST API Module
//!
//! Session bootstrap (token, version discovery, resource paths) and the
//! paginated query engine, layered over a pluggable [`Transport`].

pub mod auth;
pub mod constants;
pub mod errors;
pub mod metadata;
pub mod query;
pub mod session;
pub mod transport;
pub mod versions;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AccessToken, Credentials, Secret, acquire_token};
pub use errors::{
    ApiError, AuthError, BootstrapError, PageFailure, QueryError, SinkError, TransportError,
};
pub use metadata::{
    FieldDescription, ObjectDescription, ObjectList, describe, get_field_names, list_objects,
};
pub use query::{
    FileSink, QueryOptions, QueryOutput, QueryPage, QueryPages, Sink, execute_query,
    execute_query_with_sink, expand_fields, find_table_name,
};
pub use session::{Session, bootstrap};
pub use transport::{ApiResponse, RequestContext, ReqwestTransport, Transport, join_url};
pub use versions::{VersionEntry, latest_index, list_versions, pick_latest};
