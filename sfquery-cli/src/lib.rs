//! Salesforce REST API client library
//!
//! Bootstraps an authenticated [`api::Session`] and runs bulk SOQL queries
//! that may span many server-paginated result pages.

pub mod api;
pub mod config;
pub mod logging;

pub use api::{
    AccessToken, ApiError, AuthError, BootstrapError, Credentials, QueryError, QueryOptions,
    QueryOutput, Session, Transport,
};
