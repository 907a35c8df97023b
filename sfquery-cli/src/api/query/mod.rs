//! SOQL query execution
//!
//! Optional field expansion, the first fetch, optional pagination to
//! exhaustion and optional persistence to a sink, all in one sequential chain.

pub mod engine;
pub mod expand;
pub mod options;
pub mod pages;
pub mod sink;

pub use engine::{execute_query, execute_query_with_sink};
pub use expand::{expand_fields, find_table_name};
pub use options::{QueryOptions, QueryOutput};
pub use pages::{QueryPage, QueryPages};
pub use sink::{FileSink, Sink};
