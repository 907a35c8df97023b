//! Wire-level constants for the Salesforce REST API

/// OAuth2 token endpoint, relative to the instance base URI
pub const TOKEN_PATH: &str = "services/oauth2/token";

/// Lists every API version the instance supports
pub const VERSIONS_PATH: &str = "services/data";

/// Sub-resource of the data path holding object listings and describes
pub const SOBJECTS_SEGMENT: &str = "sobjects";

/// Sub-resource of the data path executing SOQL
pub const QUERY_SEGMENT: &str = "query";

/// Sub-resource of an object path returning its field metadata
pub const DESCRIBE_SEGMENT: &str = "describe";

/// Query string parameter carrying the SOQL text
pub const QUERY_PARAM: &str = "q";

pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

// Response body field names
pub const FIELD_ACCESS_TOKEN: &str = "access_token";
pub const FIELD_ISSUED_AT: &str = "issued_at";
pub const FIELD_DONE: &str = "done";
pub const FIELD_RECORDS: &str = "records";
pub const FIELD_NEXT_RECORDS_URL: &str = "nextRecordsUrl";
pub const FIELD_TOTAL_SIZE: &str = "totalSize";
pub const FIELD_SOBJECTS: &str = "sobjects";
pub const FIELD_MAX_BATCH_SIZE: &str = "maxBatchSize";
