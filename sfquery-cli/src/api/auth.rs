//! OAuth2 client-credentials token acquisition

use super::constants::{
    FIELD_ACCESS_TOKEN, FIELD_ISSUED_AT, GRANT_TYPE_CLIENT_CREDENTIALS, TOKEN_PATH,
};
use super::errors::AuthError;
use super::transport::{RequestContext, Transport};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// A string that never shows up in `Debug` output
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Connected-app credentials for one Salesforce instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Instance URL, e.g. "https://acme.my.salesforce.com"
    pub base_uri: String,
    pub client_id: String,
    pub client_secret: Secret,
}

impl Credentials {
    pub fn new(
        base_uri: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_uri: base_uri.into(),
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret),
        }
    }
}

/// Opaque bearer token plus the server-reported issue time.
/// Replaced wholesale, never refreshed in place.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    issued_at: String,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, issued_at: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            issued_at: issued_at.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Raw `issued_at` string (epoch milliseconds on Salesforce)
    pub fn issued_at(&self) -> &str {
        &self.issued_at
    }

    /// `issued_at` as a timestamp, when it parses as epoch milliseconds
    pub fn issued_at_datetime(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.issued_at.parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Exchange client credentials for an access token.
///
/// One POST to the token endpoint, no retry. A 200 body must carry both
/// `access_token` and `issued_at` as strings.
pub async fn acquire_token(
    transport: &dyn Transport,
    credentials: &Credentials,
) -> Result<AccessToken, AuthError> {
    let ctx = RequestContext::anonymous(&credentials.base_uri);
    let form = [
        ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.expose()),
    ];

    debug!("Requesting access token from {}", ctx.url_for(TOKEN_PATH));
    let response = transport
        .post_form(&ctx, TOKEN_PATH, &form)
        .await
        .map_err(|e| AuthError::Request(e.into()))?;
    let body = response.into_success()?;

    let token = body.get(FIELD_ACCESS_TOKEN).and_then(|v| v.as_str());
    let issued_at = body.get(FIELD_ISSUED_AT).and_then(|v| v.as_str());
    match (token, issued_at) {
        (Some(token), Some(issued_at)) => {
            info!("Obtained access token for client {}", credentials.client_id);
            Ok(AccessToken::new(token, issued_at))
        }
        _ => Err(AuthError::InvalidTokenResponse),
    }
}
