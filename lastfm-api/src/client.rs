//! Request dispatch for the Last.fm API 2.0.
//!
//! Every service method ends up in one of two calls:
//!
//! - [`LastfmClient::unsigned_call`] — public reads, `GET` with `api_key`
//! - [`LastfmClient::signed_call`] — writes and user-scoped reads, signed
//!   with the shared secret and the user's session key (see
//!   [`signing`](crate::signing))
//!
//! Both add `format=json` and send everything to the single API endpoint.
//!
//! # Response format
//!
//! Successful responses carry an endpoint-specific payload:
//!
//! ```json
//! { "artist": { "name": "Cher", ... } }
//! ```
//!
//! Failures carry an error object, usually with HTTP 200 or 4xx:
//!
//! ```json
//! { "error": 6, "message": "The artist you supplied could not be found" }
//! ```
//!
//! The body is inspected before the HTTP status. Code 6 maps to
//! [`LastfmError::NotFound`], every other code to [`LastfmError::Api`].

use crate::auth::Session;
use crate::config::ApiConfig;
use crate::error::{LastfmError, Result};
use crate::params::ParamMap;
use crate::signing::sign;
use crate::transport::{HttpTransport, HttpVerb, Transport};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Error code the service uses for unknown artists, albums, tracks and tags.
pub const NOT_FOUND_CODE: i64 = 6;

/// Fields that identify the looked-up entity in a [`LastfmError::NotFound`].
const LOOKUP_FIELDS: [&str; 7] = ["mbid", "artist", "album", "track", "tag", "user", "username"];

/// Blocking client for the Last.fm API.
///
/// Holds the [`ApiConfig`] and a [`Transport`]. It has no mutable state, so a
/// single instance can be shared between threads. API methods are
/// implemented in separate modules (`album`, `artist`, `tag`, `track`) as
/// `impl LastfmClient` blocks.
pub struct LastfmClient<T = HttpTransport> {
    config: ApiConfig,
    transport: T,
}

impl LastfmClient<HttpTransport> {
    /// Create a client backed by [`HttpTransport`].
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> LastfmClient<T> {
    /// Create a client with an explicit [`Transport`] (useful for testing
    /// or for adding retries/caching around the HTTP layer).
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a public `GET` call.
    ///
    /// Returns the JSON payload, or the classified error from the envelope.
    pub fn unsigned_call(&self, method: &str, params: ParamMap) -> Result<Value> {
        let lookup = lookup_key(&params);
        let mut wire = params.into_wire();
        wire.insert("method".to_owned(), method.to_owned());
        wire.insert("api_key".to_owned(), self.config.api_key.clone());
        wire.insert("format".to_owned(), "json".to_owned());

        debug!(method, verb = "GET", signed = false, "dispatching request");
        self.dispatch(method, HttpVerb::Get, wire, &lookup)
    }

    /// Send a signed call on behalf of `session`.
    ///
    /// # Errors
    ///
    /// - [`LastfmError::NotLoggedIn`] — `session` is `None` or has an empty
    ///   key; nothing is sent
    /// - [`LastfmError::NotFound`] / [`LastfmError::Api`] — from the envelope
    /// - [`LastfmError::Http`] — network failure
    pub fn signed_call(
        &self,
        method: &str,
        params: ParamMap,
        session: Option<&Session>,
        verb: HttpVerb,
    ) -> Result<Value> {
        let session = session
            .filter(|s| s.is_logged_in())
            .ok_or(LastfmError::NotLoggedIn)?;
        let lookup = lookup_key(&params);
        let signed = sign(
            method,
            &params,
            &self.config.api_key,
            &self.config.api_secret,
            Some(session.key()),
        );
        let mut wire = signed.params;
        wire.insert("format".to_owned(), "json".to_owned());

        debug!(
            method,
            verb = verb.as_str(),
            signed = true,
            user = session.name(),
            "dispatching request"
        );
        self.dispatch(method, verb, wire, &lookup)
    }

    fn dispatch(
        &self,
        method: &str,
        verb: HttpVerb,
        wire: BTreeMap<String, String>,
        lookup: &str,
    ) -> Result<Value> {
        let pairs: Vec<(String, String)> = wire.into_iter().collect();
        let resp = self
            .transport
            .request(verb, &self.config.base_url, &pairs, self.config.timeout)?;
        parse_envelope(method, lookup, resp.status, &resp.body)
    }
}

/// Classify a raw response.
///
/// An embedded `error` object wins over the HTTP status. A non-2xx status
/// without one becomes [`LastfmError::Status`]; an unparseable 2xx body
/// becomes [`LastfmError::Json`]. An empty 2xx body is `Value::Null`.
pub fn parse_envelope(method: &str, lookup: &str, status: u16, body: &str) -> Result<Value> {
    let success = (200..300).contains(&status);
    if success && body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) if !success => {
            return Err(LastfmError::Status {
                status,
                body: body.to_owned(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(code) = json.get("error").and_then(Value::as_i64) {
        let message = json
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();
        debug!(method, code, %message, "service returned error");
        if code == NOT_FOUND_CODE {
            return Err(LastfmError::NotFound {
                method: method.to_owned(),
                lookup: lookup.to_owned(),
                message,
            });
        }
        return Err(LastfmError::Api { code, message });
    }

    if !success {
        return Err(LastfmError::Status {
            status,
            body: body.to_owned(),
        });
    }

    Ok(json)
}

/// `artist=Cher, album=Believe` from whichever identifying fields are set.
fn lookup_key(params: &ParamMap) -> String {
    params
        .present()
        .filter(|(k, _)| LOOKUP_FIELDS.contains(k))
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}
