//! HTTP transport.
//!
//! The client never talks to `reqwest` directly; it goes through the
//! [`Transport`] trait so a different stack (or a recording fake in tests)
//! can be plugged in. Retries, proxies and the like belong in a custom
//! transport, not in the client.

use crate::error::Result;
use reqwest::blocking::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("lastfm-api-rs/", env!("CARGO_PKG_VERSION"));

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Raw response: status code and body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// A single blocking request/response exchange.
///
/// `params` go in the query string for [`HttpVerb::Get`] and in an
/// `application/x-www-form-urlencoded` body for [`HttpVerb::Post`].
pub trait Transport: Send + Sync {
    fn request(
        &self,
        verb: HttpVerb,
        url: &str,
        params: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<HttpResponse>;
}

/// Default [`Transport`] backed by [`reqwest::blocking::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http })
    }

    /// Wrap an already configured client (custom TLS, proxy, ...).
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    fn request(
        &self,
        verb: HttpVerb,
        url: &str,
        params: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<HttpResponse> {
        let mut req = match verb {
            HttpVerb::Get => self.http.get(url).query(params),
            HttpVerb::Post => self
                .http
                .post(url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(form_encode(params)),
        };
        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// `a=1&b=x%2Cy` form encoding.
pub fn form_encode(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fake transport shared by the client and service tests.

    use super::{HttpResponse, HttpVerb, Transport};
    use crate::error::Result;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub verb: HttpVerb,
        pub url: String,
        pub params: BTreeMap<String, String>,
        pub timeout: Option<Duration>,
    }

    /// Replies with a canned status/body and records every request.
    pub struct FakeTransport {
        status: u16,
        body: String,
        pub requests: Mutex<Vec<Recorded>>,
    }

    impl FakeTransport {
        pub fn replying(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_owned(),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn ok() -> Self {
            Self::replying(200, "{}")
        }

        pub fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last(&self) -> Recorded {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for FakeTransport {
        fn request(
            &self,
            verb: HttpVerb,
            url: &str,
            params: &[(String, String)],
            timeout: Option<Duration>,
        ) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(Recorded {
                verb,
                url: url.to_owned(),
                params: params.iter().cloned().collect(),
                timeout,
            });
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }
}
