//! Last.fm web service (API 2.0) client library.
//!
//! Provides the album, artist, tag and track endpoints as methods on
//! [`LastfmClient`]. Responses are returned as raw JSON payloads.
//!
//! # Authentication
//!
//! Public reads only need the application's API key. Writes (tagging,
//! loving, scrobbling) are signed with the API secret and a user
//! [`Session`], obtained from the service's auth flow and persisted to
//! `~/.config/lastfm/session.json`.
//!
//! ```no_run
//! use lastfm_api::{ApiConfig, LastfmClient, Session};
//! use lastfm_api::types::ArtistRef;
//!
//! let client = LastfmClient::new(ApiConfig::new("API_KEY", "API_SECRET")).unwrap();
//! let info = client.artist_info(&ArtistRef::name("Cher"), true, None, None).unwrap();
//! println!("{}", info["artist"]["name"]);
//!
//! let session = Session::new("rj", "SESSION_KEY", 0);
//! client.track_love(&session, "Cher", "Believe").unwrap();
//! ```
//!
//! # Errors
//!
//! [`LastfmError::kind`] separates local validation failures, missing
//! sessions, unknown entities and everything else:
//!
//! ```no_run
//! # use lastfm_api::{ApiConfig, ErrorKind, LastfmClient};
//! # use lastfm_api::types::ArtistRef;
//! # let client = LastfmClient::new(ApiConfig::new("k", "s")).unwrap();
//! match client.artist_info(&ArtistRef::name("Nobody"), false, None, None) {
//!     Ok(info) => println!("{info}"),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("no such artist"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), lastfm_api::LastfmError>(())
//! ```
//!
//! # Signing
//!
//! Signed calls carry an `api_sig` field: the MD5 of all parameters sorted
//! by name, concatenated as `name` + `value`, followed by the secret. See
//! [`signing`].

mod album;
mod artist;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod params;
pub mod signing;
mod tag;
mod track;
pub mod transport;
pub mod types;

pub use auth::Session;
pub use client::LastfmClient;
pub use config::ApiConfig;
pub use error::{ErrorKind, LastfmError, Result};
pub use params::{ParamMap, ParamValue};
pub use transport::{HttpTransport, HttpVerb, Transport};
