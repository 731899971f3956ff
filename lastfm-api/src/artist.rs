//! Artist API.
//!
//! All reads accept an [`ArtistRef`], so the by-name and by-MBID variants of
//! each API method share one entry point. Writes address the artist by name
//! only, as the service requires.
//!
//! `artist.getCorrection` response:
//! ```json
//! {
//!   "corrections": {
//!     "correction": { "artist": { "name": "Guns N' Roses", "mbid": "..." } }
//!   }
//! }
//! ```

use crate::auth::Session;
use crate::client::LastfmClient;
use crate::error::Result;
use crate::params::ParamMap;
use crate::transport::{HttpVerb, Transport};
use crate::types::{ArtistRef, Page, tag_list};
use serde_json::Value;

impl<T: Transport> LastfmClient<T> {
    /// Tag an artist with up to 10 user supplied tags. Empty `tags` is a no-op.
    pub fn artist_add_tags<S: AsRef<str>>(
        &self,
        session: &Session,
        artist: &str,
        tags: &[S],
    ) -> Result<()> {
        let Some(tags) = tag_list(tags)? else {
            return Ok(());
        };
        let params = ParamMap::new().with("artist", artist).with("tags", tags);
        self.signed_call("artist.addTags", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Check whether the supplied artist has a correction to a canonical artist.
    pub fn artist_correction(&self, artist: &str) -> Result<Value> {
        self.unsigned_call("artist.getCorrection", ParamMap::new().with("artist", artist))
    }

    /// Get the metadata for an artist, including the biography.
    pub fn artist_info(
        &self,
        artist: &ArtistRef,
        autocorrect: bool,
        username: Option<&str>,
        lang: Option<&str>,
    ) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("autocorrect", autocorrect)
            .with("username", username)
            .with("lang", lang);
        artist.apply(&mut params);
        self.unsigned_call("artist.getInfo", params)
    }

    /// Get artists similar to this one. The service default `limit` is 50.
    pub fn artist_similar(
        &self,
        artist: &ArtistRef,
        limit: u32,
        autocorrect: bool,
    ) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("limit", limit)
            .with("autocorrect", autocorrect);
        artist.apply(&mut params);
        self.unsigned_call("artist.getSimilar", params)
    }

    /// Get the tags applied by an individual user to an artist.
    pub fn artist_tags(&self, artist: &ArtistRef, user: &str, autocorrect: bool) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("user", user)
            .with("autocorrect", autocorrect);
        artist.apply(&mut params);
        self.unsigned_call("artist.getTags", params)
    }

    /// Get the top albums for an artist, ordered by popularity.
    ///
    /// Pass [`Page::new(10, 1)`](Page::new) for the service defaults.
    pub fn artist_top_albums(
        &self,
        artist: &ArtistRef,
        page: Page,
        autocorrect: bool,
    ) -> Result<Value> {
        let mut params = ParamMap::new().with("autocorrect", autocorrect);
        page.apply(&mut params);
        artist.apply(&mut params);
        self.unsigned_call("artist.getTopAlbums", params)
    }

    /// Get the top tags for an artist, ordered by popularity.
    pub fn artist_top_tags(&self, artist: &ArtistRef, autocorrect: bool) -> Result<Value> {
        let mut params = ParamMap::new().with("autocorrect", autocorrect);
        artist.apply(&mut params);
        self.unsigned_call("artist.getTopTags", params)
    }

    /// Get the top tracks by an artist, ordered by popularity.
    pub fn artist_top_tracks(
        &self,
        artist: &ArtistRef,
        page: Page,
        autocorrect: bool,
    ) -> Result<Value> {
        let mut params = ParamMap::new().with("autocorrect", autocorrect);
        page.apply(&mut params);
        artist.apply(&mut params);
        self.unsigned_call("artist.getTopTracks", params)
    }

    /// Remove a user's tag from an artist.
    pub fn artist_remove_tag(&self, session: &Session, artist: &str, tag: &str) -> Result<()> {
        let params = ParamMap::new().with("artist", artist).with("tag", tag);
        self.signed_call("artist.removeTag", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Search for an artist by name. Matches are sorted by relevance.
    pub fn artist_search(&self, artist: &str, page: Page) -> Result<Value> {
        let mut params = ParamMap::new().with("artist", artist);
        page.apply(&mut params);
        self.unsigned_call("artist.search", params)
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Session;
    use crate::client::LastfmClient;
    use crate::config::ApiConfig;
    use crate::error::LastfmError;
    use crate::transport::HttpVerb;
    use crate::transport::testing::FakeTransport;
    use crate::types::{ArtistRef, Page};

    fn client_replying(status: u16, body: &str) -> LastfmClient<FakeTransport> {
        LastfmClient::with_transport(
            ApiConfig::new("key", "secret"),
            FakeTransport::replying(status, body),
        )
    }

    fn client() -> LastfmClient<FakeTransport> {
        client_replying(200, "{}")
    }

    #[test]
    fn add_ten_tags_is_allowed() {
        let client = client();
        let tags: Vec<String> = (0..10).map(|i| format!("t{i}")).collect();
        client
            .artist_add_tags(&Session::new("rj", "sk", 0), "Cher", &tags)
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.verb, HttpVerb::Post);
        assert_eq!(req.params["tags"], "t0,t1,t2,t3,t4,t5,t6,t7,t8,t9");
    }

    #[test]
    fn top_albums_by_mbid() {
        let client = client();
        client
            .artist_top_albums(&ArtistRef::mbid("bfcc6d75"), Page::new(10, 2), true)
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.params["method"], "artist.getTopAlbums");
        assert_eq!(req.params["mbid"], "bfcc6d75");
        assert_eq!(req.params["limit"], "10");
        assert_eq!(req.params["page"], "2");
        assert_eq!(req.params["autocorrect"], "1");
    }

    #[test]
    fn similar_sends_limit() {
        let client = client();
        client
            .artist_similar(&ArtistRef::name("Cher"), 50, false)
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.params["artist"], "Cher");
        assert_eq!(req.params["limit"], "50");
    }

    #[test]
    fn unknown_artist_is_not_found() {
        let client = client_replying(
            200,
            r#"{"error":6,"message":"The artist you supplied could not be found"}"#,
        );
        let err = client
            .artist_info(&ArtistRef::name("Nobody At All"), false, None, None)
            .unwrap_err();
        assert!(err.is_not_found());
        match err {
            LastfmError::NotFound { lookup, .. } => assert_eq!(lookup, "artist=Nobody At All"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_is_api_error() {
        let client = client_replying(
            429,
            r#"{"error":29,"message":"Rate Limit Exceeded"}"#,
        );
        let err = client.artist_correction("Guns and Roses").unwrap_err();
        assert!(matches!(err, LastfmError::Api { code: 29, .. }));
    }

    #[test]
    fn remove_tag_is_signed_post() {
        let client = client();
        client
            .artist_remove_tag(&Session::new("rj", "sk", 0), "Cher", "pop")
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.verb, HttpVerb::Post);
        assert_eq!(req.params["method"], "artist.removeTag");
        assert!(req.params.contains_key("api_sig"));
    }
}
