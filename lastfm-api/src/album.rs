//! Album API.
//!
//! | Method                               | API method          | Call     |
//! |--------------------------------------|---------------------|----------|
//! | [`LastfmClient::album_add_tags`]     | `album.addTags`     | signed   |
//! | [`LastfmClient::album_info`]         | `album.getInfo`     | unsigned |
//! | [`LastfmClient::album_tags`]         | `album.getTags`     | unsigned |
//! | [`LastfmClient::album_top_tags`]     | `album.getTopTags`  | unsigned |
//! | [`LastfmClient::album_remove_tag`]   | `album.removeTag`   | signed   |
//! | [`LastfmClient::album_search`]       | `album.search`      | unsigned |
//!
//! `album.getInfo` response:
//! ```json
//! {
//!   "album": {
//!     "name": "Believe", "artist": "Cher", "mbid": "...",
//!     "tracks": { "track": [ { "name": "Believe", "duration": 239 } ] },
//!     "tags": { "tag": [ { "name": "pop" } ] }
//!   }
//! }
//! ```

use crate::auth::Session;
use crate::client::LastfmClient;
use crate::error::Result;
use crate::params::ParamMap;
use crate::transport::{HttpVerb, Transport};
use crate::types::{AlbumRef, Page, tag_list};
use serde_json::Value;

impl<T: Transport> LastfmClient<T> {
    /// Tag an album with up to 10 user supplied tags.
    ///
    /// An empty `tags` slice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`LastfmError::TooMany`](crate::LastfmError::TooMany) — more than
    ///   10 tags; nothing is sent
    pub fn album_add_tags<S: AsRef<str>>(
        &self,
        session: &Session,
        artist: &str,
        album: &str,
        tags: &[S],
    ) -> Result<()> {
        let Some(tags) = tag_list(tags)? else {
            return Ok(());
        };
        let params = ParamMap::new()
            .with("artist", artist)
            .with("album", album)
            .with("tags", tags);
        self.signed_call("album.addTags", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Get the metadata and tracklist for an album.
    ///
    /// With `username`, the response includes that user's play count;
    /// `lang` selects the language of the biography.
    pub fn album_info(
        &self,
        album: &AlbumRef,
        autocorrect: bool,
        username: Option<&str>,
        lang: Option<&str>,
    ) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("autocorrect", autocorrect)
            .with("username", username)
            .with("lang", lang);
        album.apply(&mut params);
        self.unsigned_call("album.getInfo", params)
    }

    /// Get the tags applied by an individual user to an album.
    pub fn album_tags(&self, album: &AlbumRef, user: &str, autocorrect: bool) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("user", user)
            .with("autocorrect", autocorrect);
        album.apply(&mut params);
        self.unsigned_call("album.getTags", params)
    }

    /// Get the top tags applied to an album, ordered by popularity.
    pub fn album_top_tags(&self, album: &AlbumRef, autocorrect: bool) -> Result<Value> {
        let mut params = ParamMap::new().with("autocorrect", autocorrect);
        album.apply(&mut params);
        self.unsigned_call("album.getTopTags", params)
    }

    /// Remove a user's tag from an album.
    pub fn album_remove_tag(
        &self,
        session: &Session,
        artist: &str,
        album: &str,
        tag: &str,
    ) -> Result<()> {
        let params = ParamMap::new()
            .with("artist", artist)
            .with("album", album)
            .with("tag", tag);
        self.signed_call("album.removeTag", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Search for an album by name. Matches are sorted by relevance.
    pub fn album_search(&self, album: &str, page: Page) -> Result<Value> {
        let mut params = ParamMap::new().with("album", album);
        page.apply(&mut params);
        self.unsigned_call("album.search", params)
    }
}
