//! Track API: lookups, tagging, love/unlove, scrobbling and now-playing.
//!
//! # Scrobbling
//!
//! `track.scrobble` takes up to 10 entries per call. Each entry's fields are
//! sent with its batch position as suffix:
//!
//! ```text
//! artist[0]=Cher  track[0]=Believe  timestamp[0]=1700000000
//! artist[1]=...   track[1]=...      timestamp[1]=...   album[1]=...
//! ```
//!
//! Every entry is checked before anything is sent, so a bad batch never
//! results in a partial submission.

use crate::auth::Session;
use crate::client::LastfmClient;
use crate::error::{LastfmError, Result};
use crate::params::ParamMap;
use crate::transport::{HttpVerb, Transport};
use crate::types::{MAX_SCROBBLES, NowPlaying, Page, Scrobble, TrackRef, tag_list};
use serde_json::Value;

impl<T: Transport> LastfmClient<T> {
    /// Tag a track with up to 10 user supplied tags. Empty `tags` is a no-op.
    pub fn track_add_tags<S: AsRef<str>>(
        &self,
        session: &Session,
        artist: &str,
        track: &str,
        tags: &[S],
    ) -> Result<()> {
        let Some(tags) = tag_list(tags)? else {
            return Ok(());
        };
        let params = ParamMap::new()
            .with("artist", artist)
            .with("track", track)
            .with("tags", tags);
        self.signed_call("track.addTags", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Check whether the supplied track has a correction to a canonical track.
    pub fn track_correction(&self, artist: &str, track: &str) -> Result<Value> {
        let params = ParamMap::new().with("artist", artist).with("track", track);
        self.unsigned_call("track.getCorrection", params)
    }

    /// Get the metadata for a track. With `username`, includes that user's
    /// play count and loved status.
    pub fn track_info(
        &self,
        track: &TrackRef,
        username: Option<&str>,
        autocorrect: bool,
    ) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("autocorrect", autocorrect)
            .with("username", username);
        track.apply(&mut params);
        self.unsigned_call("track.getInfo", params)
    }

    /// Similar tracks, based on listening data. The service default `limit`
    /// here is 10.
    pub fn track_similar(&self, track: &TrackRef, limit: u32, autocorrect: bool) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("limit", limit)
            .with("autocorrect", autocorrect);
        track.apply(&mut params);
        self.unsigned_call("track.getSimilar", params)
    }

    /// Get the tags applied by an individual user to a track.
    pub fn track_tags(&self, track: &TrackRef, user: &str, autocorrect: bool) -> Result<Value> {
        let mut params = ParamMap::new()
            .with("user", user)
            .with("autocorrect", autocorrect);
        track.apply(&mut params);
        self.unsigned_call("track.getTags", params)
    }

    /// Top tags for a track, ordered by tag count.
    pub fn track_top_tags(&self, track: &TrackRef, autocorrect: bool) -> Result<Value> {
        let mut params = ParamMap::new().with("autocorrect", autocorrect);
        track.apply(&mut params);
        self.unsigned_call("track.getTopTags", params)
    }

    /// Love a track for the session's user.
    pub fn track_love(&self, session: &Session, artist: &str, track: &str) -> Result<()> {
        let params = ParamMap::new().with("artist", artist).with("track", track);
        self.signed_call("track.love", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Unlove a previously loved track.
    pub fn track_unlove(&self, session: &Session, artist: &str, track: &str) -> Result<()> {
        let params = ParamMap::new().with("artist", artist).with("track", track);
        self.signed_call("track.unlove", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Remove a user's tag from a track.
    pub fn track_remove_tag(
        &self,
        session: &Session,
        artist: &str,
        track: &str,
        tag: &str,
    ) -> Result<()> {
        let params = ParamMap::new()
            .with("artist", artist)
            .with("track", track)
            .with("tag", tag);
        self.signed_call("track.removeTag", params, Some(session), HttpVerb::Post)?;
        Ok(())
    }

    /// Submit a batch of up to 10 scrobbles in one request.
    ///
    /// Returns the service's acceptance report (`scrobbles.@attr.accepted`
    /// / `ignored`), or `Value::Null` for an empty batch, which is not sent.
    ///
    /// # Errors
    ///
    /// - [`LastfmError::TooMany`] if there are more than 10 entries
    /// - [`LastfmError::MissingField`] if an entry lacks `artist`, `track`
    ///   or `timestamp`; `index` is its batch position
    pub fn track_scrobble(&self, session: &Session, scrobbles: &[Scrobble]) -> Result<Value> {
        if scrobbles.is_empty() {
            return Ok(Value::Null);
        }
        if scrobbles.len() > MAX_SCROBBLES {
            return Err(LastfmError::TooMany {
                what: "scrobbles",
                max: MAX_SCROBBLES,
                got: scrobbles.len(),
            });
        }

        let mut params = ParamMap::new();
        for (index, entry) in scrobbles.iter().enumerate() {
            entry.apply(index, &mut params)?;
        }
        self.signed_call("track.scrobble", params, Some(session), HttpVerb::Post)
    }

    /// Search for a track by name. Matches are sorted by relevance.
    pub fn track_search(&self, track: &str, page: Page) -> Result<Value> {
        let mut params = ParamMap::new().with("track", track);
        page.apply(&mut params);
        self.unsigned_call("track.search", params)
    }

    /// Tell the service what the user has just started listening to.
    ///
    /// Returns the `nowplaying` report with the service's corrections.
    pub fn track_update_now_playing(
        &self,
        session: &Session,
        now_playing: &NowPlaying,
    ) -> Result<Value> {
        self.signed_call(
            "track.updateNowPlaying",
            now_playing.to_params(),
            Some(session),
            HttpVerb::Post,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Session;
    use crate::client::LastfmClient;
    use crate::config::ApiConfig;
    use crate::error::{ErrorKind, LastfmError};
    use crate::transport::HttpVerb;
    use crate::transport::testing::FakeTransport;
    use crate::types::{NowPlaying, Scrobble, TrackRef};
    use chrono::{TimeZone, Utc};

    fn client() -> LastfmClient<FakeTransport> {
        LastfmClient::with_transport(ApiConfig::new("key", "secret"), FakeTransport::ok())
    }

    fn session() -> Session {
        Session::new("rj", "sk", 0)
    }

    fn entry(i: i64) -> Scrobble {
        let ts = Utc.timestamp_opt(1_700_000_000 + i * 240, 0).unwrap();
        Scrobble::new("Cher", format!("Track {i}"), ts)
    }

    #[test]
    fn full_batch_is_one_indexed_post() {
        let client = client();
        let batch: Vec<Scrobble> = (0..10).map(entry).collect();
        client.track_scrobble(&session(), &batch).unwrap();

        assert_eq!(client.transport().count(), 1);
        let req = client.transport().last();
        assert_eq!(req.verb, HttpVerb::Post);
        assert_eq!(req.params["method"], "track.scrobble");
        for i in 0..10 {
            assert_eq!(req.params[&format!("artist[{i}]")], "Cher");
            assert_eq!(req.params[&format!("track[{i}]")], format!("Track {i}"));
            assert!(req.params.contains_key(&format!("timestamp[{i}]")));
        }
        assert!(!req.params.contains_key("artist[10]"));
        assert!(!req.params.contains_key("album[0]"));
    }

    #[test]
    fn missing_timestamp_names_the_entry() {
        let client = client();
        let mut batch: Vec<Scrobble> = (0..4).map(entry).collect();
        batch[2].timestamp = None;
        let err = client.track_scrobble(&session(), &batch).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(
            err,
            LastfmError::MissingField {
                index: 2,
                field: "timestamp"
            }
        ));
        assert_eq!(client.transport().count(), 0);
    }

    #[test]
    fn oversized_batch_is_rejected() {
        let client = client();
        let batch: Vec<Scrobble> = (0..11).map(entry).collect();
        let err = client.track_scrobble(&session(), &batch).unwrap_err();
        assert!(matches!(err, LastfmError::TooMany { max: 10, got: 11, .. }));
        assert_eq!(client.transport().count(), 0);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let client = client();
        client.track_scrobble(&session(), &[]).unwrap();
        assert_eq!(client.transport().count(), 0);
    }

    #[test]
    fn optional_scrobble_fields_are_indexed() {
        let client = client();
        let batch = vec![
            entry(0),
            Scrobble {
                album: Some("Believe".into()),
                chosen_by_user: Some(true),
                duration: Some(239),
                ..entry(1)
            },
        ];
        client.track_scrobble(&session(), &batch).unwrap();
        let req = client.transport().last();
        assert_eq!(req.params["album[1]"], "Believe");
        assert_eq!(req.params["chosenByUser[1]"], "1");
        assert_eq!(req.params["duration[1]"], "239");
        assert!(!req.params.contains_key("album[0]"));
    }

    #[test]
    fn unlove_posts_unlove() {
        let client = client();
        client.track_unlove(&session(), "Cher", "Believe").unwrap();
        assert_eq!(client.transport().last().params["method"], "track.unlove");
        client.track_love(&session(), "Cher", "Believe").unwrap();
        assert_eq!(client.transport().last().params["method"], "track.love");
    }

    #[test]
    fn top_tags_by_mbid_sends_mbid() {
        let client = client();
        client
            .track_top_tags(&TrackRef::mbid("0fd8d4d2"), false)
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.params["mbid"], "0fd8d4d2");
        assert!(!req.params.contains_key("artist"));
    }

    #[test]
    fn now_playing_sends_only_supplied_fields() {
        let client = client();
        let np = NowPlaying {
            album: Some("Believe".into()),
            track_number: Some(1),
            ..NowPlaying::new("Cher", "Believe")
        };
        client.track_update_now_playing(&session(), &np).unwrap();
        let req = client.transport().last();
        assert_eq!(req.params["method"], "track.updateNowPlaying");
        assert_eq!(req.params["trackNumber"], "1");
        assert!(!req.params.contains_key("mbid"));
        assert!(!req.params.contains_key("duration"));
    }

    #[test]
    fn add_tags_joins_with_commas() {
        let client = client();
        client
            .track_add_tags(&session(), "Cher", "Believe", &["pop"])
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.params["tags"], "pop");
        assert_eq!(req.params["method"], "track.addTags");
    }

    #[test]
    fn info_by_name() {
        let client = client();
        client
            .track_info(&TrackRef::name("Cher", "Believe"), Some("rj"), true)
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.verb, HttpVerb::Get);
        assert_eq!(req.params["track"], "Believe");
        assert_eq!(req.params["username"], "rj");
        assert_eq!(req.params["autocorrect"], "1");
    }
}
