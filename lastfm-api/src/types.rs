//! Request-side types shared by the service methods.
//!
//! Responses are returned as raw [`serde_json::Value`] payloads; the types
//! here only describe what goes *into* a call.

use crate::error::{LastfmError, Result};
use crate::params::{ParamMap, ParamValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most tags accepted by one `*.addTags` call.
pub const MAX_TAGS: usize = 10;
/// Most entries accepted by one `track.scrobble` call.
pub const MAX_SCROBBLES: usize = 10;

/// Comma-joined tag list for `*.addTags`.
///
/// `Ok(None)` for an empty list: nothing to send.
pub(crate) fn tag_list<S: AsRef<str>>(tags: &[S]) -> Result<Option<String>> {
    if tags.is_empty() {
        return Ok(None);
    }
    if tags.len() > MAX_TAGS {
        return Err(LastfmError::TooMany {
            what: "tags",
            max: MAX_TAGS,
            got: tags.len(),
        });
    }
    Ok(Some(
        tags.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(","),
    ))
}

/// Identifies an artist either by name or by MusicBrainz ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistRef {
    Name(String),
    Mbid(String),
}

impl ArtistRef {
    pub fn name(artist: impl Into<String>) -> Self {
        Self::Name(artist.into())
    }

    pub fn mbid(mbid: impl Into<String>) -> Self {
        Self::Mbid(mbid.into())
    }

    pub(crate) fn apply(&self, params: &mut ParamMap) {
        match self {
            Self::Name(artist) => params.insert("artist", artist),
            Self::Mbid(mbid) => params.insert("mbid", mbid),
        }
    }
}

/// Identifies an album either by artist + title or by MusicBrainz ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumRef {
    Name { artist: String, album: String },
    Mbid(String),
}

impl AlbumRef {
    pub fn name(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self::Name {
            artist: artist.into(),
            album: album.into(),
        }
    }

    pub fn mbid(mbid: impl Into<String>) -> Self {
        Self::Mbid(mbid.into())
    }

    pub(crate) fn apply(&self, params: &mut ParamMap) {
        match self {
            Self::Name { artist, album } => {
                params.insert("artist", artist);
                params.insert("album", album);
            }
            Self::Mbid(mbid) => params.insert("mbid", mbid),
        }
    }
}

/// Identifies a track either by artist + title or by MusicBrainz ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackRef {
    Name { artist: String, track: String },
    Mbid(String),
}

impl TrackRef {
    pub fn name(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self::Name {
            artist: artist.into(),
            track: track.into(),
        }
    }

    pub fn mbid(mbid: impl Into<String>) -> Self {
        Self::Mbid(mbid.into())
    }

    pub(crate) fn apply(&self, params: &mut ParamMap) {
        match self {
            Self::Name { artist, track } => {
                params.insert("artist", artist);
                params.insert("track", track);
            }
            Self::Mbid(mbid) => params.insert("mbid", mbid),
        }
    }
}

/// Pagination for list endpoints (`limit` results per page, 1-based `page`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub page: u32,
}

impl Page {
    pub fn new(limit: u32, page: u32) -> Self {
        Self { limit, page }
    }

    pub(crate) fn apply(self, params: &mut ParamMap) {
        params.insert("limit", self.limit);
        params.insert("page", self.page);
    }
}

/// Default for search and tag charts.
impl Default for Page {
    fn default() -> Self {
        Self { limit: 50, page: 1 }
    }
}

/// One entry of a `track.scrobble` batch.
///
/// `artist`, `track` and `timestamp` are required; they are `Option` so a
/// batch read from JSON can be checked entry by entry before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scrobble {
    pub artist: Option<String>,
    pub track: Option<String>,
    /// When the track started playing.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    pub album: Option<String>,
    pub context: Option<String>,
    pub stream_id: Option<String>,
    pub chosen_by_user: Option<bool>,
    pub track_number: Option<u32>,
    pub mbid: Option<String>,
    pub album_artist: Option<String>,
    /// Length of the track in seconds.
    pub duration: Option<u32>,
}

impl Scrobble {
    pub fn new(
        artist: impl Into<String>,
        track: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            artist: Some(artist.into()),
            track: Some(track.into()),
            timestamp: Some(timestamp),
            ..Self::default()
        }
    }

    /// Check that `artist`, `track` and `timestamp` are set.
    ///
    /// `index` is reported back in [`LastfmError::MissingField`], so callers
    /// splitting a longer list into batches can pass the overall position.
    pub fn validate(&self, index: usize) -> Result<()> {
        let missing = [
            ("artist", self.artist.is_none()),
            ("track", self.track.is_none()),
            ("timestamp", self.timestamp.is_none()),
        ]
        .into_iter()
        .find_map(|(field, missing)| missing.then_some(field));
        match missing {
            Some(field) => Err(LastfmError::MissingField { index, field }),
            None => Ok(()),
        }
    }

    /// Append this entry's fields as `name[index]`.
    pub(crate) fn apply(&self, index: usize, params: &mut ParamMap) -> Result<()> {
        self.validate(index)?;
        let required: [(&str, ParamValue); 3] = [
            ("artist", self.artist.as_deref().into()),
            ("track", self.track.as_deref().into()),
            ("timestamp", self.timestamp.map(|t| t.timestamp()).into()),
        ];
        for (field, value) in required {
            params.insert(format!("{field}[{index}]"), value);
        }

        let optional: [(&str, ParamValue); 8] = [
            ("album", self.album.as_deref().into()),
            ("context", self.context.as_deref().into()),
            ("streamId", self.stream_id.as_deref().into()),
            ("chosenByUser", self.chosen_by_user.into()),
            ("trackNumber", self.track_number.into()),
            ("mbid", self.mbid.as_deref().into()),
            ("albumArtist", self.album_artist.as_deref().into()),
            ("duration", self.duration.into()),
        ];
        for (field, value) in optional {
            params.insert(format!("{field}[{index}]"), value);
        }
        Ok(())
    }
}

/// Arguments of `track.updateNowPlaying`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub artist: String,
    pub track: String,
    pub album: Option<String>,
    pub track_number: Option<u32>,
    pub context: Option<String>,
    pub mbid: Option<String>,
    /// Length of the track in seconds.
    pub duration: Option<u32>,
    pub album_artist: Option<String>,
}

impl NowPlaying {
    pub fn new(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            track: track.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_params(&self) -> ParamMap {
        ParamMap::new()
            .with("artist", &self.artist)
            .with("track", &self.track)
            .with("album", self.album.as_deref())
            .with("trackNumber", self.track_number)
            .with("context", self.context.as_deref())
            .with("mbid", self.mbid.as_deref())
            .with("duration", self.duration)
            .with("albumArtist", self.album_artist.as_deref())
    }
}
