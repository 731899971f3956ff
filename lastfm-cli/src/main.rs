use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use lastfm_api::types::{
    AlbumRef, ArtistRef, MAX_SCROBBLES, NowPlaying, Page, Scrobble, TrackRef,
};
use lastfm_api::{ApiConfig, LastfmClient, Session};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "lastfm", version, about = "Last.fm web service CLI")]
struct Cli {
    /// Application API key
    #[arg(long, env = "LASTFM_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,
    /// Application shared secret (needed for write commands)
    #[arg(long, env = "LASTFM_API_SECRET", global = true, hide_env_values = true)]
    api_secret: Option<String>,
    /// API endpoint
    #[arg(long, global = true, default_value = lastfm_api::config::DEFAULT_BASE_URL)]
    base_url: String,
    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,
    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a session (name + session key from the auth flow)
    Login {
        /// Last.fm user name
        #[arg(required_unless_present = "check")]
        name: Option<String>,
        /// Session key
        #[arg(required_unless_present = "check")]
        key: Option<String>,
        /// The user is a subscriber
        #[arg(long)]
        subscriber: bool,
        /// Show the saved session instead
        #[arg(long)]
        check: bool,
    },
    /// Clear saved session
    Logout,
    /// Album lookups and tagging
    Album {
        #[command(subcommand)]
        command: AlbumCommand,
    },
    /// Artist lookups and tagging
    Artist {
        #[command(subcommand)]
        command: ArtistCommand,
    },
    /// Tag lookups and charts
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Track lookups, tagging, loving and scrobbling
    Track {
        #[command(subcommand)]
        command: TrackCommand,
    },
}

/// `ARTIST ALBUM` or `--mbid ID`
#[derive(Args)]
struct AlbumId {
    /// Artist name
    #[arg(required_unless_present = "mbid")]
    artist: Option<String>,
    /// Album title
    #[arg(required_unless_present = "mbid")]
    album: Option<String>,
    /// MusicBrainz album ID
    #[arg(long, conflicts_with_all = ["artist", "album"])]
    mbid: Option<String>,
}

/// `ARTIST` or `--mbid ID`
#[derive(Args)]
struct ArtistId {
    /// Artist name
    #[arg(required_unless_present = "mbid")]
    artist: Option<String>,
    /// MusicBrainz artist ID
    #[arg(long, conflicts_with = "artist")]
    mbid: Option<String>,
}

/// `ARTIST TRACK` or `--mbid ID`
#[derive(Args)]
struct TrackId {
    /// Artist name
    #[arg(required_unless_present = "mbid")]
    artist: Option<String>,
    /// Track title
    #[arg(required_unless_present = "mbid")]
    track: Option<String>,
    /// MusicBrainz track ID
    #[arg(long, conflicts_with_all = ["artist", "track"])]
    mbid: Option<String>,
}

#[derive(Args)]
struct Paging {
    /// Results per page
    #[arg(short, long, default_value = "50")]
    limit: u32,
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    page: u32,
}

impl From<&Paging> for Page {
    fn from(p: &Paging) -> Self {
        Page::new(p.limit, p.page)
    }
}

#[derive(Subcommand)]
enum AlbumCommand {
    /// Album metadata and tracklist
    Info {
        #[command(flatten)]
        id: AlbumId,
        #[arg(long)]
        autocorrect: bool,
        /// Include this user's play count
        #[arg(long)]
        username: Option<String>,
        /// Biography language (ISO 639)
        #[arg(long)]
        lang: Option<String>,
    },
    /// Tags a user applied to an album
    Tags {
        #[command(flatten)]
        id: AlbumId,
        #[arg(long)]
        user: String,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Most used tags for an album
    TopTags {
        #[command(flatten)]
        id: AlbumId,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Search albums by title
    Search {
        album: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Tag an album (max 10 tags)
    AddTags {
        artist: String,
        album: String,
        tags: Vec<String>,
    },
    /// Remove one of your tags from an album
    RemoveTag {
        artist: String,
        album: String,
        tag: String,
    },
}

#[derive(Subcommand)]
enum ArtistCommand {
    /// Artist metadata and biography
    Info {
        #[command(flatten)]
        id: ArtistId,
        #[arg(long)]
        autocorrect: bool,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Canonical spelling of an artist name
    Correction { artist: String },
    /// Similar artists
    Similar {
        #[command(flatten)]
        id: ArtistId,
        #[arg(short, long, default_value = "50")]
        limit: u32,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Tags a user applied to an artist
    Tags {
        #[command(flatten)]
        id: ArtistId,
        #[arg(long)]
        user: String,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Most popular albums
    TopAlbums {
        #[command(flatten)]
        id: ArtistId,
        #[arg(short, long, default_value = "10")]
        limit: u32,
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Most used tags for an artist
    TopTags {
        #[command(flatten)]
        id: ArtistId,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Most popular tracks
    TopTracks {
        #[command(flatten)]
        id: ArtistId,
        #[arg(short, long, default_value = "10")]
        limit: u32,
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Search artists by name
    Search {
        artist: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Tag an artist (max 10 tags)
    AddTags { artist: String, tags: Vec<String> },
    /// Remove one of your tags from an artist
    RemoveTag { artist: String, tag: String },
}

#[derive(Subcommand)]
enum TagCommand {
    /// Tag metadata
    Info {
        tag: String,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Similar tags
    Similar { tag: String },
    /// Top albums for a tag
    TopAlbums {
        tag: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Top artists for a tag
    TopArtists {
        tag: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Most used tags overall
    TopTags,
    /// Top tracks for a tag
    TopTracks {
        tag: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Available weekly chart ranges
    WeeklyCharts { tag: String },
}

#[derive(Subcommand)]
enum TrackCommand {
    /// Track metadata
    Info {
        #[command(flatten)]
        id: TrackId,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Canonical spelling of a track
    Correction { artist: String, track: String },
    /// Similar tracks
    Similar {
        #[command(flatten)]
        id: TrackId,
        #[arg(short, long, default_value = "10")]
        limit: u32,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Tags a user applied to a track
    Tags {
        #[command(flatten)]
        id: TrackId,
        #[arg(long)]
        user: String,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Most used tags for a track
    TopTags {
        #[command(flatten)]
        id: TrackId,
        #[arg(long)]
        autocorrect: bool,
    },
    /// Search tracks by title
    Search {
        track: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Love a track
    Love { artist: String, track: String },
    /// Unlove a track
    Unlove { artist: String, track: String },
    /// Tag a track (max 10 tags)
    AddTags {
        artist: String,
        track: String,
        tags: Vec<String>,
    },
    /// Remove one of your tags from a track
    RemoveTag {
        artist: String,
        track: String,
        tag: String,
    },
    /// Report what you are listening to right now
    NowPlaying {
        artist: String,
        track: String,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        album_artist: Option<String>,
        #[arg(long)]
        track_number: Option<u32>,
        #[arg(long)]
        mbid: Option<String>,
        /// Track length in seconds
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Scrobble one track, or a JSON batch file
    Scrobble {
        #[arg(required_unless_present = "file")]
        artist: Option<String>,
        #[arg(required_unless_present = "file")]
        track: Option<String>,
        #[arg(long)]
        album: Option<String>,
        /// Unix time the track started (default: now)
        #[arg(long)]
        timestamp: Option<i64>,
        /// JSON array of scrobbles, sent in batches of 10
        #[arg(short, long, conflicts_with_all = ["artist", "track", "album", "timestamp"])]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Login {
            name,
            key,
            subscriber,
            check,
        } => cmd_login(name.as_deref(), key.as_deref(), *subscriber, *check),
        Command::Logout => cmd_logout(),
        Command::Album { command } => cmd_album(&cli, command),
        Command::Artist { command } => cmd_artist(&cli, command),
        Command::Tag { command } => cmd_tag(&cli, command),
        Command::Track { command } => cmd_track(&cli, command),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "lastfm=warn,lastfm_api=warn",
        1 => "lastfm=info,lastfm_api=info",
        _ => "lastfm=debug,lastfm_api=debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

// ── client setup ──

impl Cli {
    fn config(&self) -> Result<ApiConfig> {
        let key = self
            .api_key
            .clone()
            .context("API key required (--api-key or LASTFM_API_KEY)")?;
        let secret = self.api_secret.clone().unwrap_or_default();
        Ok(ApiConfig::new(key, secret)
            .with_base_url(&self.base_url)
            .with_timeout(Some(Duration::from_secs(self.timeout))))
    }

    fn client(&self) -> Result<LastfmClient> {
        Ok(LastfmClient::new(self.config()?)?)
    }

    /// Client plus saved session, for write commands.
    fn signed(&self) -> Result<(LastfmClient, Session)> {
        if self.api_secret.as_deref().is_none_or(str::is_empty) {
            bail!("API secret required (--api-secret or LASTFM_API_SECRET)");
        }
        let session = Session::load()?.context("not logged in, run `lastfm login` first")?;
        debug!(user = session.name(), "loaded session");
        Ok((self.client()?, session))
    }
}

fn print_json(v: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

impl AlbumId {
    fn to_ref(&self) -> Result<AlbumRef> {
        match (&self.mbid, &self.artist, &self.album) {
            (Some(mbid), _, _) => Ok(AlbumRef::mbid(mbid)),
            (None, Some(artist), Some(album)) => Ok(AlbumRef::name(artist, album)),
            _ => bail!("give ARTIST and ALBUM, or --mbid"),
        }
    }
}

impl ArtistId {
    fn to_ref(&self) -> Result<ArtistRef> {
        match (&self.mbid, &self.artist) {
            (Some(mbid), _) => Ok(ArtistRef::mbid(mbid)),
            (None, Some(artist)) => Ok(ArtistRef::name(artist)),
            (None, None) => bail!("give ARTIST or --mbid"),
        }
    }
}

impl TrackId {
    fn to_ref(&self) -> Result<TrackRef> {
        match (&self.mbid, &self.artist, &self.track) {
            (Some(mbid), _, _) => Ok(TrackRef::mbid(mbid)),
            (None, Some(artist), Some(track)) => Ok(TrackRef::name(artist, track)),
            _ => bail!("give ARTIST and TRACK, or --mbid"),
        }
    }
}

// ── login / logout ──

fn cmd_login(name: Option<&str>, key: Option<&str>, subscriber: bool, check: bool) -> Result<()> {
    if check {
        match Session::load()? {
            Some(s) if s.is_logged_in() => println!(
                "Logged in as: {}{}",
                s.name(),
                if s.is_subscriber() { " (subscriber)" } else { "" }
            ),
            _ => println!("Not logged in."),
        }
        return Ok(());
    }

    let name = name.context("user name required")?;
    let key = key.context("session key required")?;
    Session::new(name, key, u8::from(subscriber)).save()?;
    println!("Session saved to {}.", Session::path()?.display());
    Ok(())
}

fn cmd_logout() -> Result<()> {
    Session::clear()?;
    println!("Session cleared.");
    Ok(())
}

// ── album ──

fn cmd_album(cli: &Cli, command: &AlbumCommand) -> Result<()> {
    match command {
        AlbumCommand::Info {
            id,
            autocorrect,
            username,
            lang,
        } => print_json(&cli.client()?.album_info(
            &id.to_ref()?,
            *autocorrect,
            username.as_deref(),
            lang.as_deref(),
        )?),
        AlbumCommand::Tags {
            id,
            user,
            autocorrect,
        } => print_json(&cli.client()?.album_tags(&id.to_ref()?, user, *autocorrect)?),
        AlbumCommand::TopTags { id, autocorrect } => {
            print_json(&cli.client()?.album_top_tags(&id.to_ref()?, *autocorrect)?)
        }
        AlbumCommand::Search { album, paging } => {
            print_json(&cli.client()?.album_search(album, paging.into())?)
        }
        AlbumCommand::AddTags {
            artist,
            album,
            tags,
        } => {
            let (client, session) = cli.signed()?;
            client.album_add_tags(&session, artist, album, tags.as_slice())?;
            println!("Tagged {artist} – {album}.");
            Ok(())
        }
        AlbumCommand::RemoveTag { artist, album, tag } => {
            let (client, session) = cli.signed()?;
            client.album_remove_tag(&session, artist, album, tag)?;
            println!("Removed tag {tag:?}.");
            Ok(())
        }
    }
}

// ── artist ──

fn cmd_artist(cli: &Cli, command: &ArtistCommand) -> Result<()> {
    match command {
        ArtistCommand::Info {
            id,
            autocorrect,
            username,
            lang,
        } => print_json(&cli.client()?.artist_info(
            &id.to_ref()?,
            *autocorrect,
            username.as_deref(),
            lang.as_deref(),
        )?),
        ArtistCommand::Correction { artist } => {
            print_json(&cli.client()?.artist_correction(artist)?)
        }
        ArtistCommand::Similar {
            id,
            limit,
            autocorrect,
        } => print_json(&cli.client()?.artist_similar(&id.to_ref()?, *limit, *autocorrect)?),
        ArtistCommand::Tags {
            id,
            user,
            autocorrect,
        } => print_json(&cli.client()?.artist_tags(&id.to_ref()?, user, *autocorrect)?),
        ArtistCommand::TopAlbums {
            id,
            limit,
            page,
            autocorrect,
        } => print_json(&cli.client()?.artist_top_albums(
            &id.to_ref()?,
            Page::new(*limit, *page),
            *autocorrect,
        )?),
        ArtistCommand::TopTags { id, autocorrect } => {
            print_json(&cli.client()?.artist_top_tags(&id.to_ref()?, *autocorrect)?)
        }
        ArtistCommand::TopTracks {
            id,
            limit,
            page,
            autocorrect,
        } => print_json(&cli.client()?.artist_top_tracks(
            &id.to_ref()?,
            Page::new(*limit, *page),
            *autocorrect,
        )?),
        ArtistCommand::Search { artist, paging } => {
            print_json(&cli.client()?.artist_search(artist, paging.into())?)
        }
        ArtistCommand::AddTags { artist, tags } => {
            let (client, session) = cli.signed()?;
            client.artist_add_tags(&session, artist, tags.as_slice())?;
            println!("Tagged {artist}.");
            Ok(())
        }
        ArtistCommand::RemoveTag { artist, tag } => {
            let (client, session) = cli.signed()?;
            client.artist_remove_tag(&session, artist, tag)?;
            println!("Removed tag {tag:?}.");
            Ok(())
        }
    }
}

// ── tag ──

fn cmd_tag(cli: &Cli, command: &TagCommand) -> Result<()> {
    let client = cli.client()?;
    let payload = match command {
        TagCommand::Info { tag, lang } => client.tag_info(tag, lang.as_deref())?,
        TagCommand::Similar { tag } => client.tag_similar(tag)?,
        TagCommand::TopAlbums { tag, paging } => client.tag_top_albums(tag, paging.into())?,
        TagCommand::TopArtists { tag, paging } => client.tag_top_artists(tag, paging.into())?,
        TagCommand::TopTags => client.tag_top_tags()?,
        TagCommand::TopTracks { tag, paging } => client.tag_top_tracks(tag, paging.into())?,
        TagCommand::WeeklyCharts { tag } => client.tag_weekly_chart_list(tag)?,
    };
    print_json(&payload)
}

// ── track ──

fn cmd_track(cli: &Cli, command: &TrackCommand) -> Result<()> {
    match command {
        TrackCommand::Info {
            id,
            username,
            autocorrect,
        } => print_json(&cli.client()?.track_info(
            &id.to_ref()?,
            username.as_deref(),
            *autocorrect,
        )?),
        TrackCommand::Correction { artist, track } => {
            print_json(&cli.client()?.track_correction(artist, track)?)
        }
        TrackCommand::Similar {
            id,
            limit,
            autocorrect,
        } => print_json(&cli.client()?.track_similar(&id.to_ref()?, *limit, *autocorrect)?),
        TrackCommand::Tags {
            id,
            user,
            autocorrect,
        } => print_json(&cli.client()?.track_tags(&id.to_ref()?, user, *autocorrect)?),
        TrackCommand::TopTags { id, autocorrect } => {
            print_json(&cli.client()?.track_top_tags(&id.to_ref()?, *autocorrect)?)
        }
        TrackCommand::Search { track, paging } => {
            print_json(&cli.client()?.track_search(track, paging.into())?)
        }
        TrackCommand::Love { artist, track } => {
            let (client, session) = cli.signed()?;
            client.track_love(&session, artist, track)?;
            println!("Loved {artist} – {track}.");
            Ok(())
        }
        TrackCommand::Unlove { artist, track } => {
            let (client, session) = cli.signed()?;
            client.track_unlove(&session, artist, track)?;
            println!("Unloved {artist} – {track}.");
            Ok(())
        }
        TrackCommand::AddTags {
            artist,
            track,
            tags,
        } => {
            let (client, session) = cli.signed()?;
            client.track_add_tags(&session, artist, track, tags.as_slice())?;
            println!("Tagged {artist} – {track}.");
            Ok(())
        }
        TrackCommand::RemoveTag { artist, track, tag } => {
            let (client, session) = cli.signed()?;
            client.track_remove_tag(&session, artist, track, tag)?;
            println!("Removed tag {tag:?}.");
            Ok(())
        }
        TrackCommand::NowPlaying {
            artist,
            track,
            album,
            album_artist,
            track_number,
            mbid,
            duration,
        } => {
            let (client, session) = cli.signed()?;
            let np = NowPlaying {
                album: album.clone(),
                album_artist: album_artist.clone(),
                track_number: *track_number,
                mbid: mbid.clone(),
                duration: *duration,
                ..NowPlaying::new(artist, track)
            };
            print_json(&client.track_update_now_playing(&session, &np)?)
        }
        TrackCommand::Scrobble {
            artist,
            track,
            album,
            timestamp,
            file,
        } => {
            let batch = match file {
                Some(path) => read_scrobbles(path)?,
                None => vec![single_scrobble(
                    artist.as_deref(),
                    track.as_deref(),
                    album.clone(),
                    *timestamp,
                )?],
            };
            cmd_scrobble(cli, &batch)
        }
    }
}

fn read_scrobbles(path: &Path) -> Result<Vec<Scrobble>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("invalid scrobble file {}", path.display()))
}

fn single_scrobble(
    artist: Option<&str>,
    track: Option<&str>,
    album: Option<String>,
    timestamp: Option<i64>,
) -> Result<Scrobble> {
    let artist = artist.context("ARTIST required")?;
    let track = track.context("TRACK required")?;
    let when = match timestamp {
        Some(ts) => chrono::DateTime::from_timestamp(ts, 0).context("timestamp out of range")?,
        None => chrono::Utc::now(),
    };
    Ok(Scrobble {
        album,
        ..Scrobble::new(artist, track, when)
    })
}

/// Reject the whole list before any batch is submitted. Positions are
/// counted from the start of the list.
fn check_scrobbles(batch: &[Scrobble]) -> Result<()> {
    for (index, entry) in batch.iter().enumerate() {
        entry.validate(index).context("nothing was submitted")?;
    }
    Ok(())
}

fn cmd_scrobble(cli: &Cli, batch: &[Scrobble]) -> Result<()> {
    check_scrobbles(batch)?;
    let (client, session) = cli.signed()?;
    for (n, chunk) in batch.chunks(MAX_SCROBBLES).enumerate() {
        info!(batch = n, entries = chunk.len(), "submitting scrobbles");
        let report = client
            .track_scrobble(&session, chunk)
            .with_context(|| format!("batch {n} (entries {}..)", n * MAX_SCROBBLES))?;
        print_json(&report)?;
    }
    Ok(())
}
