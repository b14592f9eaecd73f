use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, info};
use reqwest::Client;
use serde::Serialize;

use crate::clients::{
    audio::AudioClient,
    deezer::{DEFAULT_API_BASE, DeezerClient, SearchKind},
    entities::{PreviewAudio, Track},
    errors::{Error, Result},
};
use crate::random::RandomSource;
use crate::selector::select_track;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A named shortcut from the genre picker to a catalogue playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub name: String,
    #[serde(rename = "playlistID")]
    pub playlist_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreTable(Vec<Genre>);

impl GenreTable {
    pub fn new(genres: Vec<Genre>) -> Self {
        GenreTable(genres)
    }

    pub fn genres(&self) -> &[Genre] {
        &self.0
    }

    pub fn playlist_id(&self, name: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .map(|g| g.playlist_id)
    }
}

impl Default for GenreTable {
    fn default() -> Self {
        let genres = [
            ("Hits Now", 3_155_776_842),
            ("Classic Pop", 9_486_319_502),
            ("Rock", 2_445_516_006),
            ("Rap", 6_624_288_744),
            ("80's", 2_718_126_984),
            ("White girl music", 12_458_795_303),
            ("Metal", 10_356_251_462),
            ("Poland", 12_459_037_343),
            ("Games", 8_168_137_842),
            ("Movies", 2_904_878_302),
        ];
        GenreTable(
            genres
                .into_iter()
                .map(|(name, playlist_id)| Genre {
                    name: name.to_string(),
                    playlist_id,
                })
                .collect(),
        )
    }
}

// Configuration for the SongService and the HTTP server around it
pub struct Config {
    pub bind: SocketAddr,
    pub api_base: String,
    pub timeout: Duration,
    pub genres: GenreTable,
}

#[derive(Default)]
pub struct ConfigBuilder {
    bind: Option<SocketAddr>,
    api_base: Option<String>,
    timeout: Option<Duration>,
    genres: Option<GenreTable>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bind(mut self, bind: SocketAddr) -> Self {
        self.bind = Some(bind);
        self
    }

    #[must_use]
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn genres(mut self, genres: GenreTable) -> Self {
        self.genres = Some(genres);
        self
    }

    // Values not set explicitly come from the environment, then from defaults
    pub fn build(self) -> Result<Config> {
        let bind = match self.bind {
            Some(b) => b,
            None => env_var("SONGMORE_BIND")?
                .as_deref()
                .unwrap_or(DEFAULT_BIND)
                .parse()?,
        };
        let api_base = match self.api_base {
            Some(a) => a,
            None => env_var("SONGMORE_API_BASE")?.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        };
        let timeout = match self.timeout {
            Some(t) => t,
            None => match env_var("SONGMORE_TIMEOUT_SECS")? {
                Some(raw) => Duration::from_secs(raw.parse().map_err(|e| {
                    Error::ConfigurationError(format!("SONGMORE_TIMEOUT_SECS={raw:?}: {e}"))
                })?),
                None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        };
        if timeout.is_zero() {
            return Err(Error::ConfigurationError(
                "upstream timeout must be greater than zero".into(),
            ));
        }
        Ok(Config {
            bind,
            api_base,
            timeout,
            genres: self.genres.unwrap_or_default(),
        })
    }
}

fn env_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::ConfigurationError(format!("{name}: {e}"))),
    }
}

/// Track chosen from a playlist, detached from the fetched list.
#[derive(Debug, Clone)]
pub struct PickedTrack {
    pub playlist_id: u64,
    pub index: usize,
    pub track: Track,
}

/// Everything a `/random-song` response is assembled from.
#[derive(Debug, Clone)]
pub struct PreviewClip {
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub audio: PreviewAudio,
}

// Stateless per request: the only shared pieces are the pooled HTTP client and the genre table
pub struct SongService {
    deezer: DeezerClient,
    audio: AudioClient,
    genres: GenreTable,
}

impl SongService {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(SongService {
            deezer: DeezerClient::new(http.clone(), config.api_base.clone()),
            audio: AudioClient::new(http),
            genres: config.genres.clone(),
        })
    }

    pub fn genres(&self) -> &GenreTable {
        &self.genres
    }

    /// Fetches the playlist and selects one playable track from it.
    pub async fn pick(&self, playlist_id: &str, seed: Option<&str>) -> Result<PickedTrack> {
        let playlist = self.deezer.get_playlist(playlist_id).await?;
        debug!(
            "Playlist {} has {} tracks, {} selectable",
            playlist.id,
            playlist.tracks.len(),
            playlist.tracks.iter().filter(|t| t.is_selectable()).count()
        );

        let mut rng = RandomSource::from_seed(seed);
        let selection = select_track(&playlist.tracks, &mut rng)?;
        info!(
            "Picked track {} of playlist {} ({} - {}), seeded: {}",
            selection.index,
            playlist.id,
            selection.track.artist.name,
            selection.track.title,
            rng.is_seeded()
        );

        Ok(PickedTrack {
            playlist_id: playlist.id,
            index: selection.index,
            track: selection.track.clone(),
        })
    }

    /// Picks a track and downloads its preview clip.
    pub async fn random_song(&self, playlist_id: &str, seed: Option<&str>) -> Result<PreviewClip> {
        let picked = self.pick(playlist_id, seed).await?;
        let audio = self.audio.fetch_preview(&picked.track.preview).await?;
        Ok(PreviewClip {
            index: picked.index,
            title: picked.track.title,
            artist: picked.track.artist.name,
            audio,
        })
    }

    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<String> {
        self.deezer.search(query, kind).await
    }

    pub async fn proxy_audio(&self, url: &str) -> Result<PreviewAudio> {
        self.audio.fetch_any(url).await
    }
}
