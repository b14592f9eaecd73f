use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::{
    entities::{Playlist, TrackPage},
    errors::{Error, Result},
};

pub const DEFAULT_API_BASE: &str = "https://api.deezer.com";

// Largest page Deezer serves from `/playlist/{id}/tracks`
const PAGE_SIZE: usize = 400;

/// Which catalogue index a search query runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchKind {
    #[default]
    Song,
    Playlist,
}

impl SearchKind {
    fn endpoint(self) -> &'static str {
        match self {
            SearchKind::Song => "/search",
            SearchKind::Playlist => "/search/playlist",
        }
    }
}

impl std::str::FromStr for SearchKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "song" | "track" => Ok(SearchKind::Song),
            "playlist" => Ok(SearchKind::Playlist),
            other => Err(Error::ValidationError(format!("unknown search type {other:?}"))),
        }
    }
}

pub struct DeezerClient {
    http: Client,
    api_base: String,
}

impl DeezerClient {
    pub fn new(http: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        DeezerClient { http, api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetches playlist metadata and its complete track list.
    ///
    /// The playlist object only embeds the first page of tracks, so the rest
    /// is paged in until `nb_tracks` is reached or the upstream runs dry.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let id = urlencoding::encode(playlist_id);
        let url = format!("{}/playlist/{id}", self.api_base);
        let mut playlist: Playlist = self.get_json(&url, &[]).await?;
        debug!(
            "Fetched playlist {} ({:?}): {} of {} tracks embedded",
            playlist.id,
            playlist.title,
            playlist.tracks.len(),
            playlist.nb_tracks
        );

        let tracks_url = format!("{url}/tracks");
        while playlist.tracks.len() < playlist.nb_tracks {
            let index = playlist.tracks.len().to_string();
            let limit = PAGE_SIZE.to_string();
            let page: TrackPage = self
                .get_json(&tracks_url, &[("index", index.as_str()), ("limit", limit.as_str())])
                .await?;
            if page.data.is_empty() {
                debug!(
                    "Track paging for playlist {} stopped early at {} tracks",
                    playlist.id,
                    playlist.tracks.len()
                );
                break;
            }
            playlist.tracks.extend(page.data);
        }

        Ok(playlist)
    }

    // Returns the upstream JSON body untouched so the caller can relay it verbatim
    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<String> {
        let url = format!("{}{}", self.api_base, kind.endpoint());
        debug!("Searching {url} for {query:?}");
        let response = self.http.get(&url).query(&[("q", query)]).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T> {
        debug!("GET {url} with {} params", params.len());
        let response = self.http.get(url).query(params).send().await?;
        let response = Self::check_status(response).await?;
        let text = response.text().await?;

        // Deezer reports API failures as 200 responses carrying an error object
        let value: Value = serde_json::from_str(&text)?;
        if let Some(err) = value.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown Deezer error");
            warn!("Deezer API error for {url}: {err}");
            return Err(Error::UpstreamError {
                status: None,
                message: message.to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| {
            warn!("Failed to parse Deezer response from {url}: {e}");
            Error::from(e)
        })
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!("Deezer responded with {status}: {body}");
        Err(Error::upstream_status(
            status.as_u16(),
            format!("catalogue responded with {status}"),
        ))
    }
}
