use log::{debug, warn};
use reqwest::{Client, header::CONTENT_TYPE};

use crate::clients::{
    entities::{DEFAULT_AUDIO_CONTENT_TYPE, PreviewAudio},
    errors::{Error, Result},
};

/// Downloads audio clips from arbitrary hosts (Deezer's preview CDN in practice).
pub struct AudioClient {
    http: Client,
}

impl AudioClient {
    pub fn new(http: Client) -> Self {
        AudioClient { http }
    }

    /// Fetches the preview clip of a selected track.
    ///
    /// Any failure is reported as [`Error::PreviewError`] so callers can tell
    /// a broken clip apart from a broken playlist.
    pub async fn fetch_preview(&self, url: &str) -> Result<PreviewAudio> {
        self.fetch(url).await.map_err(|e| {
            warn!("Preview fetch from {url} failed: {e}");
            Error::PreviewError(e.to_string())
        })
    }

    // Plain passthrough used by the audio proxy
    pub async fn fetch_any(&self, url: &str) -> Result<PreviewAudio> {
        self.fetch(url).await
    }

    async fn fetch(&self, url: &str) -> Result<PreviewAudio> {
        debug!("Fetching audio from {url}");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream_status(
                status.as_u16(),
                format!("audio host responded with {status}"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
            .to_string();
        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes of {content_type} from {url}", bytes.len());

        Ok(PreviewAudio {
            bytes,
            content_type,
        })
    }
}
