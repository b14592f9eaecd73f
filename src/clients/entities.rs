use axum::body::Bytes;
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: Artist,
    // Deezer omits the flag on some tracks; treat missing as not playable
    #[serde(default)]
    pub readable: bool,
    #[serde(default)]
    pub preview: String,
}

impl Track {
    /// A track can be offered to the player only if the catalogue reports it
    /// as readable and it has a preview clip.
    pub fn is_selectable(&self) -> bool {
        self.readable && !self.preview.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Playlist {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub nb_tracks: usize,
    #[serde(default, deserialize_with = "tracks_data")]
    pub tracks: Vec<Track>,
}

// Page of tracks as returned by `/playlist/{id}/tracks` and embedded in `/playlist/{id}`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub data: Vec<Track>,
}

fn tracks_data<'de, D>(deserializer: D) -> std::result::Result<Vec<Track>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    TrackPage::deserialize(deserializer).map(|page| page.data)
}

/// Binary preview payload together with the content type reported upstream.
#[derive(Debug, Clone)]
pub struct PreviewAudio {
    pub bytes: Bytes,
    pub content_type: String,
}
