//! HTTP surface of the game backend.
//!
//! | Path | Description |
//! |------|-------------|
//! | `/random-song` | Preview audio of a track picked from a playlist |
//! | `/search` | Catalogue search passthrough for autocomplete |
//! | `/proxy-audio` | Byte passthrough for arbitrary audio URLs |
//! | `/genres` | Genre to playlist table for the genre picker |
//! | `/health` | Liveness probe |

/// Response assembly and error mapping
pub mod response;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{debug, info};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use crate::clients::{
    deezer::SearchKind,
    errors::{Error, Result},
};
use crate::service::{Config, SongService};

use response::{audio_response, error_response, proxy_response, search_response};

#[derive(Deserialize)]
struct RandomSongParams {
    #[serde(rename = "playlistID")]
    playlist_id: Option<String>,
    seed: Option<String>,
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct ProxyParams {
    url: Option<String>,
}

// Rejects absent and blank values alike
fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::missing_parameter(name))
}

pub fn build_router(service: Arc<SongService>) -> Router {
    Router::new()
        .route("/random-song", get(random_song))
        .route("/search", get(search))
        .route("/proxy-audio", get(proxy_audio))
        .route("/genres", get(genres))
        .route("/health", get(health))
        .with_state(service)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let service = Arc::new(SongService::new(&config)?);
    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn random_song(
    State(service): State<Arc<SongService>>,
    Query(params): Query<RandomSongParams>,
) -> Result<Response> {
    let playlist_id = required(params.playlist_id.as_deref(), "playlistID")?;
    debug!("random-song for playlist {playlist_id}, seed {:?}", params.seed);
    let clip = service
        .random_song(playlist_id, params.seed.as_deref())
        .await?;
    Ok(audio_response(clip))
}

async fn search(
    State(service): State<Arc<SongService>>,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let query = required(params.q.as_deref(), "q")?;
    let kind = match params.kind.as_deref() {
        Some(raw) if !raw.is_empty() => raw.parse()?,
        _ => SearchKind::default(),
    };

    match service.search(query, kind).await {
        Ok(body) => Ok(search_response(body)),
        // Catalogue-reported failures keep their status
        Err(Error::UpstreamError {
            status: Some(status),
            message,
        }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            Ok(error_response(status, message))
        }
        Err(e) => Err(e),
    }
}

async fn proxy_audio(
    State(service): State<Arc<SongService>>,
    Query(params): Query<ProxyParams>,
) -> Result<Response> {
    let url = required(params.url.as_deref(), "url")?;
    let audio = service.proxy_audio(url).await?;
    Ok(proxy_response(audio))
}

async fn genres(State(service): State<Arc<SongService>>) -> impl IntoResponse {
    Json(service.genres().genres().to_vec())
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
