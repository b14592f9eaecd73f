//! Router-level tests with mocked Deezer API and preview hosts.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{Value, json};
use songmore::server::build_router;
use songmore::service::{ConfigBuilder, SongService};
use tower::util::ServiceExt; // for `oneshot`

const AUDIO: &[u8] = b"ID3\x04\x00fake-mpeg-frames";

/// Test helper: router backed by a service pointed at the mock server
fn setup_app(server: &ServerGuard) -> Router {
    let config = ConfigBuilder::new()
        .bind("127.0.0.1:0".parse().unwrap())
        .api_base(server.url())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("config");
    let service = SongService::new(&config).expect("service");
    build_router(Arc::new(service))
}

/// Test helper: track object in Deezer's shape
fn track(server: &ServerGuard, id: i64, selectable: bool) -> Value {
    json!({
        "id": id,
        "title": format!("Track {id}"),
        "readable": selectable,
        "preview": if selectable { format!("{}/preview/{id}.mp3", server.url()) } else { String::new() },
        "artist": { "id": 7, "name": "Artist" },
        "type": "track"
    })
}

fn playlist(id: u64, nb_tracks: usize, tracks: Vec<Value>) -> String {
    json!({
        "id": id,
        "title": "Test playlist",
        "nb_tracks": nb_tracks,
        "tracks": { "data": tracks, "checksum": "0" }
    })
    .to_string()
}

async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn extract_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response.headers()[name].to_str().unwrap()
}

async fn mock_previews(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", Matcher::Regex(r"^/preview/".to_string()))
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(AUDIO)
        .create_async()
        .await
}

// =============================================================================
// /random-song
// =============================================================================

#[tokio::test]
async fn random_song_streams_only_selectable_track() {
    let mut server = Server::new_async().await;
    let tracks = vec![
        track(&server, 0, false),
        track(&server, 1, true),
        track(&server, 2, false),
    ];
    let _playlist = server
        .mock("GET", "/playlist/42")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(playlist(42, 3, tracks))
        .create_async()
        .await;
    let preview = server
        .mock("GET", "/preview/1.mp3")
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(AUDIO)
        .expect(1)
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/random-song?playlistID=42&seed=any-seed").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "audio/mpeg");
    assert_eq!(header(&response, "cache-control"), "no-store, private");
    assert_eq!(header(&response, "x-track-title"), "Track%201");
    assert_eq!(header(&response, "x-track-artist"), "Artist");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], AUDIO);
    preview.assert_async().await;
}

#[tokio::test]
async fn random_song_requires_playlist_id() {
    let server = Server::new_async().await;
    let app = setup_app(&server);

    for uri in ["/random-song", "/random-song?seed=abc", "/random-song?playlistID="] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = extract_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("playlistID"));
    }
}

#[tokio::test]
async fn random_song_maps_catalogue_failure_to_bad_gateway() {
    let mut server = Server::new_async().await;
    let _playlist = server
        .mock("GET", "/playlist/42")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/random-song?playlistID=42").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(header(&response, "content-type"), "application/json");
    let body = extract_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn random_song_maps_deezer_error_envelope_to_bad_gateway() {
    let mut server = Server::new_async().await;
    let _playlist = server
        .mock("GET", "/playlist/404404")
        .with_status(200)
        .with_body(r#"{"error":{"type":"DataException","message":"no data","code":800}}"#)
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/random-song?playlistID=404404").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = extract_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("no data"));
}

#[tokio::test]
async fn random_song_reports_failed_preview() {
    let mut server = Server::new_async().await;
    let tracks = vec![track(&server, 5, true)];
    let _playlist = server
        .mock("GET", "/playlist/42")
        .with_status(200)
        .with_body(playlist(42, 1, tracks))
        .create_async()
        .await;
    let _preview = server
        .mock("GET", "/preview/5.mp3")
        .with_status(404)
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/random-song?playlistID=42").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = extract_json(response).await;
    assert_eq!(body, json!({ "error": "Failed to fetch MP3 preview data" }));
}

#[tokio::test]
async fn random_song_empty_playlist_is_not_found() {
    let mut server = Server::new_async().await;
    let _playlist = server
        .mock("GET", "/playlist/42")
        .with_status(200)
        .with_body(playlist(42, 0, vec![]))
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/random-song?playlistID=42&seed=x").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(extract_json(response).await, json!({ "error": "no tracks found" }));
}

#[tokio::test]
async fn random_song_without_selectable_track_is_not_found() {
    let mut server = Server::new_async().await;
    let tracks = (0..4).map(|id| track(&server, id, false)).collect();
    let _playlist = server
        .mock("GET", "/playlist/42")
        .with_status(200)
        .with_body(playlist(42, 4, tracks))
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/random-song?playlistID=42").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(extract_json(response).await, json!({ "error": "no tracks found" }));
}

#[tokio::test]
async fn random_song_is_deterministic_for_a_seed() {
    let mut server = Server::new_async().await;
    let tracks = (0..10).map(|id| track(&server, id, true)).collect();
    let _playlist = server
        .mock("GET", "/playlist/42")
        .with_status(200)
        .with_body(playlist(42, 10, tracks))
        .create_async()
        .await;
    let _previews = mock_previews(&mut server).await;

    let app = setup_app(&server);
    let first = get(app.clone(), "/random-song?playlistID=42&seed=songmore").await;
    let second = get(app, "/random-song?playlistID=42&seed=songmore").await;

    assert_eq!(first.status(), StatusCode::OK);
    // "songmore" first draws floor(0.4693... * 10) = 4
    assert_eq!(header(&first, "x-track-title"), "Track%204");
    assert_eq!(
        header(&first, "x-track-title"),
        header(&second, "x-track-title")
    );
}

#[tokio::test]
async fn random_song_pages_in_remaining_tracks() {
    let mut server = Server::new_async().await;
    let embedded = vec![track(&server, 0, false), track(&server, 1, false)];
    let paged = json!({ "data": [track(&server, 2, true)], "total": 3 }).to_string();
    let _playlist = server
        .mock("GET", "/playlist/42")
        .with_status(200)
        .with_body(playlist(42, 3, embedded))
        .create_async()
        .await;
    let page = server
        .mock("GET", "/playlist/42/tracks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("index".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "400".into()),
        ]))
        .with_status(200)
        .with_body(paged)
        .expect(1)
        .create_async()
        .await;
    let _previews = mock_previews(&mut server).await;

    let app = setup_app(&server);
    let response = get(app, "/random-song?playlistID=42").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-track-title"), "Track%202");
    page.assert_async().await;
}

// =============================================================================
// /search
// =============================================================================

#[tokio::test]
async fn search_relays_upstream_json() {
    let mut server = Server::new_async().await;
    let payload = r#"{"data":[{"id":3135556,"title":"Harder, Better, Faster, Stronger"}],"total":1}"#;
    let _search = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".into(), "daft punk".into()))
        .with_status(200)
        .with_body(payload)
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/search?q=daft%20punk").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "cache-control"), "no-store, private");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], payload.as_bytes());
}

#[tokio::test]
async fn search_playlists_hits_playlist_index() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/search/playlist")
        .match_query(Matcher::UrlEncoded("q".into(), "rock".into()))
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/search?q=rock&type=playlist").await;

    assert_eq!(response.status(), StatusCode::OK);
    search.assert_async().await;
}

#[tokio::test]
async fn search_validates_parameters() {
    let server = Server::new_async().await;
    let app = setup_app(&server);

    let response = get(app.clone(), "/search").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/search?q=abc&type=album").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_passes_upstream_status_through() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app, "/search?q=queen").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(extract_json(response).await["error"].is_string());
}

// =============================================================================
// /proxy-audio, /genres, /health
// =============================================================================

#[tokio::test]
async fn proxy_audio_copies_bytes_with_cors() {
    let mut server = Server::new_async().await;
    let _clip = server
        .mock("GET", "/clips/a.ogg")
        .with_status(200)
        .with_header("content-type", "audio/ogg")
        .with_body(AUDIO)
        .create_async()
        .await;

    let app = setup_app(&server);
    let target = format!("{}/clips/a.ogg", server.url());
    let uri = format!("/proxy-audio?url={}", urlencoding::encode(&target));
    let response = get(app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), "audio/ogg");
    assert_eq!(header(&response, "access-control-allow-origin"), "*");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], AUDIO);
}

#[tokio::test]
async fn proxy_audio_errors() {
    let mut server = Server::new_async().await;
    let _clip = server
        .mock("GET", "/clips/missing.mp3")
        .with_status(404)
        .create_async()
        .await;

    let app = setup_app(&server);
    let response = get(app.clone(), "/proxy-audio").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let target = format!("{}/clips/missing.mp3", server.url());
    let uri = format!("/proxy-audio?url={}", urlencoding::encode(&target));
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn genres_lists_default_table() {
    let server = Server::new_async().await;
    let app = setup_app(&server);

    let response = get(app, "/genres").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    let genres = body.as_array().unwrap();
    assert_eq!(genres.len(), 10);
    assert_eq!(genres[0], json!({ "name": "Hits Now", "playlistID": 3_155_776_842_u64 }));
}

#[tokio::test]
async fn health_reports_version() {
    let server = Server::new_async().await;
    let app = setup_app(&server);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
