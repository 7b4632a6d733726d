//! End-to-end tests with mocked external dependencies.
//!
//! These tests run the full router in-process with a mock fetcher standing in
//! for yt-dlp and a mock tagger standing in for the ID3 writer.

mod common;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Notify;

use common::{fixtures, TestFixture};
use playlist2album_core::testing::MockFetcher;
use playlist2album_core::FetcherError;

fn playlist_fetcher(count: u32) -> MockFetcher {
    let mut fetcher = MockFetcher::new().with_lines(fixtures::playlist_lines("Road Trip", count));
    for file in fixtures::playlist_files(count) {
        fetcher = fetcher.with_file(file);
    }
    fetcher
}

fn download_body() -> Value {
    json!({
        "playlist_url": "https://www.youtube.com/playlist?list=PL123",
        "album": { "title": "Road Trip", "artist": "The Band", "year": "1999" }
    })
}

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get_raw("/metrics").await;
    assert_eq!(response.status, StatusCode::OK);

    let text = String::from_utf8(response.body).unwrap();
    assert!(text.contains("playlist2album_jobs_by_status"));
    assert!(text.contains("playlist2album_workers_active"));
}

// =============================================================================
// Download Flow
// =============================================================================

#[tokio::test]
async fn test_download_returns_job_immediately() {
    let fixture = TestFixture::with_fetcher(playlist_fetcher(2));

    let response = fixture.post("/download", download_body()).await;
    assert_status!(response, StatusCode::OK);

    let job_id = response.body["job_id"].as_str().unwrap().to_string();
    assert_eq!(response.body["tracks"], json!([]));
    let out_dir = response.body["out_dir"].as_str().unwrap();
    assert!(out_dir.ends_with(&job_id));
    assert!(std::path::Path::new(out_dir).is_dir());

    fixture.state.jobs().wait(&job_id).await;
}

#[tokio::test]
async fn test_playlist_download_reports_progress_and_result() {
    let fixture = TestFixture::with_fetcher(playlist_fetcher(3));

    let response = fixture.download_and_wait(download_body()).await;
    assert_status!(response, StatusCode::OK);
    let job_id = response.body["job_id"].as_str().unwrap();

    let progress = fixture.get(&format!("/progress/{}", job_id)).await;
    assert_status!(progress, StatusCode::OK);
    assert_eq!(progress.body["status"], "completed");
    assert_eq!(progress.body["current"], 3);
    assert_eq!(progress.body["total"], 3);

    let result = fixture.get(&format!("/download/result/{}", job_id)).await;
    assert_status!(result, StatusCode::OK);
    assert_eq!(result.body["job_id"], job_id);

    let tracks = result.body["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 3);
    for (i, track) in tracks.iter().enumerate() {
        assert_eq!(track["id"], i as u64 + 1);
        assert_eq!(track["title"], format!("Track {}", i + 1));
        assert!(track["path"].as_str().unwrap().ends_with(".mp3"));
    }
}

#[tokio::test]
async fn test_single_video_completes_at_one_of_one() {
    let fixture = TestFixture::with_fetcher(MockFetcher::new().with_file("NA - Only Song.mp3"));

    let response = fixture
        .download_and_wait(json!({ "playlist_url": "https://youtu.be/abc" }))
        .await;
    let job_id = response.body["job_id"].as_str().unwrap();

    let progress = fixture.get(&format!("/progress/{}", job_id)).await;
    assert_eq!(progress.body["status"], "completed");
    assert_eq!(progress.body["current"], 1);
    assert_eq!(progress.body["total"], 1);

    let result = fixture.get(&format!("/download/result/{}", job_id)).await;
    assert_eq!(result.body["tracks"][0]["title"], "Only Song");
}

#[tokio::test]
async fn test_result_is_202_while_running() {
    let gate = Arc::new(Notify::new());
    let fetcher = playlist_fetcher(2).with_gate(Arc::clone(&gate));
    let fixture = TestFixture::with_fetcher(fetcher);

    let response = fixture.post("/download", download_body()).await;
    let job_id = response.body["job_id"].as_str().unwrap().to_string();

    let pending = fixture.get(&format!("/download/result/{}", job_id)).await;
    assert_status!(pending, StatusCode::ACCEPTED);
    assert_eq!(pending.body["detail"], "still in progress");
    let status = pending.body["status"].as_str().unwrap();
    assert!(status == "starting" || status == "downloading");

    gate.notify_one();
    fixture.state.jobs().wait(&job_id).await;

    let done = fixture.get(&format!("/download/result/{}", job_id)).await;
    assert_status!(done, StatusCode::OK);
    assert_eq!(done.body["tracks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_download_reports_error() {
    let fetcher = MockFetcher::new()
        .with_lines(["ERROR: [generic] Unsupported URL: https://example.com"])
        .with_error(FetcherError::process_failed(
            "yt-dlp exited with code 1",
            Some("ERROR: Unsupported URL".to_string()),
        ));
    let fixture = TestFixture::with_fetcher(fetcher);

    let response = fixture
        .download_and_wait(json!({ "playlist_url": "https://example.com" }))
        .await;
    let job_id = response.body["job_id"].as_str().unwrap();

    let progress = fixture.get(&format!("/progress/{}", job_id)).await;
    assert_eq!(progress.body["status"], "error");

    let result = fixture.get(&format!("/download/result/{}", job_id)).await;
    assert_status!(result, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        result.body["detail"],
        "yt-dlp exited with code 1: ERROR: Unsupported URL"
    );
}

#[tokio::test]
async fn test_download_rejects_empty_url() {
    let fixture = TestFixture::new();

    let response = fixture.post("/download", json!({ "playlist_url": "  " })).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["detail"].is_string());
    assert_eq!(fixture.fetcher.fetch_count().await, 0);
}

#[tokio::test]
async fn test_download_rejects_malformed_body() {
    let fixture = TestFixture::new();

    let response = fixture.post_raw("/download", "{not json").await;
    assert!(response.status.is_client_error());

    let response = fixture.post("/download", json!({ "album": {} })).await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_unknown_job_progress_and_result() {
    let fixture = TestFixture::new();
    let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    let progress = fixture.get(&format!("/progress/{}", id)).await;
    assert_status!(progress, StatusCode::OK);
    assert_eq!(progress.body["status"], "unknown");
    assert_eq!(progress.body["current"], 0);
    assert_eq!(progress.body["total"], 0);

    let result = fixture.get(&format!("/download/result/{}", id)).await;
    assert_status!(result, StatusCode::NOT_FOUND);
    assert_eq!(result.body["detail"], "job_id not found");
}

// =============================================================================
// Finalize and Archive Download
// =============================================================================

/// Runs a 3-track job and returns its id and manifest.
async fn completed_job(fixture: &TestFixture) -> (String, Vec<Value>) {
    let response = fixture.download_and_wait(download_body()).await;
    let job_id = response.body["job_id"].as_str().unwrap().to_string();
    let result = fixture.get(&format!("/download/result/{}", job_id)).await;
    let tracks = result.body["tracks"].as_array().unwrap().clone();
    (job_id, tracks)
}

#[tokio::test]
async fn test_finalize_and_download_archive() {
    let fixture = TestFixture::with_fetcher(playlist_fetcher(3));
    let (job_id, tracks) = completed_job(&fixture).await;

    let reordered = vec![tracks[2].clone(), tracks[0].clone(), tracks[1].clone()];
    let response = fixture
        .post(
            "/finalize",
            json!({
                "job_id": job_id,
                "album": { "title": "Road Trip", "artist": "The Band", "year": "1999" },
                "ordered_tracks": reordered,
            }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["ok"], true);
    assert_eq!(response.body["count"], 3);
    let zip_url = response.body["zip_url"].as_str().unwrap();
    assert_eq!(zip_url, "/download/The%20Band%20-%20Road%20Trip.zip");

    let writes = fixture.tagger.recorded_writes().await;
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0].tags.title, "Track 3");
    assert_eq!(writes[0].tags.track_number, 1);
    assert_eq!(writes[2].tags.title, "Track 2");
    assert_eq!(writes[2].tags.artist.as_deref(), Some("The Band"));

    let job_dir = fixture.state.jobs().job_dir(&job_id).unwrap();
    assert!(job_dir.join("01 - Track 3.mp3").is_file());
    assert!(job_dir.join("02 - Track 1.mp3").is_file());
    assert!(job_dir.join("03 - Track 2.mp3").is_file());

    let archive = fixture.get_raw(zip_url).await;
    assert_eq!(archive.status, StatusCode::OK);
    assert!(archive.body.starts_with(b"PK"));
    let disposition = archive.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("filename*=UTF-8''The%20Band%20-%20Road%20Trip.zip"));
}

#[tokio::test]
async fn test_finalize_unknown_job_is_404() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/finalize",
            json!({
                "job_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "ordered_tracks": [],
            }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert_eq!(response.body["detail"], "job_id not found");

    let response = fixture
        .post("/finalize", json!({ "job_id": "../..", "ordered_tracks": [] }))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_finalize_missing_file_is_400() {
    let fixture = TestFixture::with_fetcher(playlist_fetcher(2));
    let (job_id, tracks) = completed_job(&fixture).await;

    std::fs::remove_file(tracks[1]["path"].as_str().unwrap()).unwrap();

    let response = fixture
        .post(
            "/finalize",
            json!({ "job_id": job_id, "album": { "title": "X" }, "ordered_tracks": tracks }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["detail"]
        .as_str()
        .unwrap()
        .starts_with("missing file"));
    assert!(!fixture.out_dir().join("X.zip").exists());
}

#[tokio::test]
async fn test_finalize_invalid_cover_is_400() {
    let fixture = TestFixture::with_fetcher(playlist_fetcher(1));
    let (job_id, tracks) = completed_job(&fixture).await;

    let response = fixture
        .post(
            "/finalize",
            json!({
                "job_id": job_id,
                "album": { "title": "X" },
                "ordered_tracks": tracks,
                "cover_base64": "%%% not base64 %%%",
            }),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Invalid cover image"));
    assert_eq!(fixture.tagger.write_count().await, 0);
}

#[tokio::test]
async fn test_finalize_tagging_failure_is_500() {
    let fixture = TestFixture::with_fetcher(playlist_fetcher(2));
    let (job_id, tracks) = completed_job(&fixture).await;
    fixture.tagger.fail_on_call(0).await;

    let response = fixture
        .post(
            "/finalize",
            json!({ "job_id": job_id, "album": { "title": "X" }, "ordered_tracks": tracks }),
        )
        .await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["detail"].is_string());
}

#[tokio::test]
async fn test_archive_download_rejects_bad_names() {
    let fixture = TestFixture::new();
    std::fs::create_dir_all(fixture.out_dir()).unwrap();
    std::fs::write(fixture.temp_dir.path().join("secret.zip"), b"PK").unwrap();

    for path in [
        "/download/missing.zip",
        "/download/..%2Fsecret.zip",
        "/download/%2E%2E",
        "/download/a%5Csecret.zip",
    ] {
        let response = fixture.get(path).await;
        assert_status!(response, StatusCode::NOT_FOUND);
        assert_eq!(response.body["detail"], "not found");
    }
}
