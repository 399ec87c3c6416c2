//! Integration test: real libcurl transport against a local HTTP server.
//!
//! Covers page fetch with retry, Referer propagation, redirects, status
//! handling and streamed download to disk.

mod common;

use std::time::Duration;

use acdl_core::config::AcdlConfig;
use acdl_core::downloader::{DownloadError, FileDownloader};
use acdl_core::fetch::PageFetcher;
use acdl_core::http::{CurlTransport, HttpError, Transport};
use acdl_core::resolver::{DownloadLinkResolver, DownloadTarget};
use acdl_core::retry::RetryPolicy;
use common::page_server::{self, Route};
use tempfile::tempdir;

const REFERER: &str = "http://scholar.google.com";

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        delay: Duration::from_millis(10),
    }
}

fn pdf_body() -> Vec<u8> {
    let mut body = b"%PDF-1.4\n".to_vec();
    body.extend((0u8..=255).cycle().take(100 * 1024));
    body.extend_from_slice(b"\n%%EOF\n");
    body
}

#[test]
fn fetch_sends_referer_and_follows_redirect() {
    let server = page_server::start(vec![
        ("/old/1/Paper", Route::redirect("/12345/Paper")),
        ("/12345/Paper", Route::ok("<html>page</html>")),
    ]);
    let transport = CurlTransport::default();
    let fetcher = PageFetcher::new(&transport, REFERER, fast_policy());

    let page = fetcher.fetch(&server.url("/old/1/Paper")).unwrap();
    assert_eq!(page.as_bytes(), b"<html>page</html>");

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.referer.as_deref() == Some(REFERER)));
}

#[test]
fn fetch_retries_transient_failures() {
    let server = page_server::start(vec![(
        "/1/Flaky",
        Route::ok("<html>ok</html>").failing_first(4),
    )]);
    let transport = CurlTransport::default();
    let fetcher = PageFetcher::new(&transport, REFERER, fast_policy());

    let page = fetcher.fetch(&server.url("/1/Flaky")).unwrap();
    assert_eq!(page.as_bytes(), b"<html>ok</html>");
    assert_eq!(server.hits("/1/Flaky"), 5);
}

#[test]
fn fetch_gives_up_after_max_attempts() {
    let server = page_server::start(vec![("/1/Gone", Route::status(404))]);
    let transport = CurlTransport::default();
    let fetcher = PageFetcher::new(&transport, REFERER, fast_policy());

    let err = fetcher.fetch(&server.url("/1/Gone")).unwrap_err();
    assert_eq!(err.attempts, 5);
    assert!(matches!(err.source, HttpError::Status(404)));
    assert_eq!(server.hits("/1/Gone"), 5);
}

#[test]
fn connection_refused_is_curl_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let transport = CurlTransport::default();
    let err = transport
        .get(&format!("http://127.0.0.1:{port}/x"), &Default::default())
        .unwrap_err();
    assert!(matches!(err, HttpError::Curl(_)));
}

#[test]
fn download_streams_file_to_disk() {
    let body = pdf_body();
    let server = page_server::start(vec![("/download/123456", Route::ok(body.clone()))]);
    let transport = CurlTransport::default();
    let dir = tempdir().unwrap();
    let path = dir.path().join("Paper.pdf");

    let target = DownloadTarget(server.url("/download/123456"));
    let n = FileDownloader::new(&transport, REFERER)
        .download(&target, &path)
        .unwrap();

    assert_eq!(n, body.len() as u64);
    assert_eq!(std::fs::read(&path).unwrap(), body);
    assert_eq!(
        server.requests()[0].referer.as_deref(),
        Some(REFERER),
        "download must carry the Referer too"
    );
}

#[test]
fn download_error_status_writes_nothing() {
    let server = page_server::start(vec![("/download/9", Route::status(403))]);
    let transport = CurlTransport::default();
    let dir = tempdir().unwrap();
    let path = dir.path().join("Paper.pdf");

    let err = FileDownloader::new(&transport, REFERER)
        .download(&DownloadTarget(server.url("/download/9")), &path)
        .unwrap_err();
    assert!(matches!(
        err,
        DownloadError::Transfer {
            source: HttpError::Status(403),
            ..
        }
    ));
    assert!(!path.exists());
}

#[test]
fn page_to_file_through_resolver() {
    let body = pdf_body();
    let server = page_server::start(vec![
        (
            "/98765/Some_Paper",
            Route::ok(
                r#"<html><body><a class="js-swp-download-button" href="https://www.academia.edu/attachments/555/download_file?st=abc">Download</a></body></html>"#,
            ),
        ),
        ("/dl/555", Route::ok(body.clone())),
    ]);
    let mut cfg = AcdlConfig::default();
    cfg.download_base = server.url("/dl");
    let transport = CurlTransport::from_config(&cfg);
    let dir = tempdir().unwrap();
    let path = dir.path().join("Some_Paper.pdf");

    let page = PageFetcher::from_config(&transport, &cfg)
        .fetch(&server.url("/98765/Some_Paper"))
        .unwrap();
    let target = DownloadLinkResolver::from_config(&cfg)
        .unwrap()
        .resolve(&page)
        .unwrap();
    assert_eq!(target.as_str(), server.url("/dl/555"));
    FileDownloader::new(&transport, &cfg.referer)
        .download(&target, &path)
        .unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), body);
}
