//! HTTP-level tests for the Quotable backend
//!
//! A tiny stub server on `127.0.0.1:0` serves canned responses, one per
//! connection, and records each request line. This checks the request
//! shape and status handling without touching the public service.

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use thought_core::backend::DEFAULT_USER_AGENT;
use thought_core::{
    BackendError, FetchError, FileStore, QuotableBackend, QuoteBackend, QuoteFetcher,
    TagCacheManager, TagSource, TagStore, QUOTE_FETCH_ERROR_MESSAGE,
};

const QUOTE_BODY: &str = r#"[{"_id":"abc","content":"Know thyself.","author":"Socrates","tags":["Wisdom"],"length":13}]"#;

const TAGS_BODY: &str = r#"[
    {"_id":"1","name":"Love","slug":"love","quoteCount":3},
    {"_id":"2","name":"Wisdom","slug":"wisdom","quoteCount":5},
    {"_id":"3","name":"love","slug":"love-2","quoteCount":1}
]"#;

/// Serve `responses` in order and record each request line
async fn serve(responses: Vec<(u16, &'static str)>) -> (Url, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            log.lock()
                .push(request.lines().next().unwrap_or_default().to_string());

            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
    });

    let url = Url::parse(&format!("http://{addr}")).unwrap();
    (url, seen)
}

fn backend(url: Url) -> QuotableBackend {
    QuotableBackend::new(url, DEFAULT_USER_AGENT, None).unwrap()
}

#[tokio::test]
async fn test_random_quote_with_tag() {
    let (url, seen) = serve(vec![(200, QUOTE_BODY)]).await;

    let quote = backend(url).random_quote(Some("wisdom")).await.unwrap();

    assert_eq!(quote.id, "abc");
    assert_eq!(quote.content, "Know thyself.");
    assert_eq!(quote.author, "Socrates");
    assert_eq!(quote.tags, vec!["Wisdom".to_string()]);
    assert_eq!(
        *seen.lock(),
        vec!["GET /quotes/random?tags=wisdom HTTP/1.1".to_string()]
    );
}

#[tokio::test]
async fn test_random_quote_without_tag() {
    let (url, seen) = serve(vec![(200, QUOTE_BODY)]).await;

    backend(url).random_quote(None).await.unwrap();

    assert_eq!(*seen.lock(), vec!["GET /quotes/random HTTP/1.1".to_string()]);
}

#[tokio::test]
async fn test_server_error_is_status() {
    let (url, _seen) = serve(vec![(500, r#"{"message":"boom"}"#)]).await;

    let err = backend(url).random_quote(None).await.unwrap_err();

    assert!(matches!(err, BackendError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_empty_array_is_failure() {
    let (url, _seen) = serve(vec![(200, "[]")]).await;

    let err = backend(url).random_quote(Some("nothing")).await.unwrap_err();

    assert!(matches!(err, BackendError::EmptyResponse { .. }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (url, _seen) = serve(vec![(200, r#"{"not":"an array"}"#)]).await;

    let err = backend(url).random_quote(None).await.unwrap_err();

    assert!(matches!(err, BackendError::Decode { .. }));
}

#[tokio::test]
async fn test_list_tags() {
    let (url, seen) = serve(vec![(200, TAGS_BODY)]).await;

    let tags = backend(url).list_tags().await.unwrap();

    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Love", "Wisdom", "love"]);
    assert_eq!(*seen.lock(), vec!["GET /tags HTTP/1.1".to_string()]);
}

#[tokio::test]
async fn test_tag_cache_round_trip_through_file_store() {
    // Only one response: a second remote call would never be answered
    let (url, seen) = serve(vec![(200, TAGS_BODY)]).await;
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(backend(url));

    let first = TagCacheManager::new(
        Arc::clone(&backend),
        Arc::new(FileStore::new(dir.path())),
        TagStore::new(),
    );
    assert_eq!(first.load_tags().await, Some(TagSource::Remote));
    assert_eq!(first.store().snapshot().tags, vec!["love", "wisdom"]);

    let raw = tokio::fs::read_to_string(dir.path().join("tagCache.json"))
        .await
        .unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["version"], 1);
    assert_eq!(record["tags"], serde_json::json!(["love", "wisdom"]));

    let second = TagCacheManager::new(
        Arc::clone(&backend),
        Arc::new(FileStore::new(dir.path())),
        TagStore::new(),
    );
    assert_eq!(second.load_tags().await, Some(TagSource::Cache));
    assert_eq!(second.store().snapshot().tags, vec!["love", "wisdom"]);
    assert_eq!(seen.lock().len(), 1);
}

#[tokio::test]
async fn test_failed_tagged_fetch_shows_fixed_message() {
    let (url, seen) = serve(vec![(503, "Service Unavailable")]).await;
    let fetcher = QuoteFetcher::new(Arc::new(backend(url)));

    let result = fetcher.fetch_quote(Some("wisdom".to_string())).await;

    assert!(matches!(
        result,
        Err(FetchError::Backend(BackendError::Status { status: 503, .. }))
    ));
    let state = fetcher.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(QUOTE_FETCH_ERROR_MESSAGE));
    assert_eq!(
        *seen.lock(),
        vec!["GET /quotes/random?tags=wisdom HTTP/1.1".to_string()]
    );
}
