//! Integration tests for artifact provisioning against a live HTTP fixture
//!
//! Spins up a local axum server standing in for the remote artifact store and
//! drives the full download/cache/validate lifecycle through real sockets.

use axum::{http::StatusCode, routing::get, Router};
use smsguard_core::{Error, Label};
use smsguard_model::{ensure_present, ArtifactSpec, SpamModel, TreeNode};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn fixture_model() -> SpamModel {
    SpamModel {
        classifier: "decision tree".to_string(),
        vocabulary: vec!["free".to_string(), "prize".to_string()],
        tree: TreeNode::Split {
            feature: 0,
            threshold: 0.5,
            left: Box::new(TreeNode::Leaf { label: Label::Ham }),
            right: Box::new(TreeNode::Leaf { label: Label::Spam }),
        },
    }
}

/// Start a fixture artifact server; returns its address and a hit counter
/// for the valid-model route.
async fn start_fixture_server() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let model_json = serde_json::to_string(&fixture_model()).unwrap();

    let counted_hits = hits.clone();
    let app = Router::new()
        .route(
            "/model.joblib",
            get(move || {
                let hits = counted_hits.clone();
                let body = model_json.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    body
                }
            }),
        )
        .route(
            "/corrupt.joblib",
            get(|| async { "definitely not a serialized model" }),
        )
        .route(
            "/error.joblib",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, hits)
}

#[tokio::test]
async fn test_cold_start_downloads_exactly_once_then_caches() {
    let (addr, hits) = start_fixture_server().await;
    let dir = tempfile::tempdir().unwrap();

    let spec = ArtifactSpec::new(dir.path(), "model.joblib")
        .with_url(format!("http://{addr}/model.joblib"));

    // Cold start: one fetch, file lands in the cache.
    let path = ensure_present(&spec).await.unwrap();
    assert!(path.exists());
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // The cached artifact is immediately loadable.
    let model = SpamModel::load(&path).unwrap();
    assert_eq!(model.classifier, "decision tree");

    // Warm start: cache hit, no further network access.
    let again = ensure_present(&spec).await.unwrap();
    assert_eq!(again, path);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_success_status_is_fatal_and_leaves_no_file() {
    let (addr, _) = start_fixture_server().await;
    let dir = tempfile::tempdir().unwrap();

    let spec = ArtifactSpec::new(dir.path(), "model.joblib")
        .with_url(format!("http://{addr}/error.joblib"));

    let err = ensure_present(&spec).await.unwrap_err();
    assert!(matches!(err, Error::Provision(_)));
    assert!(!spec.path().exists(), "no partial artifact may remain");
}

#[tokio::test]
async fn test_missing_remote_artifact_is_fatal() {
    let (addr, _) = start_fixture_server().await;
    let dir = tempfile::tempdir().unwrap();

    let spec = ArtifactSpec::new(dir.path(), "model.joblib")
        .with_url(format!("http://{addr}/no-such-file.joblib"));

    let err = ensure_present(&spec).await.unwrap_err();
    assert!(matches!(err, Error::Provision(_)));
    assert!(!spec.path().exists());
}

#[tokio::test]
async fn test_corrupt_download_is_rejected_and_removed() {
    let (addr, _) = start_fixture_server().await;
    let dir = tempfile::tempdir().unwrap();

    let spec = ArtifactSpec::new(dir.path(), "model.joblib")
        .with_url(format!("http://{addr}/corrupt.joblib"));

    let err = ensure_present(&spec).await.unwrap_err();
    assert!(matches!(err, Error::Provision(_)));
    assert!(
        !spec.path().exists(),
        "a failed validation probe must not poison the cache"
    );
}

#[tokio::test]
async fn test_unreachable_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    // Port 9 (discard) is not listening on loopback.
    let spec =
        ArtifactSpec::new(dir.path(), "model.joblib").with_url("http://127.0.0.1:9/model.joblib");

    let err = ensure_present(&spec).await.unwrap_err();
    assert!(matches!(err, Error::Provision(_) | Error::Timeout));
    assert!(!spec.path().exists());
}
