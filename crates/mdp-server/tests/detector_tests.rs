//! Inference client tests

use mdp_server::detect::{DetectConfig, DetectError, Detector, HttpDetector};
use serde_json::json;
use wiremock::matchers::{body_bytes, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> DetectConfig {
    DetectConfig {
        inference_url: format!("{}/detect", server.uri()),
        timeout_secs: 5,
        ..DetectConfig::default()
    }
}

#[tokio::test]
async fn detector_posts_image_bytes_and_parses_boxes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect"))
        .and(body_bytes(b"fake-jpeg".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "x_min": 1.0,
                "y_min": 2.0,
                "x_max": 30.0,
                "y_max": 40.0,
                "confidence": 0.87,
                "label": "pill bottle"
            }
        ])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("101.jpg");
    std::fs::write(&image, b"fake-jpeg").unwrap();

    let detector = HttpDetector::new(&config_for(&server)).unwrap();
    let boxes = detector.detect(&image).await.unwrap();

    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].label, "pill bottle");
    assert_eq!(boxes[0].confidence, 0.87);
}

#[tokio::test]
async fn detector_surfaces_backend_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("101.jpg");
    std::fs::write(&image, b"fake-jpeg").unwrap();

    let detector = HttpDetector::new(&config_for(&server)).unwrap();
    let err = detector.detect(&image).await.unwrap_err();
    assert!(matches!(err, DetectError::Status(500)));
}

#[tokio::test]
async fn detector_fails_on_missing_image() {
    let server = MockServer::start().await;
    let detector = HttpDetector::new(&config_for(&server)).unwrap();

    let err = detector
        .detect(std::path::Path::new("/nonexistent/101.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, DetectError::Io(_)));
}
