//! HTTP gateway adapter tests

use mdp_ingest::config::ApiConfig;
use mdp_ingest::source::{HttpMessageSource, MessageSource, SourceError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        max_retries: 1,
    }
}

#[tokio::test]
async fn fetch_parses_messages_and_media() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/chemed123/messages"))
        .and(query_param("after_id", "100"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 101,
                "text": "plain",
                "date": "2024-03-05T09:30:00Z"
            },
            {
                "id": 102,
                "text": null,
                "date": "2024-03-05T09:31:00Z",
                "media": { "url": "http://media.example/102", "ext": "jpg" }
            }
        ])))
        .mount(&server)
        .await;

    let source = HttpMessageSource::new(&api_for(&server)).unwrap();
    let messages = source.fetch("chemed123", 100, 50).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, 101);
    assert_eq!(messages[0].text.as_deref(), Some("plain"));
    assert!(messages[0].media.is_none());

    assert_eq!(messages[1].id, 102);
    assert_eq!(messages[1].text, None);
    let media = messages[1].media.as_ref().unwrap();
    assert_eq!(media.url, "http://media.example/102");
    assert_eq!(media.ext, "jpg");
}

#[tokio::test]
async fn fetch_enforces_window_and_ordering_locally() {
    let server = MockServer::start().await;
    // Upstream replies out of order, with a duplicate, and with an id at or
    // below the cursor; the adapter must repair all of it.
    Mock::given(method("GET"))
        .and(path("/channels/chemed123/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 105, "text": "e", "date": "2024-03-05T09:34:00Z" },
            { "id": 103, "text": "c", "date": "2024-03-05T09:32:00Z" },
            { "id": 100, "text": "stale", "date": "2024-03-05T09:00:00Z" },
            { "id": 103, "text": "c-dup", "date": "2024-03-05T09:32:00Z" },
            { "id": 104, "text": "d", "date": "2024-03-05T09:33:00Z" }
        ])))
        .mount(&server)
        .await;

    let source = HttpMessageSource::new(&api_for(&server)).unwrap();
    let messages = source.fetch("chemed123", 100, 2).await.unwrap();

    let ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![103, 104]);
}

#[tokio::test]
async fn fetch_maps_not_found_to_unknown_channel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/ghost/messages"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = HttpMessageSource::new(&api_for(&server)).unwrap();
    let err = source.fetch("ghost", 0, 10).await.unwrap_err();
    assert!(matches!(err, SourceError::UnknownChannel(id) if id == "ghost"));
}

#[tokio::test]
async fn fetch_maps_too_many_requests_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/chemed123/messages"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let source = HttpMessageSource::new(&api_for(&server)).unwrap();
    let err = source.fetch("chemed123", 0, 10).await.unwrap_err();
    assert!(matches!(err, SourceError::RateLimited));
}

#[tokio::test]
async fn fetch_surfaces_other_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/chemed123/messages"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpMessageSource::new(&api_for(&server)).unwrap();
    let err = source.fetch("chemed123", 0, 10).await.unwrap_err();
    assert!(matches!(err, SourceError::Status(503)));
}

#[tokio::test]
async fn fetch_empty_batch_means_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/chemed123/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let source = HttpMessageSource::new(&api_for(&server)).unwrap();
    let messages = source.fetch("chemed123", 999, 10).await.unwrap();
    assert!(messages.is_empty());
}
