use recommendation_service::clients::{EventsClient, SimilarityClient};
use recommendation_service::models::{DefaultRecord, PersonalRecord, SimilarItem};
use recommendation_service::services::OfflineSnapshot;
use recommendation_service::{
    AppError, EventHistory, OfflineCatalog, RecommendationService, SimilarityLookup,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_events_client_round_trip_params() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/put"))
        .and(query_param("user_id", "7"))
        .and(query_param("item_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .and(query_param("user_id", "7"))
        .and(query_param("k", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": [42, 41, 40, 39]})))
        .mount(&server)
        .await;

    let client = EventsClient::new(server.uri(), Duration::from_secs(1)).unwrap();
    client.record_event(7, 42).await.unwrap();

    // Over-long responses are capped at k
    assert_eq!(client.fetch_recent(7, 3).await.unwrap(), vec![42, 41, 40]);
}

#[tokio::test]
async fn test_events_client_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = EventsClient::new(server.uri(), Duration::from_secs(1)).unwrap();
    let err = client.fetch_recent(1, 3).await.unwrap_err();
    assert!(matches!(err, AppError::DependencyUnavailable(_)));
}

#[tokio::test]
async fn test_similarity_client_enforces_order_and_k() {
    let server = MockServer::start().await;

    // Table order, unsorted, with a duplicate candidate
    Mock::given(method("POST"))
        .and(path("/similar_items"))
        .and(query_param("item_id", "100"))
        .and(query_param("k", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item_id_2": [5, 6, 7, 5, 8],
            "score": [0.1, 0.9, 0.5, 0.95, 0.5]
        })))
        .mount(&server)
        .await;

    let client = SimilarityClient::new(server.uri(), Duration::from_secs(1)).unwrap();
    let items = client.fetch_similar(100, 3).await.unwrap();

    assert_eq!(
        items,
        vec![
            SimilarItem { item_id: 5, score: 0.95 },
            SimilarItem { item_id: 6, score: 0.9 },
            SimilarItem { item_id: 7, score: 0.5 },
        ]
    );
}

#[tokio::test]
async fn test_similarity_client_signed_zero_keeps_response_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/similar_items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item_id_2": [3, 4, 5],
            "score": [-0.0, 0.0, 0.2]
        })))
        .mount(&server)
        .await;

    let client = SimilarityClient::new(server.uri(), Duration::from_secs(1)).unwrap();
    let ids: Vec<i64> = client
        .fetch_similar(1, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.item_id)
        .collect();

    assert_eq!(ids, vec![5, 3, 4]);
}

#[tokio::test]
async fn test_similarity_client_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/similar_items"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"item_id_2": [1], "score": [0.5]}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = SimilarityClient::new(server.uri(), Duration::from_millis(50)).unwrap();
    let err = client.fetch_similar(1, 10).await.unwrap_err();
    assert!(matches!(err, AppError::Timeout(_)));
}

#[tokio::test]
async fn test_blend_survives_remote_similarity_outage() {
    let events = MockServer::start().await;
    let features = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": [11, 12]})))
        .mount(&events)
        .await;

    Mock::given(method("POST"))
        .and(path("/similar_items"))
        .and(query_param("item_id", "11"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&features)
        .await;

    Mock::given(method("POST"))
        .and(path("/similar_items"))
        .and(query_param("item_id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item_id_2": [70],
            "score": [0.8]
        })))
        .mount(&features)
        .await;

    let catalog = OfflineCatalog::new();
    catalog
        .load(OfflineSnapshot::Personal(vec![
            PersonalRecord { user_id: 1, item_id: 1, rank: 1 },
            PersonalRecord { user_id: 1, item_id: 2, rank: 2 },
        ]))
        .unwrap();
    catalog
        .load(OfflineSnapshot::Default(vec![DefaultRecord { item_id: 9, rank: 1 }]))
        .unwrap();

    let timeout = Duration::from_millis(500);
    let service = RecommendationService::new(
        Arc::new(catalog),
        Arc::new(EventsClient::new(events.uri(), timeout).unwrap()),
        Arc::new(SimilarityClient::new(features.uri(), timeout).unwrap()),
        timeout,
    );

    assert!(service.is_ready());
    assert_eq!(service.online_recs(1, 10).await, vec![70]);
    assert_eq!(service.blended_recs(1, 10).await.unwrap(), vec![1, 70, 2]);
}

#[tokio::test]
async fn test_blend_survives_unreachable_events_service() {
    // Nothing listens on port 9
    let timeout = Duration::from_millis(200);
    let catalog = OfflineCatalog::new();
    catalog.load(OfflineSnapshot::Personal(Vec::new())).unwrap();
    catalog
        .load(OfflineSnapshot::Default(vec![
            DefaultRecord { item_id: 9, rank: 1 },
            DefaultRecord { item_id: 8, rank: 2 },
        ]))
        .unwrap();

    let features = MockServer::start().await;
    let service = RecommendationService::new(
        Arc::new(catalog),
        Arc::new(EventsClient::new("http://127.0.0.1:9", timeout).unwrap()),
        Arc::new(SimilarityClient::new(features.uri(), timeout).unwrap()),
        timeout,
    );

    assert_eq!(service.blended_recs(5, 10).await.unwrap(), vec![9, 8]);
    assert!(service.record_event(5, 1).await.is_err());
}
