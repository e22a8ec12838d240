//! Client construction from configuration and transport error mapping.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gaply_gateway::config::Config;
use gaply_gateway::error::ClientError;
use gaply_gateway::{OpenAlexClient, UnpaywallClient, WorkerClient};

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::for_testing(&format!("{}/", server.uri()));
    let page = OpenAlexClient::new(&config).unwrap().search_works("x", 1).await.unwrap();
    assert!(page.results.is_empty());
    assert_eq!(page.meta.count, 0);

    let worker = WorkerClient::new(&config).unwrap();
    assert_eq!(worker.base_url(), server.uri());
}

#[tokio::test]
async fn test_query_is_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("search", "C++ & \"memory safety\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::for_testing(&server.uri());
    OpenAlexClient::new(&config).unwrap().search_works("C++ & \"memory safety\"", 50).await.unwrap();
}

#[tokio::test]
async fn test_search_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = Config::for_testing(&server.uri());
    config.search_timeout = Duration::from_millis(200);

    let err = OpenAlexClient::new(&config).unwrap().search_works("slow", 1).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_unpaywall_prefixed_doi() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/10.1038/nature12373"))
        .and(query_param("email", "test@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_oa": true,
            "best_oa_location": "https://oa.example/nature12373.pdf"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = UnpaywallClient::new(&Config::for_testing(&server.uri())).unwrap();
    for doi in ["DOI:10.1038/nature12373", "https://DOI.org/10.1038/nature12373"] {
        let info = client.lookup(doi).await.unwrap();
        assert!(info.is_oa);
        assert_eq!(info.best_url(), Some("https://oa.example/nature12373.pdf"));
    }
}

#[tokio::test]
async fn test_unpaywall_unknown_doi() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/10.0/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": true})))
        .mount(&server)
        .await;

    let client = UnpaywallClient::new(&Config::for_testing(&server.uri())).unwrap();
    let err = client.lookup("10.0/missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let config = Config::for_testing(&server.uri());
    let err = OpenAlexClient::new(&config).unwrap().search_works("x", 1).await.unwrap_err();
    match err {
        ClientError::UnexpectedStatus { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_client_debug_omits_secrets() {
    let config = Config::for_testing("http://127.0.0.1:9");
    let debug = format!(
        "{:?} {:?} {:?}",
        config,
        UnpaywallClient::new(&config).unwrap(),
        gaply_gateway::StorageClient::new(&config).unwrap()
    );

    assert!(!debug.contains(&config.jwt_secret));
    assert!(!debug.contains(&config.supabase_service_key));
    assert!(debug.contains("has_unpaywall_email: true"));
}
