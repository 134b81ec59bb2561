//! Integration tests for the HTTP content source.

use headless_blog::config::SourceConfig;
use headless_blog::content::{PostKey, WORDS_PER_MINUTE};
use headless_blog::pagination::{LoadMore, PaginationController};
use headless_blog::source::{ContentSource, PrismicSource, SourceError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MASTER_REF: &str = "YF0lMRIAACIAYhmH";

fn source_for(server: &MockServer, token: Option<&str>) -> PrismicSource {
    let config = SourceConfig {
        endpoint: format!("{}/api/v2", server.uri()),
        access_token: token.map(str::to_string),
        document_type: "posts".to_string(),
    };
    PrismicSource::new(&config).expect("Failed to build source")
}

fn document(uid: &str, title: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-25T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": format!("{} subtitle", title),
            "author": "Joseph Oliveira",
            "banner": { "url": "https://images.prismic.io/banner.png" },
            "content": [{
                "heading": "Proin et varius",
                "body": [
                    { "type": "paragraph", "text": "Nullam dolor sapien, vulputate eu diam at", "spans": [
                        { "start": 0, "end": 6, "type": "strong" }
                    ]}
                ]
            }]
        }
    })
}

async fn mount_api_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [
                { "id": "preview", "ref": "preview-ref", "isMasterRef": false },
                { "id": "master", "ref": MASTER_REF, "isMasterRef": true }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_first_page_and_load_more() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    let next_page = format!("{}/api/v2/documents/search?page=2&pageSize=1", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("ref", MASTER_REF))
        .and(query_param("q", "[[at(document.type,\"posts\")]]"))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "next_page": next_page,
            "results": [document("first-post", "First")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "next_page": null,
            "results": [document("second-post", "Second")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server, None);
    let first = source.query_first_page(1).await.expect("first page");
    assert_eq!(first.items.len(), 1);
    assert!(first.next_cursor.is_some());

    let mut controller = PaginationController::new(&source, first);
    assert_eq!(controller.load_more().await.unwrap(), LoadMore::Appended(1));
    assert_eq!(controller.load_more().await.unwrap(), LoadMore::Exhausted);

    let keys: Vec<&str> = controller
        .state()
        .items
        .iter()
        .map(|p| p.key.as_str())
        .collect();
    assert_eq!(keys, vec!["first-post", "second-post"]);
    assert!(!controller.state().has_more());
}

#[tokio::test]
async fn test_lookup_by_key() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("q", "[[at(my.posts.uid,\"como-utilizar-hooks\")]]"))
        .and(query_param("access_token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_page": null,
            "results": [document("como-utilizar-hooks", "Como utilizar Hooks")]
        })))
        .mount(&server)
        .await;

    let source = source_for(&server, Some("secret"));
    let key = PostKey::parse("como-utilizar-hooks").unwrap();
    let post = source.query_by_key(&key).await.expect("post");

    assert_eq!(post.title, "Como utilizar Hooks");
    assert_eq!(post.banner_url, "https://images.prismic.io/banner.png");
    assert_eq!(post.content.len(), 1);
    assert_eq!(
        headless_blog::content::estimate_reading_time(&post.content),
        10usize.div_ceil(WORDS_PER_MINUTE)
    );
}

#[tokio::test]
async fn test_missing_key_is_not_found() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_page": null,
            "results": []
        })))
        .mount(&server)
        .await;

    let source = source_for(&server, None);
    let err = source
        .query_by_key(&PostKey::parse("missing").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err, SourceError::NotFound("missing".to_string()));
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = source_for(&server, None);
    let err = source.query_first_page(1).await.unwrap_err();
    assert!(matches!(err, SourceError::Unavailable(_)));
}

#[tokio::test]
async fn test_failed_next_page_keeps_state() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    let next_page = format!("{}/api/v2/documents/search?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_page": next_page,
            "results": [document("first-post", "First")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = source_for(&server, None);
    let first = source.query_first_page(1).await.unwrap();
    let mut controller = PaginationController::new(&source, first);
    let before = controller.state().clone();

    assert!(controller.load_more().await.is_err());
    assert_eq!(controller.state(), &before);
    assert!(controller.state().has_more());
}

#[tokio::test]
async fn test_malformed_payload_is_decode_error() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = source_for(&server, None);
    let err = source.query_first_page(1).await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}
