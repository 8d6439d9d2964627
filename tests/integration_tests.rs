//! Integration tests for Vinedex
//!
//! These tests drive the public client against a local mock HTTP server to
//! verify the full request/response path: URL composition, pagination,
//! rate-limit pausing, and response mapping.

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vinedex::comicvine::reference_id;
use vinedex::{ComicVineClient, HarvestConfig, HarvestError};

fn test_config(server: &MockServer) -> HarvestConfig {
    let mut config = HarvestConfig::new("OICU812");
    config.base_url = server.uri();
    config
}

fn volume_body(offset: u64, total: u64, ids: &[u64]) -> serde_json::Value {
    json!({
        "offset": offset,
        "number_of_page_results": ids.len(),
        "number_of_total_results": total,
        "results": ids.iter().map(|id| json!({
            "id": id,
            "name": format!("Volume {}", id),
            "start_year": "1999",
            "count_of_issues": 12,
            "publisher": { "name": "Image" },
            "image": { "original_url": format!("http://img.example.com/{}.jpg", id) }
        })).collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn harvests_a_single_page_of_volumes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/volumes/"))
        .and(query_param("api_key", "OICU812"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body(0, 2, &[129, 130])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ComicVineClient::new(test_config(&server)).unwrap();
    let volumes = client.get_volumes("Astro City", 0).await.unwrap();

    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes[0].id, "129");
    assert_eq!(volumes[0].publisher, "Image");
    assert_eq!(volumes[0].image_url, "http://img.example.com/129.jpg");
}

#[tokio::test]
async fn paginates_until_the_upstream_is_exhausted() {
    let server = MockServer::start().await;
    // Second and later pages carry an explicit page parameter; the first
    // never does.
    Mock::given(method("GET"))
        .and(path("/api/volumes/"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(volume_body(5, 7, &[6, 7])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/volumes/"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(volume_body(0, 7, &[1, 2, 3, 4, 5])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ComicVineClient::new(test_config(&server)).unwrap();
    let volumes = client.get_volumes("Astro City", 0).await.unwrap();

    let ids: Vec<&str> = volumes.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7"]);
}

#[tokio::test]
async fn caps_the_harvest_at_max_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/volumes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body(0, 7, &[1, 2, 3, 4, 5])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ComicVineClient::new(test_config(&server)).unwrap();
    let volumes = client.get_volumes("Astro City", 3).await.unwrap();

    assert_eq!(volumes.len(), 3);
}

#[tokio::test]
async fn upstream_error_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/volumes/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ComicVineClient::new(test_config(&server)).unwrap();
    let result = client.get_volumes("Astro City", 0).await;

    assert!(matches!(result, Err(HarvestError::Api(_))));
}

#[tokio::test]
async fn unparseable_body_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/volumes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("This is not JSON"))
        .mount(&server)
        .await;

    let client = ComicVineClient::new(test_config(&server)).unwrap();
    let result = client.get_volumes("Astro City", 0).await;

    assert!(matches!(result, Err(HarvestError::EmptyResponse)));
}

#[tokio::test]
async fn resolves_a_story_with_issues_in_reading_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/story_arc/4045-54894/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {
                "id": 54894,
                "name": "The Ultron Initiative",
                "publisher": { "name": "Marvel" },
                "description": "Ultron strikes.",
                "issues": [
                    { "id": 900, "name": "Part 1" },
                    { "id": 100, "name": "Part 2" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    for (id, series) in [(900, "Mighty Avengers"), (100, "Iron Man")] {
        Mock::given(method("GET"))
            .and(path(format!("/api/issue/4000-{}/", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {
                    "id": id,
                    "issue_number": "1",
                    "cover_date": "2007-11-01",
                    "volume": { "id": 1, "name": series }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = ComicVineClient::new(test_config(&server)).unwrap();
    let story = client.get_story_detail("54894").await.unwrap();

    assert_eq!(story.reference_id, "54894");
    assert_eq!(story.publisher, "Marvel");
    assert_eq!(story.issues.len(), 2);
    assert_eq!(story.issues[0].reading_order, 1);
    assert_eq!(story.issues[0].name, "Mighty Avengers");
    assert_eq!(story.issues[1].reading_order, 2);
    assert_eq!(story.issues[1].name, "Iron Man");
}

#[tokio::test]
async fn missing_api_key_fails_without_touching_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volume_body(0, 1, &[1])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.api_key = String::new();
    let client = ComicVineClient::new(config).unwrap();

    let result = client.get_volumes("Astro City", 0).await;

    assert!(matches!(result, Err(HarvestError::MissingConfiguration(_))));
}

#[test]
fn extracts_reference_ids_from_known_catalog_addresses() {
    assert_eq!(
        reference_id(
            "https://comicvine.gamespot.com/action-comics-futures-end-1-crossroads/4000-463937/"
        ),
        Some("463937".to_string())
    );
    assert_eq!(reference_id("https://example.com/title/4000-463937/"), None);
}
