//! Integration tests for the BioSpace HTTP API.
//!
//! Uses axum-test to exercise the handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use biospace::api::{AppState, HealthResponse, WELCOME_MESSAGE, WelcomeResponse, create_router};
use biospace::config::ApiConfig;
use biospace_core::RecordStore;
use serde_json::Value;
use std::io::Write;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

const DATASET: &str = "\
Title,Summary,Category,Organism,Impact,Link
Bone loss in microgravity,Mice lose bone mass during spaceflight,Physiology,Mouse,High,https://a
Root growth on the ISS,Arabidopsis roots bend without gravity,Botany,Arabidopsis,Medium,https://b
Cancer risk from radiation,Heavy ions raise tumour rates,Radiation Biology,Mouse,High,https://c
Gene expression in orbit,Transcriptome shifts in flight,Genomics,Human,Low,https://d
Muscle atrophy,Countermeasures reduce atrophy,physiology,Human,High,https://e
Plant cell walls,Lignin changes in microgravity,Botany,,NA,https://f
";

fn store() -> RecordStore {
    RecordStore::from_reader(DATASET.as_bytes()).unwrap()
}

/// Create a test server over the sample dataset with the shipped defaults.
fn create_test_server() -> TestServer {
    TestServer::new(create_router(AppState::new(store()), &ApiConfig::default())).unwrap()
}

fn titles(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["Title"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// ROOT AND HEALTH TESTS
// =============================================================================

#[tokio::test]
async fn test_root_welcome_message() {
    let server = create_test_server();

    let response = server.get("/").await;
    response.assert_status_ok();

    let body: WelcomeResponse = response.json();
    assert_eq!(body.message, WELCOME_MESSAGE);
}

#[tokio::test]
async fn test_health_reports_record_count() {
    let server = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
    assert_eq!(body.records, 6);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = create_test_server();

    let response = server.get("/api/nothing-here").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// EXPERIMENTS TESTS
// =============================================================================

#[tokio::test]
async fn test_experiments_returns_full_table_without_ids() {
    let server = create_test_server();

    let response = server.get("/api/experiments").await;
    response.assert_status_ok();

    let rows: Vec<Value> = response.json();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["Title"], "Bone loss in microgravity");
    assert_eq!(rows[0]["Link"], "https://a");
    assert!(rows.iter().all(|row| row.get("_id").is_none()));
}

#[tokio::test]
async fn test_experiments_normalizes_missing_values() {
    let server = create_test_server();

    let rows: Vec<Value> = server.get("/api/experiments").await.json();
    assert_eq!(rows[5]["Organism"], "");
    assert_eq!(rows[5]["Impact"], "");
}

// =============================================================================
// PUBLICATIONS TESTS
// =============================================================================

#[tokio::test]
async fn test_publications_defaults() {
    let server = create_test_server();

    let response = server.get("/api/publications").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total"], 6);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["results"].as_array().unwrap().len(), 6);

    let ids: Vec<u64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_publications_text_search_spans_title_and_summary() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("q", "  MICROGRAVITY ")
        .await
        .json();

    assert_eq!(body["total"], 2);
    assert_eq!(
        titles(&body),
        vec!["Bone loss in microgravity", "Plant cell walls"]
    );
}

#[tokio::test]
async fn test_publications_cancer_query() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("q", "cancer")
        .await
        .json();

    assert_eq!(body["total"], 1);
    assert_eq!(titles(&body), vec!["Cancer risk from radiation"]);
}

#[tokio::test]
async fn test_publications_category_alternatives() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("category", "botany, genomics")
        .await
        .json();

    assert_eq!(body["total"], 3);
    assert_eq!(
        titles(&body),
        vec![
            "Root growth on the ISS",
            "Gene expression in orbit",
            "Plant cell walls"
        ]
    );
}

#[tokio::test]
async fn test_publications_category_is_case_insensitive() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("category", "PHYSIOLOGY")
        .await
        .json();

    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_publications_combined_filters() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("organism", "mouse")
        .add_query_param("impact", "high")
        .await
        .json();

    assert_eq!(body["total"], 2);
    assert_eq!(
        titles(&body),
        vec!["Bone loss in microgravity", "Cancer risk from radiation"]
    );
}

#[tokio::test]
async fn test_publications_empty_filters_are_ignored() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("q", "")
        .add_query_param("category", " , ")
        .add_query_param("organism", "   ")
        .await
        .json();

    assert_eq!(body["total"], 6);
}

#[tokio::test]
async fn test_publications_pagination_window() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("offset", "2")
        .add_query_param("limit", "3")
        .await
        .json();

    assert_eq!(body["total"], 6);
    assert_eq!(body["offset"], 2);
    assert_eq!(body["limit"], 3);
    let ids: Vec<u64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_publications_offset_past_end_is_empty_page() {
    let server = create_test_server();

    let response = server
        .get("/api/publications")
        .add_query_param("offset", "100")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total"], 6);
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_publications_limit_zero() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("limit", "0")
        .await
        .json();

    assert_eq!(body["total"], 6);
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_publications_sort_is_case_insensitive_and_stable() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("sort_by", "Category")
        .await
        .json();

    // "Physiology" and "physiology" compare equal and keep load order.
    assert_eq!(
        titles(&body),
        vec![
            "Root growth on the ISS",
            "Plant cell walls",
            "Gene expression in orbit",
            "Bone loss in microgravity",
            "Muscle atrophy",
            "Cancer risk from radiation",
        ]
    );
}

#[tokio::test]
async fn test_publications_sort_happens_before_pagination() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications")
        .add_query_param("sort_by", "Title")
        .add_query_param("limit", "2")
        .await
        .json();

    assert_eq!(
        titles(&body),
        vec!["Bone loss in microgravity", "Cancer risk from radiation"]
    );
}

#[tokio::test]
async fn test_publications_unknown_sort_keeps_order() {
    let server = create_test_server();

    let response = server
        .get("/api/publications")
        .add_query_param("sort_by", "NoSuchColumn")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(titles(&body)[0], "Bone loss in microgravity");
    assert_eq!(titles(&body)[5], "Plant cell walls");
}

#[tokio::test]
async fn test_publications_repeat_queries_are_identical() {
    let server = create_test_server();

    let first: Value = server
        .get("/api/publications")
        .add_query_param("sort_by", "Impact")
        .await
        .json();
    let second: Value = server
        .get("/api/publications")
        .add_query_param("sort_by", "Impact")
        .await
        .json();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_publications_invalid_limit_is_400() {
    let server = create_test_server();

    let response = server
        .get("/api/publications")
        .add_query_param("limit", "ten")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_parameter");
    assert!(body["message"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_publications_negative_offset_is_400() {
    let server = create_test_server();

    let response = server
        .get("/api/publications")
        .add_query_param("offset", "-1")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("offset"));
}

#[tokio::test]
async fn test_publications_repeated_parameter_keeps_first_value() {
    let server = create_test_server();

    let response = server.get("/api/publications?q=bone&q=zzz").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(titles(&body), vec!["Bone loss in microgravity"]);
}

#[tokio::test]
async fn test_publications_repeated_bad_limit_is_json_400() {
    let server = create_test_server();

    let response = server.get("/api/publications?limit=x&limit=5").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_parameter");
}

#[tokio::test]
async fn test_publications_huge_limit_is_accepted() {
    let server = create_test_server();

    let response = server
        .get("/api/publications")
        .add_query_param("limit", "99999999999999999999")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total"], 6);
    assert_eq!(body["results"].as_array().unwrap().len(), 6);
}

// =============================================================================
// SINGLE PUBLICATION TESTS
// =============================================================================

#[tokio::test]
async fn test_publication_by_id() {
    let server = create_test_server();

    let response = server.get("/api/publications/2").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["_id"], 2);
    assert_eq!(body["Title"], "Cancer risk from radiation");
    assert_eq!(body["Link"], "https://c");
}

#[tokio::test]
async fn test_publication_ids_match_search_results() {
    let server = create_test_server();

    let page: Value = server
        .get("/api/publications")
        .add_query_param("q", "atrophy")
        .await
        .json();
    let hit = &page["results"][0];
    let id = hit["_id"].as_u64().unwrap();

    let record: Value = server.get(&format!("/api/publications/{}", id)).await.json();
    assert_eq!(&record, hit);
}

#[tokio::test]
async fn test_publication_out_of_range_is_404() {
    let server = create_test_server();

    for path in [
        "/api/publications/6",
        "/api/publications/-1",
        "/api/publications/abc",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["error"], "not_found", "{}", path);
    }
}

// =============================================================================
// STATS TESTS
// =============================================================================

#[tokio::test]
async fn test_stats_counts() {
    let server = create_test_server();

    let response = server.get("/api/publications/stats").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total_publications"], 6);
    assert_eq!(body["by_category"]["Botany"], 2);
    assert_eq!(body["by_category"]["Physiology"], 1);
    assert_eq!(body["by_category"]["physiology"], 1);
    assert_eq!(body["by_organism"]["Mouse"], 2);
    assert_eq!(body["by_organism"][""], 1);
    assert_eq!(body["by_impact"]["High"], 3);
}

#[tokio::test]
async fn test_stats_tables_sum_to_total() {
    let server = create_test_server();

    let body: Value = server.get("/api/publications/stats").await.json();
    let total = body["total_publications"].as_u64().unwrap();

    for table in ["by_category", "by_organism", "by_impact"] {
        let sum: u64 = body[table]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(sum, total, "{}", table);
    }
}

#[tokio::test]
async fn test_stats_ignore_query_parameters() {
    let server = create_test_server();

    let body: Value = server
        .get("/api/publications/stats")
        .add_query_param("category", "botany")
        .await
        .json();
    assert_eq!(body["total_publications"], 6);
}

// =============================================================================
// DATASET LOADING TESTS
// =============================================================================

#[tokio::test]
async fn test_server_over_file_dataset() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DATASET.as_bytes()).unwrap();

    let store = RecordStore::load(file.path()).unwrap();
    let router = create_router(AppState::new(store), &ApiConfig::default());
    let server = TestServer::new(router).unwrap();

    let body: Value = server.get("/api/publications/0").await.json();
    assert_eq!(body["Title"], "Bone loss in microgravity");
}

// =============================================================================
// CORS TESTS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let server = create_test_server();

    let response = server
        .get("/api/publications")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://explorer.example.org"),
        )
        .await;
    response.assert_status_ok();

    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .unwrap()
        .clone();
    assert_eq!(allowed, "*");
}

// =============================================================================
// DEFAULT CONFIGURATION TESTS
// =============================================================================

#[tokio::test]
async fn test_default_config_does_not_throttle_bursts() {
    let server = create_test_server();

    for _ in 0..150 {
        server.get("/api/publications").await.assert_status_ok();
    }
}

#[tokio::test]
async fn test_configured_rate_limit_rejects_excess() {
    let config = ApiConfig {
        rate_limit: 1,
        ..ApiConfig::default()
    };
    let server = TestServer::new(create_router(AppState::new(store()), &config)).unwrap();

    server.get("/health").await.assert_status_ok();
    server
        .get("/health")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}
