use grandview_listings::gateways::{
    AuthGateway, AuthStatus, PropertyStore, StoreOptions, SupabaseAuth, SupabaseStore,
};
use grandview_listings::listings::ListingRepository;
use grandview_listings::{AuthError, Category, ListingError, PropertyDraft, PropertyPatch, StoreError};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "anon-key";

fn row(id: i64, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Listing {}", id),
        "price": 450000,
        "description": "Sample",
        "address": "9 Birch Ln",
        "city": "Madison",
        "beds": 3,
        "baths": 2.5,
        "sqft": 1800,
        "latitude": 43.07,
        "longitude": -89.4,
        "imageUrl": "https://example.com/9.jpg",
        "category": category,
        "featured": false
    })
}

fn store(server: &MockServer) -> SupabaseStore {
    SupabaseStore::new(StoreOptions::new(server.uri(), KEY)).unwrap()
}

#[tokio::test]
async fn select_all_sends_api_key_and_decodes_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/properties"))
        .and(query_param("select", "*"))
        .and(header("apikey", KEY))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "sales"), row(2, "rent")])))
        .mount(&server)
        .await;

    let rows = store(&server).select_all().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "1");
    assert_eq!(rows[1].category, Category::Rent);
}

#[tokio::test]
async fn select_by_id_empty_result_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/properties"))
        .and(query_param("id", "eq.missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = ListingRepository::new(Arc::new(store(&server)));
    assert!(repo.fetch_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn server_error_is_a_read_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/properties"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let repo = ListingRepository::new(Arc::new(store(&server)));
    match repo.fetch_all().await {
        Err(ListingError::Read(StoreError::Api { status, message })) => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(repo.fetch_all_or_empty().await.is_empty());
}

#[tokio::test]
async fn insert_posts_camel_case_draft() {
    let server = MockServer::start().await;
    let draft = PropertyDraft {
        title: "Listing 7".to_string(),
        description: "Sample".to_string(),
        address: "9 Birch Ln".to_string(),
        city: "Madison".to_string(),
        ..PropertyDraft::default()
    };

    Mock::given(method("POST"))
        .and(path("/rest/v1/properties"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([draft])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row(7, "sales")])))
        .mount(&server)
        .await;

    let created = store(&server).insert(&draft).await.unwrap();
    assert_eq!(created.id, "7");
}

#[tokio::test]
async fn insert_schema_mismatch_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/properties"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"message":"Could not find the 'externalListingUrl' column"}"#,
        ))
        .mount(&server)
        .await;

    let repo = ListingRepository::new(Arc::new(store(&server)));
    let err = repo.create(&PropertyDraft::default()).await.unwrap_err();
    assert!(matches!(err, ListingError::Write(StoreError::Api { status: 400, .. })));
}

#[tokio::test]
async fn partial_update_sends_only_supplied_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/properties"))
        .and(query_param("id", "eq.3"))
        .and(body_json(json!({"price": 500000.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(3, "sales")])))
        .mount(&server)
        .await;

    let patch = PropertyPatch {
        price: Some(500_000.0),
        ..PropertyPatch::default()
    };
    let updated = store(&server).update("3", &patch).await.unwrap();
    assert_eq!(updated.map(|p| p.id), Some("3".to_string()));
}

#[tokio::test]
async fn delete_reports_whether_a_row_went_away() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/properties"))
        .and(query_param("id", "eq.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(3, "sales")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let repo = ListingRepository::new(Arc::new(store(&server)));
    assert!(repo.remove("3").await);
    assert!(!repo.remove("3").await);
}

#[tokio::test]
async fn authorized_store_writes_with_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({"email": "admin@grandview.com", "password": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-123",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-1",
            "user": {"id": "u-1", "email": "admin@grandview.com"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/properties"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row(1, "sales")])))
        .mount(&server)
        .await;

    let auth = SupabaseAuth::new(StoreOptions::new(server.uri(), KEY)).unwrap();
    let session = auth.sign_in("admin@grandview.com", "password").await.unwrap();
    assert!(auth.is_authenticated());
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));

    let admin_store = store(&server).authorized(&session);
    assert!(admin_store.delete("1").await.unwrap());
}

#[tokio::test]
async fn sign_in_rejection_and_verify_states() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(body_json(json!({"email": "admin@grandview.com", "password": "wrong"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(body_json(json!({"email": "admin@grandview.com", "password": "password"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "jwt-stale",
            "expires_in": 3600,
            "user": {"id": "u-1"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let auth = SupabaseAuth::new(StoreOptions::new(server.uri(), KEY)).unwrap();
    assert_eq!(auth.verify().await, AuthStatus::Anonymous);
    assert!(matches!(
        auth.sign_in("admin@grandview.com", "wrong").await,
        Err(AuthError::InvalidCredentials)
    ));

    let session = auth.sign_in("admin@grandview.com", "password").await.unwrap();
    assert_eq!(session.user.email, "admin@grandview.com");
    // Token is held locally but the service no longer accepts it
    assert!(auth.is_authenticated());
    assert_eq!(auth.verify().await, AuthStatus::Rejected);
    assert!(!auth.is_authenticated());
    assert!(auth.current_session().await.is_none());
}
