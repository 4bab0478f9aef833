//! Tests driving the api through actix' test service, the way a client
//! would use it over the wire.

use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::test::{self, TestRequest};
use actix_web::web::{Data, JsonConfig};
use actix_web::App;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::server::handler::{
    create_friend_request, get_friends, get_users, health, register_account,
    respond_to_friend_request, version,
};
use crate::server::middleware::{handle_not_found, json_extractor_error};
use crate::server::StoreData;
use crate::store::RelationStore;

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(JsonConfig::default().error_handler(json_extractor_error))
                .app_data($store)
                .wrap(ErrorHandlers::new().handler(StatusCode::NOT_FOUND, handle_not_found))
                .service(register_account)
                .service(get_users)
                .service(create_friend_request)
                .service(respond_to_friend_request)
                .service(get_friends)
                .service(health)
                .service(version),
        )
    };
}

fn empty_store() -> StoreData {
    Data::new(Mutex::new(RelationStore::new()))
}

fn seeded_store(users: &[&str]) -> StoreData {
    let mut store = RelationStore::new();
    for user in users {
        store.register(user, "12345678").unwrap();
    }
    Data::new(Mutex::new(store))
}

#[actix_web::test]
async fn register_and_list_users() {
    let app = init_app!(empty_store()).await;

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/accounts").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["usernames"], json!([]));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/accounts/register")
            .set_json(json!({"username": "arnau", "password": "12345678"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/accounts").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["usernames"], json!(["arnau"]));
}

#[actix_web::test]
async fn register_rejects_taken_username() {
    let app = init_app!(seeded_store(&["arnau"])).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/accounts/register")
            .set_json(json!({"username": "arnau", "password": "87654321"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1001));
}

#[actix_web::test]
async fn register_rejects_malformed_account_data() {
    let app = init_app!(empty_store()).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/accounts/register")
            .set_json(json!({"username": "arn", "password": "12345678"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1002));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Username too short!"));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/accounts/register")
            .set_json(json!({"username": "arnau!", "password": "1234567"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let msg = body["message"].as_str().unwrap();
    assert!(msg.contains("Username has invalid characters!"));
    assert!(msg.contains("Password too short!"));

    // nothing may have been registered along the way
    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/accounts").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["usernames"], json!([]));
}

#[actix_web::test]
async fn friend_request_accept_flow() {
    let app = init_app!(seeded_store(&["arnau", "sergi", "berta"])).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "arnau", "password": "12345678", "to": "sergi"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // the unresolved request blocks both directions
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "arnau", "password": "12345678", "to": "sergi"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1004));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "sergi", "password": "12345678", "to": "arnau"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1004));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/respond")
            .set_json(json!({
                "username": "sergi",
                "password": "12345678",
                "from": "arnau",
                "accept": "1",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/friends/arnau").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["friends"], json!(["sergi"]));
    assert_eq!(body["friend_requests"], json!([]));

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/friends/berta").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["friends"], json!([]));

    // friends cannot request each other again
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "arnau", "password": "12345678", "to": "sergi"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1005));
}

#[actix_web::test]
async fn friend_request_decline_flow() {
    let app = init_app!(seeded_store(&["arnau", "berta"])).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "arnau", "password": "12345678", "to": "berta"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/friends/berta").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["friend_requests"], json!(["arnau"]));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/respond")
            .set_json(json!({
                "username": "berta",
                "password": "12345678",
                "from": "arnau",
                "accept": "0",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/friends/arnau").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["friends"], json!([]));

    // the decline cleared the state, a fresh request is permitted
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "arnau", "password": "12345678", "to": "berta"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn respond_requires_open_request() {
    let app = init_app!(seeded_store(&["arnau", "sergi"])).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/respond")
            .set_json(json!({
                "username": "sergi",
                "password": "12345678",
                "from": "arnau",
                "accept": "1",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1006));
}

#[actix_web::test]
async fn invalid_credentials_are_unauthorized() {
    let app = init_app!(seeded_store(&["arnau", "sergi"])).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "arnau", "password": "wrong_pw", "to": "sergi"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1000));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/respond")
            .set_json(json!({
                "username": "sergi",
                "password": "wrong_pw",
                "from": "arnau",
                "accept": "1",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unknown_users_are_rejected() {
    let app = init_app!(seeded_store(&["arnau"])).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/request")
            .set_json(json!({"username": "arnau", "password": "12345678", "to": "nobody"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1003));

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v2/friends/nobody").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1003));
}

#[actix_web::test]
async fn malformed_accept_flag_is_rejected() {
    let app = init_app!(seeded_store(&["arnau", "sergi"])).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/friends/respond")
            .set_json(json!({
                "username": "sergi",
                "password": "12345678",
                "from": "arnau",
                "accept": "yes",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1007));
}

#[actix_web::test]
async fn malformed_json_body_is_rejected() {
    let app = init_app!(empty_store()).await;

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v2/accounts/register")
            .insert_header(("content-type", "application/json"))
            .set_payload("{")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1008));
}

#[actix_web::test]
async fn unroutable_path_is_not_found() {
    let app = init_app!(empty_store()).await;

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/someUnusedPath").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], json!(1009));
}

#[actix_web::test]
async fn health_reports_store_counters() {
    let mut store = RelationStore::new();
    for user in ["arnau", "sergi", "berta"] {
        store.register(user, "12345678").unwrap();
    }
    store.send_friend_request("arnau", "sergi").unwrap();
    store
        .respond_to_friend_request("sergi", "arnau", true)
        .unwrap();
    store.send_friend_request("arnau", "berta").unwrap();

    let app = init_app!(Data::new(Mutex::new(store))).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/api/v2/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["registered_accounts"], json!(3));
    assert_eq!(body["pending_requests"], json!(1));
    assert_eq!(body["friendships"], json!(1));
}

#[actix_web::test]
async fn version_is_reported() {
    let app = init_app!(empty_store()).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/api/version").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["version"], json!(1));
}
