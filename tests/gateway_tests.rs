//! End-to-end tests: the full router against mocked Appwrite and Telegram servers.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use silicia_gateway::api::{app_state::AppState, create_router};
use silicia_gateway::config::config::AppConfig;
use silicia_gateway::observability::ObservabilityState;
use silicia_gateway::services::replies;
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEBHOOK_SECRET: &str = "hook-secret";
const ACTION_TOKEN: &str = "action-token";
const BOT_TOKEN: &str = "111:main";
const ACTION_BOT_TOKEN: &str = "222:actions";
const CHATS: &str = "/v1/databases/giulia/collections/chats/documents";
const PROFILES: &str = "/v1/databases/giulia/collections/profiles/documents";
const MESSAGES: &str = "/v1/databases/giulia/collections/messages/documents";

fn config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::development();
    config.appwrite.endpoint = format!("{}/v1", server.uri());
    config.telegram.api_base = server.uri();
    config.telegram.token = BOT_TOKEN.into();
    config.telegram.action_token = ACTION_BOT_TOKEN.into();
    config.telegram.webhook_secret = WEBHOOK_SECRET.into();
    config.actions.token = ACTION_TOKEN.into();
    config
}

fn gateway(server: &MockServer) -> Router {
    let observability = Arc::new(ObservabilityState::new("test"));
    let state = AppState::from_config(&config(server), observability).unwrap();
    create_router(state)
}

fn update(text: &str) -> Value {
    json!({
        "update_id": 900,
        "message": {
            "message_id": 12,
            "chat": {"id": 42, "type": "private"},
            "from": {
                "id": 42,
                "is_bot": false,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "username": "ada",
                "language_code": "it"
            },
            "date": 1700000000,
            "text": text
        }
    })
}

fn webhook(secret: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/telegram/webhook")
        .header("content-type", "application/json")
        .header("x-telegram-bot-api-secret-token", secret)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn action(token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/actions")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sent(message_id: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": {"message_id": message_id, "chat": {"id": 42}, "date": 0}
    }))
}

async fn mount_chat_lookup(server: &MockServer, documents: Value) {
    let total = documents.as_array().map_or(0, Vec::len);
    Mock::given(method("GET"))
        .and(path(CHATS))
        .and(query_param(
            "queries[]",
            r#"{"method":"equal","attribute":"chatid","values":["42"]}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": total,
            "documents": documents
        })))
        .mount(server)
        .await;
}

async fn expect_reply(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", BOT_TOKEN)))
        .and(body_json(json!({"chat_id": "42", "text": text})))
        .respond_with(sent(1))
        .expect(1)
        .mount(server)
        .await;
}

async fn expect_no_writes(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(PROFILES))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(server)
        .await;
}

fn existing_chat() -> Value {
    json!([{"$id": "chat-doc", "channel": "telegram", "chatid": "42"}])
}

#[tokio::test]
async fn test_start_command_greets() {
    let server = MockServer::start().await;
    mount_chat_lookup(&server, json!([])).await;
    expect_reply(&server, replies::GREETING).await;
    expect_no_writes(&server).await;

    let response = gateway(&server)
        .oneshot(webhook(WEBHOOK_SECRET, update("/start")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_magic_word_registers_new_user() {
    let server = MockServer::start().await;
    mount_chat_lookup(&server, json!([])).await;
    Mock::given(method("GET"))
        .and(path("/v1/locale/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "languages": [
                {"name": "Italian", "code": "it", "nativeName": "Italiano"},
                {"name": "English", "code": "en", "nativeName": "English"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PROFILES))
        .and(body_partial_json(json!({
            "data": {
                "name": "ada",
                "es": {"fear": 0.0},
                "ltm": [
                    {"key": "first_name_user", "value": ["Ada"]},
                    {"key": "last_name_user", "value": ["Lovelace"]},
                    {"key": "user_language", "value": ["Italian"]},
                    {"key": "username_user", "value": ["ada"]}
                ],
                "chats": [{"channel": "telegram", "chatid": "42"}]
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"$id": "profile-1"})))
        .expect(1)
        .mount(&server)
        .await;
    expect_reply(&server, replies::REGISTERED).await;

    let response = gateway(&server)
        .oneshot(webhook(WEBHOOK_SECRET, update("start@imitation@game")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_magic_word_welcomes_back_known_user() {
    let server = MockServer::start().await;
    mount_chat_lookup(&server, existing_chat()).await;
    expect_reply(&server, replies::WELCOME_BACK).await;
    expect_no_writes(&server).await;

    let response = gateway(&server)
        .oneshot(webhook(WEBHOOK_SECRET, update("start@imitation@game")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_known_user_message_is_stored() {
    let server = MockServer::start().await;
    mount_chat_lookup(&server, existing_chat()).await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .and(body_partial_json(json!({
            "data": {"message": "come stai?", "bot": false, "chat": "chat-doc"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"$id": "msg-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", BOT_TOKEN)))
        .respond_with(sent(1))
        .expect(0)
        .mount(&server)
        .await;

    let response = gateway(&server)
        .oneshot(webhook(WEBHOOK_SECRET, update("come stai?")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_user_is_told_the_magic_word() {
    let server = MockServer::start().await;
    mount_chat_lookup(&server, json!([])).await;
    expect_reply(&server, replies::SAY_MAGIC_WORD).await;
    expect_no_writes(&server).await;

    let response = gateway(&server)
        .oneshot(webhook(WEBHOOK_SECRET, update("hello")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_secret_touches_nothing() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let response = gateway(&server)
        .oneshot(webhook("not-the-secret", update("/start")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_datastore_outage_still_acknowledges_update() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CHATS))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let response = gateway(&server)
        .oneshot(webhook(WEBHOOK_SECRET, update("hello")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

fn action_body(module: &str, direction: &str) -> Value {
    json!({
        "module": module,
        "channel": "telegram",
        "action": direction,
        "payload": {"value": "Ciao Ada!", "type": "text", "chatid": 42},
        "thought": {
            "$id": "thought-1",
            "thought": "greet the user",
            "chat": {"$id": "chat-doc", "chatid": "42"}
        }
    })
}

#[tokio::test]
async fn test_core_input_writes_and_replies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES))
        .and(body_partial_json(json!({
            "data": {"message": "Ciao Ada!", "bot": true, "chat": "chat-doc"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"$id": "msg-2"})))
        .expect(1)
        .mount(&server)
        .await;
    expect_reply(&server, "Ciao Ada!").await;

    let response = gateway(&server)
        .oneshot(action(ACTION_TOKEN, action_body("core", "input")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_output_action_is_relayed_to_moderation_bot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", ACTION_BOT_TOKEN)))
        .and(body_partial_json(json!({"chat_id": "chat-doc"})))
        .respond_with(sent(3))
        .expect(1)
        .mount(&server)
        .await;
    expect_no_writes(&server).await;

    let response = gateway(&server)
        .oneshot(action(ACTION_TOKEN, action_body("search", "output")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let requests = server.received_requests().await.unwrap();
    let relayed: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text: Value = serde_json::from_str(relayed["text"].as_str().unwrap()).unwrap();
    assert_eq!(text["module"], "search");
    assert_eq!(text["action"], "output");
}

#[tokio::test]
async fn test_invalid_action_makes_no_calls() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let response = gateway(&server)
        .oneshot(action(ACTION_TOKEN, action_body("core", "sideways")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_action_with_telegram_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", ACTION_BOT_TOKEN)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .mount(&server)
        .await;

    let response = gateway(&server)
        .oneshot(action(ACTION_TOKEN, action_body("core", "output")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
