mod helpers;

use std::sync::Arc;

use helpers::{spawn_app, spawn_fake_ollama, test_state, FakeReply, RecordingLauncher};
use reqwest::{Client, Method};
use serde_json::{json, Value};

struct Api {
    base: String,
    http: Client,
}

impl Api {
    async fn start(reply: FakeReply, novel_dir: &std::path::Path) -> (Self, helpers::FakeOllama) {
        let fake = spawn_fake_ollama(reply).await;
        let state = test_state(&fake.base_url, Arc::new(RecordingLauncher::default()), novel_dir);
        let base = spawn_app(state).await;
        (
            Self {
                base,
                http: Client::new(),
            },
            fake,
        )
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> (u16, Value) {
        let mut req = self.http.request(method, format!("{}{path}", self.base));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await.unwrap();
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap();
        (status, serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[tokio::test]
async fn health_lists_routers() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _fake) = Api::start(FakeReply::text("x"), dir.path()).await;

    let (status, body) = api.send(Method::GET, "/health", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["routers"].as_array().unwrap().len(), 4);

    let (status, body) = api.send(Method::GET, "/", None).await;
    assert_eq!(status, 200);
    assert!(body.as_str().unwrap().contains("OrionAI"));
}

#[tokio::test]
async fn conversation_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _fake) = Api::start(FakeReply::text("x"), dir.path()).await;

    let (status, created) = api
        .send(
            Method::POST,
            "/conversations",
            Some(json!({ "title": "Rencana liburan", "smartTags": ["travel"] })),
        )
        .await;
    assert_eq!(status, 200);
    let id = created["id"].as_i64().unwrap();

    let (status, _) = api
        .send(
            Method::POST,
            &format!("/conversations/{id}/message"),
            Some(json!({ "id": 1, "type": "sent", "content": "ke Bali?", "timestamp": "10:00" })),
        )
        .await;
    assert_eq!(status, 200);

    let (status, _) = api
        .send(Method::PUT, &format!("/conversations/{id}"), Some(json!({ "title": "Bali" })))
        .await;
    assert_eq!(status, 200);

    let (_, conv) = api.send(Method::GET, &format!("/conversations/{id}"), None).await;
    assert_eq!(conv["title"], "Bali");
    assert_eq!(conv["smartTags"], json!(["travel"]));
    assert_eq!(conv["messages"][0]["content"], "ke Bali?");

    let (_, all) = api.send(Method::GET, "/conversations", None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = api.send(Method::DELETE, &format!("/conversations/{id}"), None).await;
    assert_eq!(status, 200);
    let (status, body) = api.send(Method::GET, &format!("/conversations/{id}"), None).await;
    assert_eq!(status, 404);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn conversation_patch_rules() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _fake) = Api::start(FakeReply::text("x"), dir.path()).await;

    let (status, _) = api.send(Method::PUT, "/conversations/1", Some(json!({}))).await;
    assert_eq!(status, 400);

    let (status, _) = api.send(Method::PUT, "/conversations/999", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, 404);

    let (status, _) = api
        .send(
            Method::POST,
            "/conversations/999/message",
            Some(json!({ "id": 1, "type": "sent", "content": "hi", "timestamp": "" })),
        )
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn memory_bank_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _fake) = Api::start(FakeReply::text("x"), dir.path()).await;

    let (_, created) = api
        .send(
            Method::POST,
            "/memory",
            Some(json!({ "name": "catatan.pdf", "type": "pdf", "size": "2 MB", "source": "upload" })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (_, item) = api.send(Method::GET, &format!("/memory/{id}"), None).await;
    assert_eq!(item["status"], "Pending");
    assert_eq!(item["type"], "pdf");

    let (status, _) = api
        .send(Method::PUT, &format!("/memory/{id}"), Some(json!({ "status": "Indexed" })))
        .await;
    assert_eq!(status, 200);
    let (_, item) = api.send(Method::GET, &format!("/memory/{id}"), None).await;
    assert_eq!(item["status"], "Indexed");
    assert_eq!(item["name"], "catatan.pdf");

    let (status, _) = api.send(Method::PUT, &format!("/memory/{id}"), Some(json!({}))).await;
    assert_eq!(status, 400);

    let (status, _) = api.send(Method::DELETE, &format!("/memory/{id}"), None).await;
    assert_eq!(status, 200);
    let (status, _) = api.send(Method::DELETE, &format!("/memory/{id}"), None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn character_creation_uses_generated_definition() {
    let dir = tempfile::tempdir().unwrap();
    let (api, fake) = Api::start(FakeReply::text("Rani berusia 24 tahun."), dir.path()).await;

    let (status, created) = api
        .send(
            Method::POST,
            "/character",
            Some(json!({
                "name": "Rani",
                "user_relationship": "sahabat",
                "character_role": "pemandu",
                "short_description": "gadis ceria",
                "tags": ["travel"]
            })),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(created["definition"], "Rani berusia 24 tahun.");
    assert_eq!(created["visibility"], "private");
    assert_eq!(created["isActive"], false);
    let id = created["character_id"].as_str().unwrap().to_string();

    let briefing = fake.only_messages()[0]["content"].as_str().unwrap().to_string();
    assert!(briefing.contains("dengan sebutan 'Tuan'"));

    let (status, _) = api.send(Method::PUT, &format!("/character/{id}/activate"), None).await;
    assert_eq!(status, 200);
    let (_, list) = api.send(Method::GET, "/character_personas", None).await;
    assert_eq!(list[0]["isActive"], true);

    let (status, _) = api
        .send(Method::PUT, &format!("/character/{id}"), Some(json!({ "greeting": "Halo!" })))
        .await;
    assert_eq!(status, 200);
    let (_, one) = api.send(Method::GET, &format!("/character/{id}"), None).await;
    assert_eq!(one["greeting"], "Halo!");

    let (status, _) = api.send(Method::PUT, "/character/missing/activate", None).await;
    assert_eq!(status, 404);

    let (status, _) = api.send(Method::DELETE, &format!("/character/{id}"), None).await;
    assert_eq!(status, 200);
    let (status, _) = api.send(Method::GET, &format!("/character/{id}"), None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn character_transcript_round() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _fake) = Api::start(FakeReply::text("x"), dir.path()).await;

    let (_, empty) = api.send(Method::GET, "/character/abc/conversation", None).await;
    assert_eq!(empty["exists"], false);
    assert_eq!(empty["messages"], json!([]));

    let (status, _) = api
        .send(
            Method::POST,
            "/character/abc/conversation",
            Some(json!({ "messages": [{ "type": "sent", "content": "hai", "timestamp": "t" }] })),
        )
        .await;
    assert_eq!(status, 200);

    let (_, saved) = api.send(Method::GET, "/character/abc/conversation", None).await;
    assert_eq!(saved["exists"], true);
    assert_eq!(saved["messages"][0]["content"], "hai");
    assert!(saved["created_at"].is_string());

    api.send(Method::DELETE, "/character/abc/conversation", None).await;
    let (_, gone) = api.send(Method::GET, "/character/abc/conversation", None).await;
    assert_eq!(gone["exists"], false);
}

#[tokio::test]
async fn tool_routes() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _fake) = Api::start(FakeReply::text("x"), dir.path()).await;

    let (status, body) = api.send(Method::GET, "/api/tools/datetime", None).await;
    assert_eq!(status, 200);
    assert!(body["message"].as_str().unwrap().starts_with("Waktu server: "));
    assert!(body["datetime"].is_string());

    let (status, body) = api
        .send(Method::POST, "/api/tools/open_app", Some(json!({ "app_name": "notepad" })))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["action_required"], true);

    let (status, body) = api
        .send(Method::POST, "/api/tools/open_app", Some(json!({ "app_name": "regedit", "confirm": true })))
        .await;
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().contains("regedit"));
}

#[tokio::test]
async fn novel_generate_save_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let (api, fake) = Api::start(FakeReply::text("Bab 1: Awal."), dir.path()).await;

    let (status, body) = api
        .send(
            Method::POST,
            "/tools/novel/generate",
            Some(json!({ "title": "Senja", "genre": "Drama", "outlineOnly": true })),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["novel"], "Bab 1: Awal.");
    let request = &fake.requests()[0];
    assert_eq!(request["model"], "orion-12b-it:latest");
    assert!(request["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("berjudul 'Senja' dalam genre Drama"));

    let (status, saved) = api
        .send(
            Method::POST,
            "/tools/novel/save",
            Some(json!({ "title": "Senja di Kota", "folder": "../drafts", "content": "Bab 1: Awal." })),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(saved["success"], true);
    let path = std::path::PathBuf::from(saved["path"].as_str().unwrap());
    assert_eq!(path, dir.path().join("drafts").join("Senja_di_Kota.md"));
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "# Senja di Kota\n\nBab 1: Awal."
    );

    let (_, folders) = api.send(Method::GET, "/tools/novel/folders", None).await;
    assert_eq!(folders["folders"], json!(["drafts"]));
}

#[tokio::test]
async fn malformed_requests_answer_with_detail() {
    let dir = tempfile::tempdir().unwrap();
    let (api, fake) = Api::start(FakeReply::text("x"), dir.path()).await;

    let (status, body) = api.send(Method::POST, "/chat", Some(json!({}))).await;
    assert_eq!(status, 422);
    assert!(body["detail"].as_str().unwrap().contains("prompt"));

    let (status, body) = api.send(Method::POST, "/chat", Some(json!({ "prompt": 5 }))).await;
    assert_eq!(status, 422);
    assert!(body["detail"].is_string());

    let resp = api
        .http
        .post(format!("{}/chat", api.base))
        .header("content-type", "application/json")
        .body("{\"prompt\":")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());

    let (status, body) = api.send(Method::GET, "/conversations/abc", None).await;
    assert_eq!(status, 400);
    assert!(body["detail"].is_string());

    let (status, body) = api.send(Method::POST, "/chat?conv_id=abc", Some(json!({ "prompt": "halo" }))).await;
    assert_eq!(status, 400);
    assert!(body["detail"].is_string());

    assert!(fake.requests().is_empty());
}
