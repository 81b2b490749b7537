#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures_util::StreamExt;
use serde_json::Value;
use tokio::net::TcpListener;

use orion::api::{self, AppState};
use orion::chat::{ChatOrchestrator, OllamaClient};
use orion::db::{self, Db};
use orion::store::conversations;
use orion::store::types::{NewConversation, StoredMessage};
use orion::tools::open_app::{LaunchTarget, ProcessLauncher};
use orion::tools::SystemTools;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> rusqlite::Connection {
    db::open_memory_database().unwrap()
}

/// How the fake model server answers `/api/chat`.
#[derive(Clone)]
pub enum FakeReply {
    /// Stream these byte chunks with a 200.
    Chunks(Vec<String>),
    /// Reply with this status and body.
    Status(StatusCode, String),
    /// Wait this long before answering at all.
    Stall(Duration),
    /// Answer at once, then send each chunk after this delay.
    Drip(Vec<String>, Duration),
}

impl FakeReply {
    /// A well-formed NDJSON stream producing `text`, split one fragment per word.
    pub fn text(text: &str) -> Self {
        let mut chunks: Vec<String> = text
            .split_inclusive(' ')
            .map(|word| {
                serde_json::json!({ "message": { "role": "assistant", "content": word }, "done": false })
                    .to_string()
                    + "\n"
            })
            .collect();
        chunks.push("{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n".into());
        Self::Chunks(chunks)
    }
}

#[derive(Clone)]
struct FakeState {
    reply: FakeReply,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// A throwaway Ollama stand-in listening on `127.0.0.1:0`.
pub struct FakeOllama {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeOllama {
    /// Every JSON body the server received, oldest first.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// The `messages` array of the only request received.
    pub fn only_messages(&self) -> Vec<Value> {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one inference request");
        requests[0]["messages"].as_array().unwrap().clone()
    }
}

async fn fake_chat(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body);
    match state.reply {
        FakeReply::Chunks(chunks) => {
            let stream = futures_util::stream::iter(
                chunks
                    .into_iter()
                    .map(|c| Ok::<_, std::io::Error>(Bytes::from(c))),
            );
            Body::from_stream(stream).into_response()
        }
        FakeReply::Status(status, body) => (status, body).into_response(),
        FakeReply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, "").into_response()
        }
        FakeReply::Drip(chunks, delay) => {
            let stream = futures_util::stream::iter(chunks).then(move |c| async move {
                tokio::time::sleep(delay).await;
                Ok::<_, std::io::Error>(Bytes::from(c))
            });
            Body::from_stream(stream).into_response()
        }
    }
}

pub async fn spawn_fake_ollama(reply: FakeReply) -> FakeOllama {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/chat", post(fake_chat))
        .with_state(FakeState {
            reply,
            requests: requests.clone(),
        });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeOllama {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// Launcher that records targets instead of spawning anything.
#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<String>>,
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&self, target: &LaunchTarget) -> std::io::Result<()> {
        self.launched.lock().unwrap().push(target.program.to_string());
        Ok(())
    }
}

/// Fully wired application state against an in-memory db and the fake model server.
pub fn test_state(
    model_base_url: &str,
    launcher: Arc<RecordingLauncher>,
    novel_dir: &Path,
) -> Arc<AppState> {
    let db = Db::new(test_db());
    let tools = Arc::new(SystemTools::with_launcher(launcher, "linux"));
    let inference = Arc::new(OllamaClient::with_client(
        reqwest::Client::new(),
        model_base_url,
        Duration::from_secs(5),
    ));
    let orchestrator = ChatOrchestrator::new(
        inference,
        tools.clone(),
        Arc::new(db.clone()),
        "orion-12b-it:latest",
        5,
    );
    Arc::new(AppState {
        db,
        orchestrator,
        tools,
        novel_dir: novel_dir.to_path_buf(),
    })
}

/// Serve the real router on an ephemeral port and return its base URL.
pub async fn spawn_app(state: Arc<AppState>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

/// Create a conversation holding `turns` alternating user/assistant messages `t0..`.
pub fn seed_conversation(db: &Db, turns: usize) -> i64 {
    let mut conn = db.lock().unwrap();
    let id = conversations::create_conversation(
        &conn,
        &NewConversation {
            title: "seeded".into(),
            ..Default::default()
        },
    )
    .unwrap();
    for i in 0..turns {
        let message = StoredMessage {
            id: i as i64,
            kind: if i % 2 == 0 { "sent" } else { "received" }.into(),
            content: format!("t{i}"),
            timestamp: "2025-01-01T00:00:00".into(),
            reactions: None,
            tool_action: None,
        };
        assert!(conversations::append_message(&mut conn, id, &message).unwrap());
    }
    id
}
