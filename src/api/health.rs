use axum::response::Html;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct RouterInfo {
    name: &'static str,
    prefix: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthStatus {
    status: &'static str,
    routers: Vec<RouterInfo>,
}

const ROUTERS: &[(&str, &str)] = &[
    ("Roleplay", "/character, /character_personas"),
    ("Conversation", "/conversations, /chat"),
    ("Memory", "/memory"),
    ("Tools", "/tools/novel, /api/tools"),
];

pub(crate) async fn index() -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html lang=\"id\"><head><meta charset=\"UTF-8\">\
         <title>OrionAI Backend Service</title></head>\
         <body><h1>OrionAI Backend</h1><p>Service berjalan. Versi {}.</p>\
         <p><a href=\"/health\">/health</a></p></body></html>",
        env!("CARGO_PKG_VERSION")
    ))
}

pub(crate) async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        routers: ROUTERS
            .iter()
            .map(|&(name, prefix)| RouterInfo { name, prefix })
            .collect(),
    })
}
