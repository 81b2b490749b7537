//! Streaming client for an Ollama-compatible `/api/chat` endpoint.
//!
//! The server answers with newline-delimited JSON fragments. [`StreamReducer`] folds
//! those fragments into the final reply and is independent of the transport, so the
//! chunk-boundary handling can be tested without a socket.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use super::types::Message;
use crate::config::InferenceConfig;
use crate::error::{GatewayError, GatewayResult};

/// Upper bound on one unterminated line before the stream is rejected.
const MAX_LINE_BYTES: usize = 1024 * 1024;

#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run one streamed completion and return the trimmed reply text.
    async fn complete(&self, messages: &[Message], model: &str) -> GatewayResult<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatFragment {
    #[serde(default)]
    message: Option<FragmentMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct FragmentMessage {
    #[serde(default)]
    content: String,
}

/// Accumulates NDJSON fragments across arbitrary byte-chunk boundaries.
#[derive(Debug, Default)]
pub struct StreamReducer {
    pending: Vec<u8>,
    text: String,
    parsed: usize,
    done: bool,
}

impl StreamReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a `done` fragment has been seen. Further input is ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one chunk of raw bytes.
    pub fn push(&mut self, chunk: &[u8]) -> GatewayResult<()> {
        if self.done {
            return Ok(());
        }
        self.pending.extend_from_slice(chunk);

        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.apply_line(&line)?;
            if self.done {
                self.pending.clear();
                return Ok(());
            }
        }

        if self.pending.len() > MAX_LINE_BYTES {
            return Err(GatewayError::InferenceProtocol(format!(
                "stream line exceeds {MAX_LINE_BYTES} bytes"
            )));
        }
        Ok(())
    }

    /// Flush any trailing unterminated line and return the trimmed reply.
    pub fn finish(mut self) -> GatewayResult<String> {
        if !self.done && !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.apply_line(&rest)?;
        }
        if self.parsed == 0 {
            return Err(GatewayError::InferenceProtocol(
                "stream contained no parseable fragments".into(),
            ));
        }
        Ok(self.text.trim().to_string())
    }

    fn apply_line(&mut self, raw: &[u8]) -> GatewayResult<()> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let fragment: ChatFragment = match serde_json::from_str(line) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!(error = %e, line_len = line.len(), "skipping unparseable fragment");
                return Ok(());
            }
        };
        self.parsed += 1;

        if let Some(err) = fragment.error {
            return Err(GatewayError::InferenceProtocol(err));
        }
        if fragment.done {
            self.done = true;
            return Ok(());
        }
        if let Some(message) = fragment.message {
            self.text.push_str(&message.content);
        }
        Ok(())
    }
}

/// [`InferenceClient`] backed by `reqwest`, sharing one connection pool.
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    chat_url: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &InferenceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), &config.base_url, config.timeout())
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            http,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            timeout,
        }
    }

    async fn stream_completion(&self, messages: &[Message], model: &str) -> GatewayResult<String> {
        let body = ChatRequest {
            model,
            stream: true,
            messages,
        };

        let response = self
            .http
            .post(&self.chat_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::InferenceTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::InferenceTransport(format!(
                "model server returned {status}: {text}"
            )));
        }

        let mut stream = response.bytes_stream();
        let mut reducer = StreamReducer::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| GatewayError::InferenceTransport(e.to_string()))?;
            reducer.push(&chunk)?;
            if reducer.is_done() {
                break;
            }
        }
        reducer.finish()
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn complete(&self, messages: &[Message], model: &str) -> GatewayResult<String> {
        tracing::debug!(model, messages = messages.len(), url = %self.chat_url, "inference request");
        let started = std::time::Instant::now();

        let reply = tokio::time::timeout(self.timeout, self.stream_completion(messages, model))
            .await
            .map_err(|_| {
                GatewayError::InferenceTransport(format!(
                    "no complete reply within {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        tracing::info!(
            model,
            reply_len = reply.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "inference complete"
        );
        Ok(reply)
    }
}
