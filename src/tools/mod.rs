//! Local tools the chat pipeline (and the `/api/tools` routes) can call.
//!
//! Tools run in-process behind [`ToolInvoker`] so the orchestrator can be tested with
//! a fake and the HTTP surface and the chat flow share one implementation.

pub mod datetime;
pub mod open_app;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GatewayResult;
use datetime::DatetimeReport;
use open_app::{OpenAppOutcome, ProcessLauncher, SystemLauncher};

#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Current server time.
    async fn current_time(&self) -> GatewayResult<DatetimeReport>;

    /// Propose (`confirm == false`) or launch an allow-listed application.
    async fn open_app(&self, app_name: &str, confirm: bool) -> GatewayResult<OpenAppOutcome>;
}

/// Tools backed by the real clock and the host process table.
#[derive(Clone)]
pub struct SystemTools {
    launcher: Arc<dyn ProcessLauncher>,
    os: &'static str,
}

impl SystemTools {
    pub fn new() -> Self {
        Self::with_launcher(Arc::new(SystemLauncher), std::env::consts::OS)
    }

    pub fn with_launcher(launcher: Arc<dyn ProcessLauncher>, os: &'static str) -> Self {
        Self { launcher, os }
    }
}

impl Default for SystemTools {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolInvoker for SystemTools {
    async fn current_time(&self) -> GatewayResult<DatetimeReport> {
        Ok(datetime::now())
    }

    async fn open_app(&self, app_name: &str, confirm: bool) -> GatewayResult<OpenAppOutcome> {
        open_app::open_app(app_name, confirm, self.os, self.launcher.as_ref())
    }
}
