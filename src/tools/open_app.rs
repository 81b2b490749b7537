//! Allow-listed application launcher.
//!
//! Launching is two-phase: a call without `confirm` only resolves the target and asks
//! the user; a confirmed call spawns the process. Nothing outside [`ALLOWED_APPS`]
//! can ever be resolved.

use serde::Serialize;

use crate::error::{GatewayError, GatewayResult};

/// A program plus its fixed arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchTarget {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

struct AllowedApp {
    name: &'static str,
    /// Keyed by `std::env::consts::OS`.
    targets: &'static [(&'static str, LaunchTarget)],
}

const ALLOWED_APPS: &[AllowedApp] = &[AllowedApp {
    name: "notepad",
    targets: &[
        ("windows", LaunchTarget { program: "notepad.exe", args: &[] }),
        ("linux", LaunchTarget { program: "gedit", args: &[] }),
        ("macos", LaunchTarget { program: "open", args: &["-a", "TextEdit"] }),
    ],
}];

/// Names of every application on the allow-list, lower-case.
pub fn allowed_app_names() -> impl Iterator<Item = &'static str> {
    ALLOWED_APPS.iter().map(|app| app.name)
}

/// Look up the launch target for `app` on `os`. No fallbacks.
pub fn resolve(app: &str, os: &str) -> Option<LaunchTarget> {
    ALLOWED_APPS
        .iter()
        .find(|a| a.name == app)?
        .targets
        .iter()
        .find(|(target_os, _)| *target_os == os)
        .map(|(_, target)| *target)
}

/// Starts a resolved target as a detached process.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, target: &LaunchTarget) -> std::io::Result<()>;
}

/// Spawns through `tokio::process`; the child is not awaited.
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, target: &LaunchTarget) -> std::io::Result<()> {
        tokio::process::Command::new(target.program)
            .args(target.args)
            .spawn()
            .map(|_child| ())
    }
}

/// Result of an open-app call, in the shape the UI expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OpenAppOutcome {
    NeedsConfirmation {
        action_required: bool,
        message: String,
        app_name: String,
    },
    Launched {
        success: bool,
        message: String,
    },
}

impl OpenAppOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::NeedsConfirmation { message, .. } | Self::Launched { message, .. } => message,
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::NeedsConfirmation { .. })
    }
}

/// Resolve `app_name` for `os` and, only when `confirm` is set, launch it.
pub fn open_app(
    app_name: &str,
    confirm: bool,
    os: &str,
    launcher: &dyn ProcessLauncher,
) -> GatewayResult<OpenAppOutcome> {
    let app = app_name.trim().to_lowercase();
    let Some(target) = resolve(&app, os) else {
        tracing::warn!(app = %app, os, "open_app refused: not on allow-list");
        return Err(GatewayError::ToolNotAllowed(format!(
            "Aplikasi '{app}' tidak diizinkan atau tidak ditemukan."
        )));
    };

    if !confirm {
        return Ok(OpenAppOutcome::NeedsConfirmation {
            action_required: true,
            message: format!("Buka aplikasi '{app}'?"),
            app_name: app,
        });
    }

    tracing::info!(app = %app, program = target.program, "launching application");
    launcher.launch(&target).map_err(|e| {
        tracing::error!(app = %app, error = %e, "launch failed");
        GatewayError::ToolExecutionFailed(format!("Gagal membuka aplikasi: {e}"))
    })?;

    Ok(OpenAppOutcome::Launched {
        success: true,
        message: format!("Aplikasi '{app}' berhasil dibuka."),
    })
}
