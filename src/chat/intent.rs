//! Rule-based detection of requests a local tool should answer.
//!
//! Rules are checked in a fixed order and the first hit wins, so a prompt that mentions
//! both the time and opening an app is routed to the clock.

use crate::tools::open_app;

/// Phrases that ask for the current time.
const TIME_PHRASES: &[&str] = &["jam berapa", "waktu"];

/// Verbs that ask to open something.
const OPEN_PHRASES: &[&str] = &["buka"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    GetDatetime,
    /// `app` is the allow-listed application name found in the text.
    OpenApp { app: String },
}

/// Classify raw user text. Case-insensitive phrase containment only.
pub fn classify(text: &str) -> Option<Intent> {
    let lowered = text.to_lowercase();

    if TIME_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Some(Intent::GetDatetime);
    }

    if OPEN_PHRASES.iter().any(|p| lowered.contains(p)) {
        if let Some(app) = open_app::allowed_app_names().find(|app| lowered.contains(app)) {
            return Some(Intent::OpenApp {
                app: app.to_string(),
            });
        }
    }

    None
}
