//! Long-form writing helper: ask the model for a novel or outline, and keep drafts as
//! Markdown files grouped into folders under the configured storage directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::chat::types::{Message, Role};
use crate::chat::InferenceClient;
use crate::error::GatewayResult;

const DEFAULT_FOLDER: &str = "default";
const DEFAULT_FILENAME: &str = "untitled";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NovelGenerateRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    /// `short`, `medium` or `long`; anything else reads as `medium`.
    pub length: Option<String>,
    /// `id` writes in Indonesian, anything else in English.
    pub language: Option<String>,
    pub model: Option<String>,
    #[serde(default, rename = "outlineOnly")]
    pub outline_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedNovel {
    pub novel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NovelSaveRequest {
    pub title: String,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedNovel {
    pub success: bool,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NovelFolders {
    pub folders: Vec<String>,
}

fn length_phrase(length: &str) -> &'static str {
    match length {
        "short" => "panjang pendek (~2-5 halaman)",
        "long" => "panjang panjang (~50+ halaman)",
        _ => "panjang sedang (~10-30 halaman)",
    }
}

/// Build the single user prompt sent to the model.
pub fn novel_prompt(req: &NovelGenerateRequest) -> String {
    let title = req
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled");
    let genre = req.genre.as_deref().unwrap_or("General");
    let language = match req.language.as_deref().unwrap_or("id") {
        "id" => "Indonesia",
        _ => "English",
    };
    let length = length_phrase(req.length.as_deref().unwrap_or("medium"));

    let mut prompt = format!(
        "Tuliskan sebuah novel berjudul '{title}' dalam genre {genre}. Tulis dalam bahasa {language}. \
         Target: {length}. Jika diminta outlineOnly, berikan hanya kerangka bab dan sinopsis singkat per bab."
    );
    if req.outline_only {
        prompt.push_str("\nBerikan daftar bab (10-20 bab ideal) dengan sinopsis singkat tiap bab.");
    } else {
        prompt.push_str(
            "\nTulis narasi yang kaya, deskriptif, dan terstruktur dengan pembagian bab. \
             Gunakan dialog, deskripsi, dan alur yang jelas.",
        );
    }
    prompt
}

pub async fn generate(
    inference: &dyn InferenceClient,
    req: &NovelGenerateRequest,
    default_model: &str,
) -> GatewayResult<GeneratedNovel> {
    let model = req
        .model
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(default_model);
    tracing::info!(model, outline_only = req.outline_only, "generating novel");
    let messages = [Message::new(Role::User, novel_prompt(req))];
    let novel = inference.complete(&messages, model).await?;
    Ok(GeneratedNovel { novel })
}

/// Keep alphanumerics, space, `-` and `_`, then trim.
pub fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn file_stem(req: &NovelSaveRequest) -> String {
    let source = req
        .filename
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(&req.title);
    let stem = sanitize_component(source).replace(' ', "_");
    if stem.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        stem
    }
}

/// Write `{dir}/{folder}/{name}.md`, overwriting any previous draft of the same name.
pub fn save(dir: &Path, req: &NovelSaveRequest) -> anyhow::Result<SavedNovel> {
    let folder = sanitize_component(req.folder.as_deref().unwrap_or(DEFAULT_FOLDER));
    let folder = if folder.is_empty() {
        DEFAULT_FOLDER.to_string()
    } else {
        folder
    };

    let target_dir = dir.join(folder);
    std::fs::create_dir_all(&target_dir)
        .with_context(|| format!("failed to create {}", target_dir.display()))?;

    let path: PathBuf = target_dir.join(format!("{}.md", file_stem(req)));
    let body = format!("# {}\n\n{}", req.title, req.content);
    std::fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = req.content.len(), "novel saved");
    Ok(SavedNovel {
        success: true,
        path: path.to_string_lossy().into_owned(),
    })
}

/// Sorted names of the folders under `dir`. Creates `dir` if needed.
pub fn list_folders(dir: &Path) -> anyhow::Result<NovelFolders> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut folders = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            folders.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    folders.sort();
    Ok(NovelFolders { folders })
}
