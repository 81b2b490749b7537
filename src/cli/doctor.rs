//! CLI `doctor` command: database diagnostics plus a model server reachability check.

use anyhow::{Context, Result};

use rusqlite::Connection;

use crate::config::OrionConfig;
use crate::db;
use crate::store::personas;

pub async fn doctor(config: &OrionConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("OrionAI Health Report");
    println!("=====================");
    println!();

    if db_path.exists() {
        let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
        let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
        let report = db::check_database_health(&conn).context("failed to run health check")?;

        println!("Database:          {}", db_path.display());
        println!("File size:         {}", format_bytes(file_size));
        println!("Schema version:    {}", report.schema_version);
        println!();
        println!("Row counts:");
        println!("  Conversations:   {}", report.conversation_count);
        println!("  Memory items:    {}", report.memory_item_count);
        println!("  Characters:      {}", report.persona_count);
        println!("Active character:  {}", active_character(&conn)?);
        println!();
        if report.integrity_ok {
            println!("Integrity check:   PASSED");
        } else {
            println!("Integrity check:   FAILED ({})", report.integrity_details);
            println!();
            println!("Restore from a backup, e.g. cp backup.db {}", db_path.display());
        }
    } else {
        println!("Database:          not found at {}", db_path.display());
        println!("Run `orion serve` to initialize.");
    }

    println!();
    let url = format!("{}/api/tags", config.inference.base_url.trim_end_matches('/'));
    let tags = reqwest::Client::new()
        .get(&url)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await;
    match tags {
        Ok(resp) if resp.status().is_success() => {
            println!("Model server:      reachable at {}", config.inference.base_url)
        }
        Ok(resp) => println!("Model server:      responded {} at {url}", resp.status()),
        Err(e) => println!("Model server:      unreachable ({e})"),
    }
    println!("Default model:     {}", config.inference.default_model);

    Ok(())
}

fn active_character(conn: &Connection) -> Result<String> {
    let active = personas::active_persona(conn).context("failed to read active character")?;
    Ok(match active {
        Some(persona) => format!("{} ({})", persona.name, persona.character_id),
        None => "none".to_string(),
    })
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
