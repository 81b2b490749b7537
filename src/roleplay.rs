//! Character creation: the model writes the long-form roleplay sheet from a short brief.

use crate::chat::types::{Message, Role};
use crate::chat::InferenceClient;
use crate::db::Db;
use crate::error::GatewayResult;
use crate::store::personas;
use crate::store::types::{CharacterPersona, NewCharacterPersona};

/// How a character addresses the user when the brief does not say.
pub const DEFAULT_NICKNAME: &str = "Tuan";

/// The instruction that asks the model for a persona `definition`.
pub fn definition_briefing(new: &NewCharacterPersona) -> String {
    let nickname = new
        .user_persona_nickname
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_NICKNAME);
    format!(
        "Berdasarkan deskripsi singkat: {desc}.\n\
         Karakter ini memiliki hubungan '{rel}' dengan User dan berperan sebagai '{role}'.\n\
         Karakter akan memanggil User dengan sebutan '{nickname}'.\n\n\
         Kembangkan detail roleplay yang lengkap dan terstruktur (sekitar 500 kata) untuk field 'definition'. \
         Detail harus mencakup:\n\
         1. Penampilan Fisik (Gender, umur, bentuk tubuh, pakaian).\n\
         2. Kepribadian Mendalam (Sifat, kelemahan, motivasi).\n\
         3. Gaya Bicara (Nada, kosakata khas, cara memanggil User).\n\
         4. Latar Belakang dan Dinamika Hubungan dengan User.\n\
         5. Perilaku Khas dalam Roleplay.",
        desc = new.short_description,
        rel = new.user_relationship,
        role = new.character_role,
    )
}

/// Generate the definition, then store the character. Nothing is written if
/// inference fails.
pub async fn create_character(
    db: &Db,
    inference: &dyn InferenceClient,
    model: &str,
    new: NewCharacterPersona,
) -> GatewayResult<CharacterPersona> {
    let messages = [Message::new(Role::User, definition_briefing(&new))];
    let definition = inference.complete(&messages, model).await?;
    tracing::info!(name = %new.name, definition_len = definition.len(), "character definition generated");

    let persona = db
        .call(move |conn| personas::create_persona(conn, &new, &definition))
        .await?;
    Ok(persona)
}
