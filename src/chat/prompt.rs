//! Prompt composition: persona → system message, history → prior turns, prompt → final user turn.

use super::types::{ConversationTurn, Message, PersonaDescriptor, Role};

/// Build the system prompt for a persona. Empty optional fields are left out entirely.
pub fn system_prompt(persona: &PersonaDescriptor) -> String {
    let mut parts = vec![format!("Kamu adalah {}.", persona.display_name)];
    if !persona.description.is_empty() {
        parts.push(persona.description.clone());
    }
    parts.push(format!(
        "Panggil pengguna dengan sebutan '{}'.",
        persona.user_address_form
    ));
    if !persona.speech_style.is_empty() {
        parts.push(format!("Gaya bicara: {}", persona.speech_style));
    }
    if !persona.greeting.is_empty() {
        parts.push(format!("Sapa pengguna dengan: {}", persona.greeting));
    }
    parts.join(" ")
}

/// Assemble the message sequence for one inference call.
///
/// Output is `[system?] ++ history ++ [user prompt]`, history kept in its given order.
pub fn compose(
    persona: Option<&PersonaDescriptor>,
    prompt: &str,
    history: Option<&[ConversationTurn]>,
) -> Vec<Message> {
    let history = history.unwrap_or_default();
    let mut messages = Vec::with_capacity(history.len() + 2);

    if let Some(persona) = persona {
        messages.push(Message::new(Role::System, system_prompt(persona)));
    }
    messages.extend(
        history
            .iter()
            .map(|turn| Message::new(turn.role, turn.text.clone())),
    );
    messages.push(Message::new(Role::User, prompt));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_persona() -> PersonaDescriptor {
        PersonaDescriptor {
            display_name: "Orion".into(),
            user_address_form: "Kak".into(),
            ..Default::default()
        }
    }

    #[test]
    fn no_persona_no_system_message() {
        let messages = compose(None, "halo", None);
        assert_eq!(messages, vec![Message::new(Role::User, "halo")]);
    }

    #[test]
    fn minimal_persona_has_identity_and_address_only() {
        let messages = compose(Some(&minimal_persona()), "halo", None);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[0].content,
            "Kamu adalah Orion. Panggil pengguna dengan sebutan 'Kak'."
        );
    }

    #[test]
    fn full_persona_keeps_clause_order() {
        let persona = PersonaDescriptor {
            display_name: "Rani".into(),
            description: "Pemandu wisata.".into(),
            user_address_form: "Tuan".into(),
            speech_style: "santai".into(),
            greeting: "Halo, Tuan!".into(),
        };
        assert_eq!(
            system_prompt(&persona),
            "Kamu adalah Rani. Pemandu wisata. Panggil pengguna dengan sebutan 'Tuan'. \
             Gaya bicara: santai Sapa pengguna dengan: Halo, Tuan!"
        );
    }

    #[test]
    fn skipped_fields_leave_no_double_spaces() {
        let persona = PersonaDescriptor {
            greeting: "Hai".into(),
            ..minimal_persona()
        };
        let prompt = system_prompt(&persona);
        assert!(!prompt.contains("  "));
        assert!(prompt.ends_with("Sapa pengguna dengan: Hai"));
    }

    #[test]
    fn history_precedes_prompt_in_order() {
        let history = vec![
            ConversationTurn { role: Role::User, text: "a".into() },
            ConversationTurn { role: Role::Assistant, text: "b".into() },
        ];
        let messages = compose(None, "c", Some(&history));
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(messages[2].content, "c");
    }
}
