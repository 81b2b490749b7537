use async_trait::async_trait;

use super::types::ConversationTurn;
use crate::db::Db;
use crate::error::GatewayResult;
use crate::store::conversations;

/// Read side of the conversation store as the chat pipeline sees it.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// The last `limit` turns of a conversation, oldest first, or `None` when the
    /// conversation does not exist.
    async fn recent_turns(
        &self,
        conversation_id: i64,
        limit: usize,
    ) -> GatewayResult<Option<Vec<ConversationTurn>>>;
}

#[async_trait]
impl HistorySource for Db {
    async fn recent_turns(
        &self,
        conversation_id: i64,
        limit: usize,
    ) -> GatewayResult<Option<Vec<ConversationTurn>>> {
        let messages = self
            .call(move |conn| conversations::recent_messages(conn, conversation_id, limit))
            .await?;
        Ok(messages.map(|msgs| msgs.iter().map(ConversationTurn::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::Role;
    use crate::db::open_memory_database;
    use crate::store::types::{NewConversation, StoredMessage};

    fn msg(id: i64, kind: &str, content: &str) -> StoredMessage {
        StoredMessage {
            id,
            kind: kind.into(),
            content: content.into(),
            timestamp: String::new(),
            reactions: None,
            tool_action: None,
        }
    }

    #[tokio::test]
    async fn db_history_maps_roles_and_keeps_tail() {
        let db = Db::new(open_memory_database().unwrap());
        let id = {
            let mut conn = db.lock().unwrap();
            let id = conversations::create_conversation(&conn, &NewConversation::default()).unwrap();
            for i in 0..7 {
                let kind = if i % 2 == 0 { "sent" } else { "received" };
                conversations::append_message(&mut conn, id, &msg(i, kind, &format!("m{i}"))).unwrap();
            }
            id
        };

        let turns = db.recent_turns(id, 5).await.unwrap().unwrap();
        let texts: Vec<&str> = turns.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4", "m5", "m6"]);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn unknown_conversation_is_none() {
        let db = Db::new(open_memory_database().unwrap());
        assert!(db.recent_turns(404, 5).await.unwrap().is_none());
    }
}
