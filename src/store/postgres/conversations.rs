use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::store::{
    error::{Error, Result},
    types::{ChatMessage, Conversation, ConversationSummary, MessageRole},
};

const CONVERSATION_COLUMNS: &str = "id, user_id, title, agent_type, created_at, updated_at";

fn parse_summary_row(row: &Row) -> Result<ConversationSummary> {
    Ok(ConversationSummary {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        agent_type: row.try_get("agent_type")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn parse_message_row(row: &Row) -> Result<ChatMessage> {
    let role: String = row.try_get("role")?;
    Ok(ChatMessage {
        role: role.parse::<MessageRole>()?,
        content: row.try_get("content")?,
        timestamp: row.try_get("created_at")?,
    })
}

pub async fn create_conversation(
    pool: &Pool,
    user_id: i64,
    title: &str,
    agent_type: &str,
) -> Result<ConversationSummary> {
    let conn = pool.get().await?;
    let sql = format!(
        "INSERT INTO conversations (user_id, title, agent_type) VALUES ($1, $2, $3) RETURNING {}",
        CONVERSATION_COLUMNS
    );
    let row = conn.query_one(&sql, &[&user_id, &title, &agent_type]).await?;
    parse_summary_row(&row)
}

pub async fn list_conversations(pool: &Pool, user_id: i64) -> Result<Vec<ConversationSummary>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {} FROM conversations WHERE user_id = $1 ORDER BY updated_at DESC, id DESC",
        CONVERSATION_COLUMNS
    );
    let rows = conn.query(&sql, &[&user_id]).await?;
    rows.iter().map(parse_summary_row).collect()
}

/// Load a conversation with its messages in insertion order
pub async fn get_conversation(
    pool: &Pool,
    user_id: i64,
    conversation_id: i64,
) -> Result<Option<Conversation>> {
    let conn = pool.get().await?;
    let sql = format!(
        "SELECT {} FROM conversations WHERE id = $1 AND user_id = $2",
        CONVERSATION_COLUMNS
    );
    let summary = match conn.query_opt(&sql, &[&conversation_id, &user_id]).await? {
        Some(row) => parse_summary_row(&row)?,
        None => return Ok(None),
    };

    let rows = conn
        .query(
            "SELECT role, content, created_at FROM messages WHERE conversation_id = $1 ORDER BY id",
            &[&conversation_id],
        )
        .await?;
    let messages = rows.iter().map(parse_message_row).collect::<Result<Vec<_>>>()?;

    Ok(Some(Conversation { summary, messages }))
}

/// Append messages atomically and bump the conversation's activity time
pub async fn append_messages(
    pool: &Pool,
    user_id: i64,
    conversation_id: i64,
    messages: &[ChatMessage],
) -> Result<()> {
    let mut conn = pool.get().await?;
    let tx = conn.transaction().await?;

    let touched = tx
        .execute(
            "UPDATE conversations SET updated_at = now() WHERE id = $1 AND user_id = $2",
            &[&conversation_id, &user_id],
        )
        .await?;
    if touched == 0 {
        return Err(Error::NotFoundError(format!("conversation {}", conversation_id)));
    }

    let insert = tx
        .prepare(
            "INSERT INTO messages (conversation_id, role, content, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .await?;
    for message in messages {
        tx.execute(
            &insert,
            &[
                &conversation_id,
                &message.role.as_str(),
                &message.content,
                &message.timestamp,
            ],
        )
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn clear_messages(pool: &Pool, user_id: i64, conversation_id: i64) -> Result<bool> {
    let mut conn = pool.get().await?;
    let tx = conn.transaction().await?;

    let touched = tx
        .execute(
            "UPDATE conversations SET updated_at = now() WHERE id = $1 AND user_id = $2",
            &[&conversation_id, &user_id],
        )
        .await?;
    if touched == 0 {
        return Ok(false);
    }
    tx.execute("DELETE FROM messages WHERE conversation_id = $1", &[&conversation_id])
        .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn delete_conversation(pool: &Pool, user_id: i64, conversation_id: i64) -> Result<bool> {
    let conn = pool.get().await?;
    let deleted = conn
        .execute(
            "DELETE FROM conversations WHERE id = $1 AND user_id = $2",
            &[&conversation_id, &user_id],
        )
        .await?;
    Ok(deleted > 0)
}
