use crate::knowledge::SearchResult;
use crate::store::ChatMessage;

use super::persona::AgentType;

/// How many of the most recent messages are replayed into the prompt
pub const HISTORY_WINDOW: usize = 4;

const FOLLOW_UP_INSTRUCTIONS: &str = "\n\nImportant instructions:\
\n- If the user is asking for more details or clarification, provide additional \
helpful information\
\n- If the user is asking follow-up questions, answer them directly based on the \
conversation context\
\n- Do not repeat previous recommendations unless specifically asked\
\n- Be conversational and build on the previous conversation\
\n- If you've already recommended a specialist, focus on answering the user's current question";

/// Assemble the full prompt sent to the model.
///
/// `history` holds the earlier turns of the conversation, oldest first, and
/// must not include `message` itself.
pub fn build_prompt(
    agent: AgentType,
    message: &str,
    history: &[ChatMessage],
    knowledge: &[SearchResult],
) -> String {
    let mut prompt = agent.persona().system_prompt.trim_end().to_string();

    if !knowledge.is_empty() {
        prompt.push_str("\n\nRelevant UX knowledge:");
        for result in knowledge {
            prompt.push_str(&format!("\nFrom {}: {}", result.title, result.preview));
        }
    }

    if !history.is_empty() {
        prompt.push_str("\n\nRecent conversation history:\n");
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        for turn in &history[start..] {
            prompt.push_str(&format!("{}: {}\n", turn.role.label(), turn.content));
        }
        prompt.push_str(FOLLOW_UP_INSTRUCTIONS);
    }

    prompt.push_str(&format!("\n\nUser: {}\n\nAssistant:", message));
    prompt
}
