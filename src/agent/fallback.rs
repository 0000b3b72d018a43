use super::persona::AgentType;

/// Keyword groups checked in order; the first group with any keyword
/// contained in the lowercased message wins.
///
/// "workflow" contains "flow", so workflow questions land on the user flow
/// answer before reaching the workflow entry.
const KEYWORD_REPLIES: &[(&[&str], &str)] = &[
    (
        &["job story", "user story", "story writing"],
        include_str!("responses/job_story.md"),
    ),
    (
        &["align", "strategy", "business goals", "roadmap"],
        include_str!("responses/strategy.md"),
    ),
    (
        &["usability test", "user test", "testing", "test plan"],
        include_str!("responses/usability_testing.md"),
    ),
    (
        &["user flow", "flow", "user journey", "journey map"],
        include_str!("responses/user_flow.md"),
    ),
    (
        &["analytics", "metrics", "data", "measurement"],
        include_str!("responses/analytics.md"),
    ),
    (
        &["workflow", "process", "methodology", "framework"],
        include_str!("responses/workflow.md"),
    ),
    (
        &["user research", "research methods", "b2b research"],
        include_str!("responses/user_research.md"),
    ),
];

/// Deterministic reply used when the model cannot answer
pub fn fallback_reply(agent: AgentType, message: &str) -> &'static str {
    let message = message.to_lowercase();
    KEYWORD_REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| message.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(agent.persona().introduction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(name: &str) -> &'static str {
        match name {
            "job_story" => include_str!("responses/job_story.md"),
            "strategy" => include_str!("responses/strategy.md"),
            "usability_testing" => include_str!("responses/usability_testing.md"),
            "user_flow" => include_str!("responses/user_flow.md"),
            "analytics" => include_str!("responses/analytics.md"),
            "user_research" => include_str!("responses/user_research.md"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_keyword_matches_are_case_insensitive() {
        assert_eq!(
            fallback_reply(AgentType::Writing, "Can you write a JOB STORY for checkout?"),
            reply("job_story")
        );
        assert_eq!(
            fallback_reply(AgentType::Triage, "Which Metrics should we track?"),
            reply("analytics")
        );
        assert_eq!(
            fallback_reply(AgentType::Triage, "What research methods fit B2B?"),
            reply("user_research")
        );
    }

    #[test]
    fn test_earlier_entries_win() {
        // "user story" beats "testing"
        assert_eq!(
            fallback_reply(AgentType::Triage, "testing a user story"),
            reply("job_story")
        );
        // "strategy" beats "data"
        assert_eq!(
            fallback_reply(AgentType::Thinking, "data strategy"),
            reply("strategy")
        );
        assert_eq!(
            fallback_reply(AgentType::Triage, "plan a usability test"),
            reply("usability_testing")
        );
    }

    #[test]
    fn test_workflow_question_matches_user_flow_first() {
        assert_eq!(
            fallback_reply(AgentType::Workflow, "improve our design workflow"),
            reply("user_flow")
        );
        assert_eq!(
            fallback_reply(AgentType::Workflow, "what process should we use"),
            include_str!("responses/workflow.md")
        );
    }

    #[test]
    fn test_no_match_returns_introduction() {
        for agent in AgentType::all() {
            assert_eq!(fallback_reply(agent, "hello there"), agent.persona().introduction);
        }
    }
}
