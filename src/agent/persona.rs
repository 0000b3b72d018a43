use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a persona key is not one of the four known agents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown agent type: {0}")]
pub struct UnknownAgentType(pub String);

/// The UX specialist a message is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Workflow,
    Thinking,
    Writing,
    #[default]
    Triage,
}

/// Static description of an agent
#[derive(Debug, Clone, Copy)]
pub struct Persona {
    pub name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
    /// Canned reply used when the model is unreachable and no keyword matches
    pub introduction: &'static str,
}

const WORKFLOW: Persona = Persona {
    name: "UX Workflow Specialist",
    description: "Process optimization and methodology",
    system_prompt: include_str!("prompts/workflow.md"),
    introduction: include_str!("responses/intro_workflow.md"),
};

const THINKING: Persona = Persona {
    name: "UX Strategic Thinker",
    description: "Strategy and user psychology",
    system_prompt: include_str!("prompts/thinking.md"),
    introduction: include_str!("responses/intro_thinking.md"),
};

const WRITING: Persona = Persona {
    name: "UX Writing Expert",
    description: "Content and microcopy",
    system_prompt: include_str!("prompts/writing.md"),
    introduction: include_str!("responses/intro_writing.md"),
};

const TRIAGE: Persona = Persona {
    name: "UX Request Triage",
    description: "Routes requests to appropriate specialists",
    system_prompt: include_str!("prompts/triage.md"),
    introduction: include_str!("responses/intro_triage.md"),
};

impl AgentType {
    /// Every agent, in the order they are listed to clients
    pub fn all() -> [AgentType; 4] {
        [AgentType::Workflow, AgentType::Thinking, AgentType::Writing, AgentType::Triage]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Workflow => "workflow",
            AgentType::Thinking => "thinking",
            AgentType::Writing => "writing",
            AgentType::Triage => "triage",
        }
    }

    pub fn persona(&self) -> &'static Persona {
        match self {
            AgentType::Workflow => &WORKFLOW,
            AgentType::Thinking => &THINKING,
            AgentType::Writing => &WRITING,
            AgentType::Triage => &TRIAGE,
        }
    }

    /// `"{name} - {description}"`, as shown in the agent listing
    pub fn label(&self) -> String {
        let persona = self.persona();
        format!("{} - {}", persona.name, persona.description)
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = UnknownAgentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflow" => Ok(AgentType::Workflow),
            "thinking" => Ok(AgentType::Thinking),
            "writing" => Ok(AgentType::Writing),
            "triage" => Ok(AgentType::Triage),
            other => Err(UnknownAgentType(other.to_string())),
        }
    }
}
