use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::knowledge::KnowledgeBase;
use crate::llm::{GenerateRequest, GenerationConfig, LlmProvider};
use crate::store::ChatMessage;

use super::fallback::fallback_reply;
use super::persona::AgentType;
use super::prompt::build_prompt;

/// Documents from the knowledge base added to each prompt
const KNOWLEDGE_RESULTS: usize = 3;

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Model,
    Fallback,
}

/// Outcome of one chat turn
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub text: String,
    pub agent: AgentType,
    pub source: ReplySource,
    pub knowledge_sources: Vec<String>,
}

/// Routes chat turns to the model and falls back to canned replies.
pub struct AgentService {
    provider: Arc<dyn LlmProvider>,
    knowledge: Arc<KnowledgeBase>,
    generation: GenerationConfig,
    available: AtomicBool,
}

impl AgentService {
    pub fn new(provider: Arc<dyn LlmProvider>, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            provider,
            knowledge,
            generation: GenerationConfig::default(),
            available: AtomicBool::new(false),
        }
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Whether the last contact with the model server succeeded
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    /// Probe the model server and record the result
    pub async fn probe(&self) -> bool {
        let available = match self.provider.health_check().await {
            Ok(()) => {
                info!(model = %self.provider.model(), "Ollama service available");
                true
            }
            Err(e) => {
                warn!(error = %e, "Ollama service not available, using fallback responses");
                false
            }
        };
        self.available.store(available, Ordering::Relaxed);
        available
    }

    /// Produce a reply for `message`. Never fails: any model error yields the
    /// keyword fallback.
    pub async fn respond(
        &self,
        agent: AgentType,
        message: &str,
        history: &[ChatMessage],
    ) -> AgentReply {
        let knowledge = self.knowledge.search(message, KNOWLEDGE_RESULTS);
        let prompt = build_prompt(agent, message, history, &knowledge);
        let request = GenerateRequest::new(prompt).with_config(self.generation.clone());

        let (text, source) = match self.provider.generate(request).await {
            Ok(generation) if !generation.text.trim().is_empty() => {
                self.available.store(true, Ordering::Relaxed);
                (generation.text, ReplySource::Model)
            }
            Ok(_) => {
                warn!(agent = %agent, "Model returned an empty reply, using fallback");
                self.available.store(true, Ordering::Relaxed);
                (fallback_reply(agent, message).to_string(), ReplySource::Fallback)
            }
            Err(e) => {
                warn!(agent = %agent, error = %e, "Model request failed, using fallback");
                self.available.store(false, Ordering::Relaxed);
                (fallback_reply(agent, message).to_string(), ReplySource::Fallback)
            }
        };

        let mut knowledge_sources =
            vec!["UX Knowledge Base".to_string(), self.source_label(source)];
        knowledge_sources.extend(knowledge.into_iter().map(|k| k.title));

        AgentReply {
            text,
            agent,
            source,
            knowledge_sources,
        }
    }

    /// Human readable description of the active backend, e.g. `Ollama gemma:2b-instruct`
    pub fn llm_type(&self) -> String {
        if self.is_available() {
            format!("Ollama {}", self.provider.model())
        } else {
            "Fallback Responses".to_string()
        }
    }

    fn source_label(&self, source: ReplySource) -> String {
        match source {
            ReplySource::Model => format!("Ollama {}", self.provider.model()),
            ReplySource::Fallback => "Fallback Responses".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::DocumentKind;
    use crate::llm::{Generation, LlmError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
        configs: Mutex<Vec<GenerationConfig>>,
    }

    impl ScriptedProvider {
        fn new(reply: Result<&str, ()>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                prompts: Mutex::new(Vec::new()),
                configs: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(&self, request: GenerateRequest) -> Result<Generation, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt);
            self.configs.lock().unwrap().push(request.config);
            match &self.reply {
                Ok(text) => Ok(Generation {
                    text: text.clone(),
                    model: "test-model".to_string(),
                    usage: None,
                }),
                Err(()) => Err(LlmError::ConnectionError("connection refused".to_string())),
            }
        }

        async fn health_check(&self) -> Result<(), LlmError> {
            match self.reply {
                Ok(_) => Ok(()),
                Err(()) => Err(LlmError::Timeout("no answer".to_string())),
            }
        }

        fn model(&self) -> &str {
            "test-model"
        }
    }

    fn service(provider: Arc<ScriptedProvider>) -> AgentService {
        AgentService::new(provider, Arc::new(KnowledgeBase::empty()))
    }

    #[tokio::test]
    async fn test_model_reply_is_returned_verbatim() {
        let provider = Arc::new(ScriptedProvider::new(Ok("  Start with a problem statement.\n")));
        let svc = service(provider.clone());

        let reply = svc.respond(AgentType::Thinking, "How do I start?", &[]).await;

        assert_eq!(reply.text, "  Start with a problem statement.\n");
        assert_eq!(reply.source, ReplySource::Model);
        assert_eq!(reply.knowledge_sources, vec!["UX Knowledge Base", "Ollama test-model"]);
        assert!(svc.is_available());
        let prompt = provider.prompts.lock().unwrap()[0].clone();
        assert!(prompt.ends_with("User: How do I start?\n\nAssistant:"));
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let svc = service(Arc::new(ScriptedProvider::new(Err(()))));

        let reply = svc.respond(AgentType::Writing, "write a job story", &[]).await;

        assert_eq!(reply.text, fallback_reply(AgentType::Writing, "write a job story"));
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.knowledge_sources[1], "Fallback Responses");
        assert!(!svc.is_available());
    }

    #[tokio::test]
    async fn test_empty_model_reply_falls_back() {
        let svc = service(Arc::new(ScriptedProvider::new(Ok("   "))));

        let reply = svc.respond(AgentType::Triage, "hello", &[]).await;

        assert_eq!(reply.text, AgentType::Triage.persona().introduction);
        assert_eq!(reply.source, ReplySource::Fallback);
    }

    #[tokio::test]
    async fn test_knowledge_titles_are_reported() {
        let mut knowledge = KnowledgeBase::empty();
        knowledge.insert("flows", "Every user flow has an entry point.", DocumentKind::Markdown);
        let provider = Arc::new(ScriptedProvider::new(Ok("answer")));
        let svc = AgentService::new(provider.clone(), Arc::new(knowledge));

        let reply = svc.respond(AgentType::Workflow, "user flow", &[]).await;

        assert_eq!(reply.knowledge_sources.last().map(String::as_str), Some("flows"));
        assert!(provider.prompts.lock().unwrap()[0].contains("From flows: Every user flow"));
    }

    #[tokio::test]
    async fn test_generation_config_is_sent_with_each_request() {
        let provider = Arc::new(ScriptedProvider::new(Ok("answer")));
        let svc = service(provider.clone())
            .with_generation_config(GenerationConfig::new(128).with_temperature(0.3));

        svc.respond(AgentType::Triage, "hello", &[]).await;

        let sent = provider.configs.lock().unwrap()[0].clone();
        assert_eq!(sent.num_predict, 128);
        assert_eq!(sent.temperature, 0.3);
    }

    #[tokio::test]
    async fn test_probe_updates_availability() {
        let up = service(Arc::new(ScriptedProvider::new(Ok("x"))));
        assert!(up.probe().await);
        assert_eq!(up.llm_type(), "Ollama test-model");

        let down = service(Arc::new(ScriptedProvider::new(Err(()))));
        assert!(!down.probe().await);
        assert_eq!(down.llm_type(), "Fallback Responses");
    }
}
