use std::sync::Arc;
use tracing::info;
use tutor_core::{Agent, AgentError, AgentKind, Message, registry::AgentRegistry};

pub const TEACHER_AGENT: &str = "teacher_agent";
pub const EXTRACTOR_AGENT: &str = "extractor_agent";

/// Prompt used when an invocation carries none.
pub const DEFAULT_PROMPT: &str = "Hello! How can I help you today?";

/// Teacher followed by extractor.
///
/// The teacher answers the learner in free text; the extractor receives the
/// teacher's reply as a message and rewrites it into the structured payload.
#[derive(Clone)]
pub struct TutorPipeline {
    teacher: Arc<dyn Agent>,
    extractor: Arc<dyn Agent>,
}

impl TutorPipeline {
    pub fn new(teacher: Arc<dyn Agent>, extractor: Arc<dyn Agent>) -> Self {
        Self { teacher, extractor }
    }

    /// Picks both agents out of the registry, checking their input kinds.
    pub fn from_registry(registry: &AgentRegistry) -> Result<Self, AgentError> {
        Ok(Self {
            teacher: registry.get_kind(TEACHER_AGENT, AgentKind::Text)?,
            extractor: registry.get_kind(EXTRACTOR_AGENT, AgentKind::Content)?,
        })
    }

    pub async fn run(&self, prompt: &str) -> Result<Message, AgentError> {
        let teacher_reply = self.teacher.process(prompt.into()).await?;
        info!(blocks = teacher_reply.content.len(), "Teacher replied, extracting structure");
        self.extractor.process(teacher_reply.into()).await
    }
}
