//! Tutor Agents
//!
//! An agent binds a fixed system prompt to a hosted model and turns one input
//! into one reply. Two variants exist: a text agent that takes a plain string
//! and a content agent that takes a structured message and forwards only its
//! content blocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::AgentError;
use crate::message::{ContentBlock, Message};
use crate::model::ChatModel;

/// Which kind of input an agent accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Text,
    Content,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Text => write!(f, "text"),
            AgentKind::Content => write!(f, "content"),
        }
    }
}

/// Input handed to [`Agent::process`].
#[derive(Debug, Clone)]
pub enum AgentInput {
    Text(String),
    Message(Message),
}

impl AgentInput {
    fn describe(&self) -> &'static str {
        match self {
            AgentInput::Text(_) => "text",
            AgentInput::Message(_) => "message",
        }
    }
}

impl From<String> for AgentInput {
    fn from(text: String) -> Self {
        AgentInput::Text(text)
    }
}

impl From<&str> for AgentInput {
    fn from(text: &str) -> Self {
        AgentInput::Text(text.to_string())
    }
}

impl From<Message> for AgentInput {
    fn from(message: Message) -> Self {
        AgentInput::Message(message)
    }
}

/// The single capability shared by every agent variant.
#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    async fn process(&self, input: AgentInput) -> Result<Message, AgentError>;
}

/// State shared by both agent variants: the loaded prompt and the bound model.
pub struct AgentCore {
    prompt_path: PathBuf,
    prompt: String,
    model: Arc<dyn ChatModel>,
}

impl AgentCore {
    /// Loads the prompt eagerly and binds it to `model`.
    pub fn new(prompt_path: impl AsRef<Path>, model: Arc<dyn ChatModel>) -> Result<Self, AgentError> {
        let prompt_path = prompt_path.as_ref().to_path_buf();
        debug!(path = %prompt_path.display(), "Loading prompt");
        let prompt = std::fs::read_to_string(&prompt_path).map_err(|source| {
            error!(path = %prompt_path.display(), %source, "Failed to load prompt");
            AgentError::PromptNotFound {
                path: prompt_path.clone(),
                source,
            }
        })?;
        debug!(characters = prompt.len(), "Loaded prompt");

        Ok(Self {
            prompt_path,
            prompt,
            model,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn prompt_path(&self) -> &Path {
        &self.prompt_path
    }

    async fn respond(&self, content: Vec<ContentBlock>) -> Result<Message, AgentError> {
        self.model
            .converse(&self.prompt, content)
            .await
            .map_err(AgentError::Model)
    }
}

/// Generic agent for processing text input.
pub struct TextAgent {
    core: AgentCore,
}

impl TextAgent {
    pub fn new(core: AgentCore) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &AgentCore {
        &self.core
    }
}

#[async_trait]
impl Agent for TextAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Text
    }

    async fn process(&self, input: AgentInput) -> Result<Message, AgentError> {
        let received = input.describe();
        let AgentInput::Text(text) = input else {
            return Err(AgentError::InvalidInput {
                expected: AgentKind::Text,
                received,
            });
        };

        info!(length = text.len(), "TextAgent processing input");
        match self.core.respond(vec![ContentBlock::text(text)]).await {
            Ok(message) => {
                info!("TextAgent successfully processed input");
                Ok(message)
            }
            Err(e) => {
                error!(error = %e, "TextAgent failed to process input");
                Err(e)
            }
        }
    }
}

/// Generic agent for processing content blocks.
pub struct ContentAgent {
    core: AgentCore,
}

impl ContentAgent {
    pub fn new(core: AgentCore) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &AgentCore {
        &self.core
    }
}

#[async_trait]
impl Agent for ContentAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Content
    }

    async fn process(&self, input: AgentInput) -> Result<Message, AgentError> {
        let received = input.describe();
        let AgentInput::Message(message) = input else {
            return Err(AgentError::InvalidInput {
                expected: AgentKind::Content,
                received,
            });
        };

        info!(blocks = message.content.len(), "ContentAgent processing message content");
        match self.core.respond(message.content).await {
            Ok(reply) => {
                info!("ContentAgent successfully processed content");
                Ok(reply)
            }
            Err(e) => {
                error!(error = %e, "ContentAgent failed to process content");
                Err(e)
            }
        }
    }
}
