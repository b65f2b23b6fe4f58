//! Agent definitions loaded from a JSON configuration file.
//!
//! ```json
//! {
//!   "teacher_agent": {
//!     "prompt_path": "prompts/teacher.md",
//!     "model_type": "openai",
//!     "model_id": "gpt-4o",
//!     "agent_type": "text"
//!   }
//! }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::agent::AgentKind;
use crate::error::AgentError;
use crate::model::ModelType;

/// Construction parameters for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentDefinition {
    pub prompt_path: PathBuf,
    pub model_type: ModelType,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub agent_type: AgentKind,
}

impl AgentDefinition {
    /// The configured model id, or the provider default.
    pub fn model_id(&self) -> &str {
        self.model_id
            .as_deref()
            .unwrap_or_else(|| self.model_type.default_model_id())
    }
}

/// Every agent definition keyed by name. Read once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    agents: BTreeMap<String, AgentDefinition>,
}

impl AgentConfig {
    /// Loads and validates the configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AgentError::ConfigNotFound(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path).map_err(|e| AgentError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_json(&raw).map_err(|e| AgentError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        info!(path = %path.display(), agents = config.agents.len(), "Loaded agent configuration");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let agents = serde_json::from_str(raw)?;
        Ok(Self { agents })
    }

    pub fn get(&self, name: &str) -> Result<&AgentDefinition, AgentError> {
        self.agents
            .get(name)
            .ok_or_else(|| AgentError::UnknownAgent(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentDefinition)> {
        self.agents.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
