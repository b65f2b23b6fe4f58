use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::agent::{Agent, AgentKind};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::factory::AgentFactory;

/// Every constructed agent keyed by name.
///
/// Built once at process start and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    /// Constructs every agent in `config`. The first failure aborts the build.
    pub async fn build(config: &AgentConfig, factory: &AgentFactory) -> Result<Self, AgentError> {
        let mut agents = HashMap::with_capacity(config.len());
        for (name, definition) in config.iter() {
            let agent = factory.create(definition).await?;
            agents.insert(name.to_string(), agent);
        }
        info!(agents = agents.len(), "Agent registry built");
        Ok(Self { agents })
    }

    pub fn from_agents(agents: impl IntoIterator<Item = (String, Arc<dyn Agent>)>) -> Self {
        Self {
            agents: agents.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Agent>, AgentError> {
        self.agents
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::UnknownAgent(name.to_string()))
    }

    /// Looks up an agent and checks it accepts the expected kind of input.
    pub fn get_kind(&self, name: &str, expected: AgentKind) -> Result<Arc<dyn Agent>, AgentError> {
        let agent = self.get(name)?;
        let actual = agent.kind();
        if actual != expected {
            return Err(AgentError::WrongKind {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(agent)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
