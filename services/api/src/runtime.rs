//! References to deployed agent runtimes.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::info;
use tutor_core::{SecretError, secrets::SecretsExtensionStore};

use crate::config::RuntimeArnSource;

/// The kind of agent a runtime hosts.
///
/// Names without a response handler are kept as `Unsupported` so that a
/// runtime reference can always be built; the mediation service rejects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentType {
    Tutor,
    Unsupported(String),
}

impl FromStr for AgentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "tutor" => AgentType::Tutor,
            other => AgentType::Unsupported(other.to_string()),
        })
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentType::Tutor => write!(f, "tutor"),
            AgentType::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

/// An immutable reference to one deployed agent runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runtime {
    agent_type: AgentType,
    runtime_arn: String,
}

impl Runtime {
    pub fn new(agent_type: AgentType, runtime_arn: impl Into<String>) -> Self {
        Self {
            agent_type,
            runtime_arn: runtime_arn.into(),
        }
    }

    /// Builds the tutor runtime reference, reading the ARN from the parameter
    /// store when it is not given directly.
    pub async fn resolve_tutor(
        source: &RuntimeArnSource,
        store: &SecretsExtensionStore,
    ) -> Result<Self, SecretError> {
        let arn = match source {
            RuntimeArnSource::Direct(arn) => arn.clone(),
            RuntimeArnSource::Parameter(name) => {
                info!(parameter = %name, "Fetching tutor runtime ARN from parameter store");
                store.get_parameter(name).await?
            }
        };
        Ok(Self::new(AgentType::Tutor, arn))
    }

    pub fn agent_type(&self) -> &AgentType {
        &self.agent_type
    }

    pub fn runtime_arn(&self) -> &str {
        &self.runtime_arn
    }
}
