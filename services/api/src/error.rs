use crate::runtime::AgentType;

/// Failures of the mediation between the HTTP endpoint and an agent runtime.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// The outbound call failed for any reason: network, auth, throttling or a
    /// remote error.
    #[error("Failed to invoke agent runtime {agent_type}")]
    AgentInvocation {
        agent_type: AgentType,
        #[source]
        source: anyhow::Error,
    },
    /// The runtime answered but the body was malformed or did not match the
    /// expected schema.
    #[error("{message}")]
    UnexpectedAgentResponse {
        message: &'static str,
        #[source]
        source: Option<anyhow::Error>,
    },
    #[error("Unsupported agent runtime type: {0}")]
    InvalidRuntime(AgentType),
}

impl MessagingError {
    pub(crate) fn unexpected(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::UnexpectedAgentResponse {
            message,
            source: Some(source.into()),
        }
    }
}
