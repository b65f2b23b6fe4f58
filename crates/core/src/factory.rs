use std::sync::Arc;
use tracing::{error, info};

use crate::agent::{Agent, AgentCore, AgentKind, ContentAgent, TextAgent};
use crate::config::AgentDefinition;
use crate::error::AgentError;
use crate::model::{ChatModel, OpenAICompatibleModel};
use crate::secrets::{SecretStore, process_env, resolve_api_key};

/// Builds agents from their definitions.
///
/// API keys are resolved through [`resolve_api_key`] with the factory's
/// environment lookup and secret store.
pub struct AgentFactory {
    secret_store: Arc<dyn SecretStore>,
    env_lookup: fn(&str) -> Option<String>,
}

impl AgentFactory {
    pub fn new(secret_store: Arc<dyn SecretStore>) -> Self {
        Self {
            secret_store,
            env_lookup: process_env,
        }
    }

    /// Replaces the process environment as the second key source.
    pub fn with_env_lookup(mut self, env_lookup: fn(&str) -> Option<String>) -> Self {
        self.env_lookup = env_lookup;
        self
    }

    pub async fn create(&self, definition: &AgentDefinition) -> Result<Arc<dyn Agent>, AgentError> {
        let model_type = definition.model_type;
        let model_id = definition.model_id();
        info!(%model_type, model = %model_id, agent_type = %definition.agent_type, "Creating agent");

        let secret_name = model_type.secret_name();
        let api_key = resolve_api_key(
            definition.api_key.as_deref(),
            secret_name,
            self.env_lookup,
            self.secret_store.as_ref(),
        )
        .await
        .map_err(|source| {
            error!(%model_type, error = %source, "Failed to retrieve API key");
            AgentError::MissingApiKey {
                secret_name: secret_name.to_string(),
                source,
            }
        })?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAICompatibleModel::for_provider(
            model_type,
            &api_key,
            model_id.to_string(),
        ));
        let core = AgentCore::new(&definition.prompt_path, model)?;

        let agent: Arc<dyn Agent> = match definition.agent_type {
            AgentKind::Text => Arc::new(TextAgent::new(core)),
            AgentKind::Content => Arc::new(ContentAgent::new(core)),
        };

        info!(%model_type, agent_type = %definition.agent_type, "Successfully created agent");
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelType;
    use crate::secrets::NoSecretStore;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn gemini_env(name: &str) -> Option<String> {
        (name == "GeminiApiKey").then(|| "env-key".to_string())
    }

    fn definition(prompt_path: &std::path::Path, agent_type: AgentKind) -> AgentDefinition {
        AgentDefinition {
            prompt_path: prompt_path.to_path_buf(),
            model_type: ModelType::Gemini,
            model_id: None,
            api_key: None,
            agent_type,
        }
    }

    fn prompt() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Olet suomen kielen opettaja.").unwrap();
        file
    }

    #[tokio::test]
    async fn test_creates_matching_variant() {
        let file = prompt();
        let factory = AgentFactory::new(Arc::new(NoSecretStore)).with_env_lookup(gemini_env);

        let text = factory.create(&definition(file.path(), AgentKind::Text)).await.unwrap();
        let content = factory
            .create(&definition(file.path(), AgentKind::Content))
            .await
            .unwrap();

        assert_eq!(text.kind(), AgentKind::Text);
        assert_eq!(content.kind(), AgentKind::Content);
    }

    #[tokio::test]
    async fn test_missing_key_fails() {
        let file = prompt();
        let factory = AgentFactory::new(Arc::new(NoSecretStore)).with_env_lookup(no_env);

        let err = factory
            .create(&definition(file.path(), AgentKind::Text))
            .await
            .err()
            .expect("no key source should fail");
        assert!(matches!(err, AgentError::MissingApiKey { ref secret_name, .. } if secret_name == "GeminiApiKey"));
    }

    #[tokio::test]
    async fn test_explicit_key_and_missing_prompt() {
        let factory = AgentFactory::new(Arc::new(NoSecretStore)).with_env_lookup(no_env);
        let mut def = definition(std::path::Path::new("/nonexistent/teacher.md"), AgentKind::Text);
        def.api_key = Some("inline".to_string());

        let err = factory.create(&def).await.err().expect("missing prompt should fail");
        assert!(matches!(err, AgentError::PromptNotFound { .. }));
    }
}
