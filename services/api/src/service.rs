//! Agent Communication Service
//!
//! Forwards a prompt to a deployed agent runtime and reshapes the raw reply
//! into a typed [`AgentResponse`]. The runtime's reply body is a JSON envelope
//! whose `content[0].text` holds the agent payload as a second, JSON-encoded
//! string.

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::client::{AgentRuntimeClient, DEFAULT_QUALIFIER, InvocationRequest, InvocationResponse};
use crate::error::MessagingError;
use crate::models::{AgentResponse, PromptRequest, TutorResponseData};
use crate::runtime::{AgentType, Runtime};

/// The runtime session id for a client session id.
pub fn runtime_session_id(session_id: &str) -> String {
    format!("session_{}", session_id)
}

#[derive(Deserialize)]
struct ResponseEnvelope {
    content: Vec<EnvelopeBlock>,
}

#[derive(Deserialize)]
struct EnvelopeBlock {
    text: String,
}

/// Service handling agent communication.
pub struct AgentCommunicationService {
    client: Arc<dyn AgentRuntimeClient>,
}

impl AgentCommunicationService {
    pub fn new(client: Arc<dyn AgentRuntimeClient>) -> Self {
        Self { client }
    }

    /// Invokes `runtime` with the prompt in `request`.
    ///
    /// Any failure of the outbound call is reported as
    /// [`MessagingError::AgentInvocation`]. Nothing is retried.
    pub async fn invoke_agent(
        &self,
        runtime: &Runtime,
        request: &PromptRequest,
    ) -> Result<InvocationResponse, MessagingError> {
        let session_id = runtime_session_id(&request.session_id);
        info!(agent_type = %runtime.agent_type(), %session_id, "Invoking agent runtime");

        let invocation = InvocationRequest {
            runtime_arn: runtime.runtime_arn().to_string(),
            session_id: session_id.clone(),
            payload: serde_json::json!({ "prompt": request.message }),
            qualifier: DEFAULT_QUALIFIER.to_string(),
        };

        match self.client.invoke(invocation).await {
            Ok(response) => {
                info!(agent_type = %runtime.agent_type(), %session_id, "Received response from agent runtime");
                Ok(response)
            }
            Err(source) => {
                error!(agent_type = %runtime.agent_type(), %session_id, error = %source, "Agent runtime invocation failed");
                Err(MessagingError::AgentInvocation {
                    agent_type: runtime.agent_type().clone(),
                    source,
                })
            }
        }
    }

    /// Builds the client-facing response from a raw runtime reply.
    pub async fn generate_agent_response(
        &self,
        response: InvocationResponse,
        runtime: &Runtime,
        session_id: &str,
    ) -> Result<AgentResponse, MessagingError> {
        match runtime.agent_type() {
            AgentType::Tutor => {
                let payload = read_agent_payload(response).await?;
                let data: TutorResponseData = serde_json::from_str(&payload).map_err(|e| {
                    if e.is_data() {
                        MessagingError::unexpected("Missing expected fields in agent response", e)
                    } else {
                        MessagingError::unexpected("Failed to parse agent response JSON", e)
                    }
                })?;

                Ok(AgentResponse {
                    success: true,
                    data,
                    session_id: session_id.to_string(),
                    timestamp: Utc::now(),
                })
            }
            other => Err(MessagingError::InvalidRuntime(other.clone())),
        }
    }
}

/// Reads the body and unwraps the inner JSON string at `content[0].text`.
async fn read_agent_payload(response: InvocationResponse) -> Result<String, MessagingError> {
    let body = response
        .read_body()
        .await
        .map_err(|e| MessagingError::unexpected("Failed to read agent response body", e))?;

    let envelope: ResponseEnvelope = serde_json::from_slice(&body)
        .map_err(|e| MessagingError::unexpected("Failed to parse agent response JSON", e))?;

    envelope
        .content
        .into_iter()
        .next()
        .map(|block| block.text)
        .ok_or(MessagingError::UnexpectedAgentResponse {
            message: "Agent response has no content",
            source: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockAgentRuntimeClient;
    use crate::models::{ErrorType, MessageType};

    const TUTOR_BODY: &str = r#"{"content":[{"text":"{\"message_type\":\"initiation\",\"has_error\":\"NO\",\"conversation_continuation\":\"Hei!\",\"word_tips\":[]}"}]}"#;

    fn tutor_runtime() -> Runtime {
        Runtime::new(AgentType::Tutor, "arn:aws:bedrock-agentcore:eu-central-1:0:runtime/tutor")
    }

    fn prompt(session_id: &str) -> PromptRequest {
        PromptRequest {
            message: "Hello".to_string(),
            session_id: session_id.to_string(),
        }
    }

    fn service_without_calls() -> AgentCommunicationService {
        AgentCommunicationService::new(Arc::new(MockAgentRuntimeClient::new()))
    }

    fn body(raw: &str) -> InvocationResponse {
        InvocationResponse::from_bytes("session_abc123".to_string(), raw.to_string())
    }

    #[test]
    fn test_runtime_session_id_prefix() {
        assert_eq!(runtime_session_id("abc123"), "session_abc123");
        assert_eq!(runtime_session_id(""), "session_");
        assert_eq!(runtime_session_id("session_x"), "session_session_x");
    }

    #[tokio::test]
    async fn test_invoke_agent_builds_request() {
        let mut client = MockAgentRuntimeClient::new();
        client
            .expect_invoke()
            .withf(|req| {
                req.session_id == "session_abc123"
                    && req.runtime_arn.ends_with("runtime/tutor")
                    && req.payload == serde_json::json!({"prompt": "Hello"})
                    && req.qualifier == "DEFAULT"
            })
            .times(1)
            .returning(|req| Ok(InvocationResponse::from_bytes(req.session_id, TUTOR_BODY)));

        let service = AgentCommunicationService::new(Arc::new(client));
        let response = service
            .invoke_agent(&tutor_runtime(), &prompt("abc123"))
            .await
            .unwrap();

        assert_eq!(response.session_id, "session_abc123");
    }

    #[tokio::test]
    async fn test_invoke_agent_wraps_transport_failure() {
        let mut client = MockAgentRuntimeClient::new();
        client
            .expect_invoke()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("connection reset by peer")));

        let service = AgentCommunicationService::new(Arc::new(client));
        let err = service
            .invoke_agent(&tutor_runtime(), &prompt("abc123"))
            .await
            .unwrap_err();

        assert!(matches!(err, MessagingError::AgentInvocation { .. }));
        assert_eq!(err.to_string(), "Failed to invoke agent runtime tutor");
    }

    #[tokio::test]
    async fn test_generate_tutor_response() {
        let service = service_without_calls();
        let response = service
            .generate_agent_response(body(TUTOR_BODY), &tutor_runtime(), "session_abc123")
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.session_id, "session_abc123");
        assert_eq!(response.data.message_type, MessageType::Initiation);
        assert_eq!(response.data.has_error, ErrorType::No);
        assert_eq!(response.data.conversation_continuation, "Hei!");
        assert!(response.data.word_tips.is_empty());
    }

    #[tokio::test]
    async fn test_double_encoded_payload_round_trip() {
        let inner = serde_json::json!({
            "message_type": "feedback",
            "has_error": "YES",
            "feedback_text": "Check the verb ending.",
            "error_details": {"user_mistake": "minä on", "corrections": ["minä olen"]},
            "conversation_continuation": "Kerro lisää!",
            "word_tips": [{"finnish": "olla", "english": "to be"}]
        });
        let envelope = serde_json::json!({"content": [{"text": inner.to_string()}]});

        let response = service_without_calls()
            .generate_agent_response(body(&envelope.to_string()), &tutor_runtime(), "session_x")
            .await
            .unwrap();

        assert_eq!(response.data.conversation_continuation, "Kerro lisää!");
        assert_eq!(response.data.word_tips.len(), 1);
        assert_eq!(response.data.word_tips[0].finnish, "olla");
        assert_eq!(
            response.data.error_details.unwrap().corrections,
            vec!["minä olen"]
        );
    }

    #[tokio::test]
    async fn test_unsupported_runtime_rejected_before_parsing() {
        let runtime = Runtime::new(AgentType::Unsupported("grader".into()), "arn");
        let err = service_without_calls()
            .generate_agent_response(body("not json at all"), &runtime, "session_x")
            .await
            .unwrap_err();

        assert!(matches!(err, MessagingError::InvalidRuntime(_)));
        assert_eq!(err.to_string(), "Unsupported agent runtime type: grader");
    }

    #[tokio::test]
    async fn test_malformed_outer_body() {
        let err = service_without_calls()
            .generate_agent_response(body("<html>Bad Gateway</html>"), &tutor_runtime(), "s")
            .await
            .unwrap_err();

        assert!(matches!(err, MessagingError::UnexpectedAgentResponse { .. }));
        assert_eq!(err.to_string(), "Failed to parse agent response JSON");
    }

    #[tokio::test]
    async fn test_malformed_inner_payload() {
        let raw = r#"{"content":[{"text":"Hei! Olen opettajasi."}]}"#;
        let err = service_without_calls()
            .generate_agent_response(body(raw), &tutor_runtime(), "s")
            .await
            .unwrap_err();

        assert!(matches!(err, MessagingError::UnexpectedAgentResponse { .. }));
        assert_eq!(err.to_string(), "Failed to parse agent response JSON");
    }

    #[tokio::test]
    async fn test_schema_mismatch() {
        let raw = r#"{"content":[{"text":"{\"message_type\":\"initiation\",\"has_error\":\"NO\"}"}]}"#;
        let err = service_without_calls()
            .generate_agent_response(body(raw), &tutor_runtime(), "s")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Missing expected fields in agent response");
    }

    #[tokio::test]
    async fn test_empty_content_list() {
        let err = service_without_calls()
            .generate_agent_response(body(r#"{"content":[]}"#), &tutor_runtime(), "s")
            .await
            .unwrap_err();

        assert!(matches!(err, MessagingError::UnexpectedAgentResponse { source: None, .. }));
    }
}
