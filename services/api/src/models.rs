//! API Models
//!
//! Request and response bodies of the messaging API, together with the
//! structured payload the tutor agent returns. `utoipa` derives feed the
//! OpenAPI document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Required data for an agent runtime invocation.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct PromptRequest {
    #[schema(example = "Hei! Mitä kuuluu?")]
    pub message: String,
    #[serde(rename = "sessionId")]
    #[schema(example = "abc123")]
    pub session_id: String,
}

/// Where the tutor message sits in the conversation.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Initiation,
    Feedback,
    Conclusion,
}

/// Whether the learner's message contained mistakes.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorType {
    Yes,
    No,
    Minor,
}

/// A learner mistake and how to fix it.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default, PartialEq)]
pub struct ErrorDetail {
    pub user_mistake: Option<String>,
    #[serde(default)]
    pub corrections: Vec<String>,
    pub explanation: Option<String>,
}

/// A difficult word with its translation.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct WordTip {
    #[schema(example = "kiitos")]
    pub finnish: String,
    #[schema(example = "thank you")]
    pub english: String,
}

/// Structured payload produced by the tutor agent.
///
/// Only the shape is validated; which optional fields are present for a given
/// `message_type` is up to the agent.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct TutorResponseData {
    pub message_type: MessageType,
    pub has_error: ErrorType,
    pub feedback_text: Option<String>,
    pub error_details: Option<ErrorDetail>,
    pub greeting: Option<String>,
    pub scenario: Option<String>,
    pub conversation_continuation: String,
    pub word_tips: Vec<WordTip>,
}

/// Response envelope returned to the client.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct AgentResponse {
    pub success: bool,
    pub data: TutorResponseData,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}
