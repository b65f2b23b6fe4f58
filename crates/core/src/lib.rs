//! Agent construction for the Finnish tutor.
//!
//! Reads agent definitions, resolves API keys, binds each definition to a
//! hosted model and a system prompt, and collects the results in an
//! immutable [`registry::AgentRegistry`].

pub mod agent;
pub mod config;
pub mod error;
pub mod factory;
pub mod message;
pub mod model;
pub mod registry;
pub mod secrets;

pub use agent::{Agent, AgentInput, AgentKind};
pub use error::{AgentError, SecretError};
pub use message::{ContentBlock, Message, Role};
