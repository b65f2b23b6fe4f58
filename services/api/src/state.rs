//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the read-only
//! resources every request handler shares.

use crate::{config::Config, runtime::Runtime, service::AgentCommunicationService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
/// All fields are public to be accessible from other modules.
#[derive(Clone)]
pub struct AppState {
    pub agent_service: Arc<AgentCommunicationService>,
    pub tutor_runtime: Arc<Runtime>,
    pub config: Arc<Config>,
}
