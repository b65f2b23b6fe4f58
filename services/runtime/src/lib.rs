//! Tutor Agent Runtime
//!
//! The process deployed behind the agent-runtime hosting service. It builds
//! the agent registry once at startup and answers each invocation by running
//! the learner's prompt through the teacher agent and handing the teacher's
//! reply to the extractor agent, which turns it into the structured tutor
//! payload.

pub mod config;
pub mod handlers;
pub mod pipeline;
pub mod router;
