//! Messaging API Library Crate
//!
//! This library contains the mediation between the HTTP chat endpoint and the
//! deployed tutor agent runtime: configuration, the runtime invocation client,
//! response reshaping, handlers and routing. The `api` binary is a thin
//! wrapper around this library.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod runtime;
pub mod service;
pub mod state;
