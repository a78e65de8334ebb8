//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gateway calls and policy decisions into event/command flows.
//! - Keep the platform adapter decoupled from role logic.

pub mod role_service;
