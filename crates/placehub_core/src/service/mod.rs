//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate evaluator and repository calls into use-case level APIs.
//! - Keep route/UI layers decoupled from storage and state machine details.

pub mod placement_service;
