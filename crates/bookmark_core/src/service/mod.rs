//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI/transport layers decoupled from storage details.

pub mod bookmark_service;
pub mod user_service;
