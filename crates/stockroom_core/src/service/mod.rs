//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate refresh, resolution, validation and commit for every
//!   inventory operation.
//! - Keep HTTP and tool-protocol front-ends decoupled from storage details.

pub mod inventory_service;
