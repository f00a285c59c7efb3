//! Core business logic module
//!
//! Decides what happens to a device and what lands on it. Side effects go
//! through the collaborator traits defined here and implemented in
//! [`crate::infra`].
//!
//! # Submodules
//!
//! - [`manifest`] - Deployment manifest model
//! - [`resolver`] - Manifest resolution onto a target root
//! - [`state`] - Device state and the provisioning plan
//! - [`provision`] - Device-mode orchestration
//! - [`publish`] - Distribution bundle output

pub mod manifest;
pub mod provision;
pub mod publish;
pub mod resolver;
pub mod state;
