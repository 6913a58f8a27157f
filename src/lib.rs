//! Remediation planning for accessibility scan results.
//!
//! A [`catalog::Catalog`] maps scanner issue ids to fix guidance. The
//! [`plan`] functions turn a batch of [`crate::core::DetectedIssue`]s into a total
//! effort estimate, a legal-risk assessment and a display order, and
//! [`engine::Engine`] combines them into a [`crate::core::RemediationReport`].

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod exit;
pub mod logging;
pub mod plan;
pub mod ui;
