//! taskdash - Task Dashboard Library
//!
//! Core functionality for the taskdash CLI and dashboard: a locally
//! persisted, order-preserving task store with due-date tracking.
//!
//! # Core Concepts
//!
//! - **Task Store**: the authoritative ordered collection; every mutation
//!   yields a fresh snapshot and is mirrored to the state file
//! - **Overdue Sweep**: pending tasks past their due date are promoted to
//!   overdue whenever a view renders
//! - **Derived View**: ephemeral status filter + title search, never
//!   persisted and never written back
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskdash.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task data model and due-date handling
//! - `store`: The task store and its persistence seam
//! - `view`: Filter/search derived view
//! - `storage`: JSON state file and data directory resolution
//! - `lock`: File locking and atomic writes
//! - `output`: Shared CLI output formatting
//! - `ui`: Interactive ratatui dashboard

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;
pub mod view;

pub use error::{Error, Result};
