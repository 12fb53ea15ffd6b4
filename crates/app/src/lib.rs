//! # Autonomos App
//!
//! Composition root and terminal host for the session subsystem.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Terminal implementations of the navigator and expiry prompt
//! - The `login`, `status`, `logout` and `watch` commands
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the session services to the terminal
//! - The `autonomos` binary is a thin argument parser over [`commands`]

pub mod commands;
pub mod context;
pub mod terminal;

pub use context::AppContext;
pub use terminal::{TerminalNavigator, TerminalPrompt};
