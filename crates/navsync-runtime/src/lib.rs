//! Navsync runtime — wires the controller to its event sources.
//!
//! One tokio task owns the [`NavSync`](navsync_navigation::application::command_handlers::NavSync)
//! controller and processes page events strictly in order, so a navigation
//! is never interleaved with another one.

pub mod config;
pub mod error;
pub mod runtime;
pub mod sim;
pub mod telemetry;
