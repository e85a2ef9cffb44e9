//! Application layer: the `NavSync` controller and read-only views.

pub mod command_handlers;
pub mod query_handlers;
