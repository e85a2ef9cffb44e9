//! Domain model: the navigation state aggregate, its commands and the
//! journal events it records.

pub mod aggregates;
pub mod commands;
pub mod events;
