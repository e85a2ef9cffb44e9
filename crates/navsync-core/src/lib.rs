//! Navsync Core — shared abstractions.
//!
//! This crate defines the capability traits the synchronization logic is
//! written against (the video player and the hosting page) together with the
//! small set of types every other crate depends on. It contains no
//! infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod page;
pub mod player;
