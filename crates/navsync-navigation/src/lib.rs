//! Navsync — navigation / player synchronization.
//!
//! Responsible for keeping exactly one section active across the three
//! sources of truth (playback position, user navigation, URL fragment) and
//! for keeping the player→UI and UI→player feedback loops from fighting.

pub mod application;
pub mod domain;
