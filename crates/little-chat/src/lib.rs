//! A terminal chat client for the little-chat backend.
//!
//! The crate includes a CLI tool for using in the terminal. The settings
//! and command handling are exposed as a library so other front ends can
//! share them.

#![deny(missing_docs)]

pub mod command;
pub mod interrupt;
pub mod settings;

pub use command::Command;
pub use settings::Settings;

/// Re-exports of [`little_chat_core`] crate.
pub mod core {
    pub use little_chat_core::*;
}
