//! An abstraction layer for chat backends.
//!
//! This crate establishes a small protocol between the conversation core
//! and whatever delivers the assistant's reply: a request goes out with a
//! [`ChatConfig`] and the user's text, and a [`ChatResponse`] comes back
//! that yields text fragments one by one as they arrive.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod config;
mod error;
mod provider;
mod response;

pub use config::*;
pub use error::*;
pub use provider::*;
pub use response::*;
