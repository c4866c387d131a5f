//! # greeter-client
//!
//! Rust client library for the greeter login and greetings services.
//!
//! This crate provides:
//! - [`GreeterClient`], an async client issuing one request per operation
//! - [`SessionSlot`], the explicit session context passed to every
//!   authenticated call, and [`SessionStore`] implementations to keep it
//!   between runs
//! - [`ClientConfig`], TOML + environment configuration
//! - Wire types for the JSON bodies both services exchange

#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use auth::TokenEncoding;
pub use client::GreeterClient;
pub use config::{ClientConfig, ConfigManager};
pub use error::{Error, Result};
pub use session::{
    AuthStatus, FileSessionStore, MemorySessionStore, Session, SessionSlot, SessionStore,
};
