//! Guruchat is a persona-based chat client for Google's Gemini models with
//! speech input and output.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the persona and conversation stores, the speech session
//!   controller, speech output, and the chat orchestrator that ties a
//!   submission to its completion.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop.
//! - [`api`] defines the Gemini wire payloads and the completion client.
//! - [`auth`] resolves the API key from the environment or the keyring.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which drives [`core::app::App`] for
//! interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
