pub mod app;
pub mod config;
pub mod conversation;
pub mod keyring;
pub mod language;
pub mod message;
pub mod orchestrator;
pub mod persona;
pub mod source_script;
pub mod speech;
