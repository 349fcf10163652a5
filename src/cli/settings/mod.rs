//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`] registered in the
//! [`SettingRegistry`]; handlers edit a loaded [`Config`] and the caller
//! persists it.

pub mod error;
pub mod handlers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

pub trait SettingHandler: Send + Sync {
    fn key(&self) -> &'static str;

    /// Apply `args` (the words after the key) and return a success message.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    fn unset(&self, config: &mut Config) -> Result<String, SettingError>;
}

/// `guruchat set [key [value...]]`. Without a key, lists every setting.
pub fn run_set(key: Option<String>, value: Vec<String>) -> Result<(), SettingError> {
    let Some(key) = key else {
        Config::load()?.print_all();
        return Ok(());
    };

    let registry = SettingRegistry::new();
    let handler = registry.lookup(&key)?;
    let message = Config::mutate(|config| handler.set(&value, config))??;
    println!("{message}");
    Ok(())
}

pub fn run_unset(key: String) -> Result<(), SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry.lookup(&key)?;
    let message = Config::mutate(|config| handler.unset(config))??;
    println!("{message}");
    Ok(())
}
