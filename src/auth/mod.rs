//! Gemini API key storage and lookup.
//!
//! Lookup order: `GEMINI_API_KEY`, `GOOGLE_GENERATIVE_AI_API_KEY`, then the
//! system keyring.

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

use crate::core::keyring::{KeyringAccessError, KEYRING_SERVICE, KEYRING_USER};

mod ui;

use self::ui::{prompt_api_key, prompt_confirmation, ConfirmationChoice};

pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_GENERATIVE_AI_API_KEY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Env(&'static str),
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApiKey {
    pub key: String,
    pub source: ApiKeySource,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No Gemini API key found. Set GEMINI_API_KEY or run 'guruchat auth'.")]
    Missing,
    #[error("Keyring error: {0}")]
    Keyring(#[from] KeyringAccessError),
    #[error("API key cannot be empty")]
    EmptyKey,
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err.into())
    }
}

pub struct AuthManager {
    use_keyring: bool,
}

impl AuthManager {
    pub fn new() -> Self {
        Self::new_with_keyring(true)
    }

    /// Construct an AuthManager, optionally disabling keyring access (useful for tests)
    pub fn new_with_keyring(use_keyring: bool) -> Self {
        Self { use_keyring }
    }

    fn entry() -> Result<Entry, AuthError> {
        Ok(Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
    }

    pub fn store_key(&self, key: &str) -> Result<(), AuthError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AuthError::EmptyKey);
        }
        if !self.use_keyring {
            return Ok(());
        }
        Self::entry()?.set_password(key)?;
        Ok(())
    }

    pub fn get_key(&self) -> Result<Option<String>, AuthError> {
        if !self.use_keyring {
            return Ok(None);
        }
        match Self::entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns false when no key was stored.
    pub fn remove_key(&self) -> Result<bool, AuthError> {
        if !self.use_keyring {
            return Ok(false);
        }
        match Self::entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    pub fn resolve_api_key(&self) -> Result<ResolvedApiKey, AuthError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve against an arbitrary environment lookup. Blank values are
    /// skipped.
    pub fn resolve_with<F>(&self, env: F) -> Result<ResolvedApiKey, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for name in API_KEY_ENV_VARS {
            if let Some(key) = env(name).filter(|value| !value.trim().is_empty()) {
                debug!(source = name, "using API key from environment");
                return Ok(ResolvedApiKey {
                    key: key.trim().to_string(),
                    source: ApiKeySource::Env(name),
                });
            }
        }

        match self.get_key()? {
            Some(key) => {
                debug!("using API key from keyring");
                Ok(ResolvedApiKey {
                    key,
                    source: ApiKeySource::Keyring,
                })
            }
            None => Err(AuthError::Missing),
        }
    }

    pub fn interactive_auth(&self) -> Result<(), Box<dyn std::error::Error>> {
        let key = prompt_api_key()?;
        self.store_key(&key)?;

        println!();
        println!("✅ API key stored securely in the system keyring.");
        println!("You can now use guruchat without setting environment variables.");
        Ok(())
    }

    pub fn interactive_deauth(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.get_key()?.is_none() {
            println!("No API key is stored in the keyring.");
            return Ok(());
        }

        match prompt_confirmation("Remove the stored Gemini API key?")? {
            ConfirmationChoice::Yes => {
                self.remove_key()?;
                println!("✅ API key removed.");
            }
            ConfirmationChoice::No | ConfirmationChoice::Cancel => println!("Cancelled."),
        }
        Ok(())
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}
