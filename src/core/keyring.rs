use thiserror::Error;

/// Keyring service under which the API key is stored.
pub const KEYRING_SERVICE: &str = "guruchat";
/// Keyring user name for the Gemini API key.
pub const KEYRING_USER: &str = "gemini";

/// Describes failures when attempting to access the system keyring.
///
/// Recoverable errors mean the credential backend was temporarily
/// unavailable (a locked keychain, a missing secret-service daemon).
/// Permanent errors surface the underlying cause directly.
#[derive(Debug, Error)]
pub enum KeyringAccessError {
    #[error("keyring temporarily unavailable: {0}")]
    Recoverable(#[source] keyring::Error),
    #[error("{0}")]
    Permanent(#[source] keyring::Error),
}

impl KeyringAccessError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_failures_are_recoverable() {
        let err = KeyringAccessError::from(keyring::Error::PlatformFailure("locked".into()));
        assert!(err.is_recoverable());

        let err = KeyringAccessError::from(keyring::Error::NoEntry);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), keyring::Error::NoEntry.to_string());
    }
}
