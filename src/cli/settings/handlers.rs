//! Data-driven handlers for on/off and free-text settings.

use super::error::SettingError;
use super::SettingHandler;
use crate::core::config::data::Config;

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str, default_display: &str) -> String {
    format!("✅ Unset {key} (will use default: {default_display})")
}

pub struct BooleanHandler {
    pub key: &'static str,
    pub hint: &'static str,
    pub example: &'static str,
    pub default_display: &'static str,
    pub set_field: fn(&mut Config, Option<bool>),
}

impl SettingHandler for BooleanHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let input = args.join(" ");
        let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
        (self.set_field)(config, Some(value));
        Ok(success_set(self.key, format_bool(value)))
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        (self.set_field)(config, None);
        Ok(success_unset(self.key, self.default_display))
    }
}

/// Handler for a single string value, optionally validated and
/// canonicalized before it is stored.
pub struct TextHandler {
    pub key: &'static str,
    pub hint: &'static str,
    pub example: &'static str,
    pub default_display: &'static str,
    pub set_field: fn(&mut Config, Option<String>),
    pub validate: fn(&str) -> Result<String, SettingError>,
}

impl SettingHandler for TextHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = args.join(" ");
        if input.trim().is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let value = (self.validate)(input.trim())?;
        let message = success_set(self.key, if value.is_empty() { "none" } else { value.as_str() });
        (self.set_field)(config, Some(value));
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> Result<String, SettingError> {
        (self.set_field)(config, None);
        Ok(success_unset(self.key, self.default_display))
    }
}

pub fn accept_any(input: &str) -> Result<String, SettingError> {
    Ok(input.to_string())
}
