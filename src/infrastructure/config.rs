use crate::core::record::{FieldSet, UnknownFieldSet};
use std::env;
use std::path::PathBuf;
use teloxide::types::ChatId;
use thiserror::Error;

const DEFAULT_CLASSES_FILE: &str = "classes.json";
const DEFAULT_PORT: u16 = 10000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN is not set")]
    MissingToken,
    #[error("CLASS_FIELDS is invalid: {0}")]
    InvalidFieldSet(#[from] UnknownFieldSet),
    #[error("PORT '{0}' is not a valid port number")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub admin_chat: Option<ChatId>,
    pub classes_file: PathBuf,
    pub fields: FieldSet,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = present("TELEGRAM_BOT_TOKEN")
            .or_else(|| present("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let admin_chat = present("ADMIN_CHAT_ID").and_then(|raw| match raw.trim().parse::<i64>() {
            Ok(id) => Some(ChatId(id)),
            Err(e) => {
                log::warn!("Ignoring ADMIN_CHAT_ID '{}': {}", raw, e);
                None
            }
        });

        let classes_file = present("CLASSES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLASSES_FILE));

        let fields = match present("CLASS_FIELDS") {
            Some(raw) => raw.parse()?,
            None => FieldSet::default(),
        };

        let port = match present("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            token,
            admin_chat,
            classes_file,
            fields,
            port,
        })
    }
}
