use std::path::PathBuf;

use crate::entities::pet::{seed_pets, Pet};
use crate::error::ConfigError;

const DEFAULT_KNOWN_EMAILS: &str = "test@example.com,user@gmail.com";

/// Settings read from the environment (after `.env` has been loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON array of pets to start with instead of the seed roster.
    pub roster_file: Option<PathBuf>,
    /// Emails the registration screen treats as taken.
    pub known_emails: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let roster_file = std::env::var("PAWFOLIO_ROSTER_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let known_emails = std::env::var("PAWFOLIO_KNOWN_EMAILS")
            .unwrap_or_else(|_| DEFAULT_KNOWN_EMAILS.to_string());

        Self {
            roster_file,
            known_emails: parse_list(&known_emails),
        }
    }

    pub fn load_pets(&self) -> Result<Vec<Pet>, ConfigError> {
        let Some(path) = &self.roster_file else {
            return Ok(seed_pets());
        };
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let pets: Vec<Pet> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Json { path: display, source })?;
        tracing::info!(count = pets.len(), "loaded roster file");
        Ok(pets)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roster_file: None,
            known_emails: parse_list(DEFAULT_KNOWN_EMAILS),
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
