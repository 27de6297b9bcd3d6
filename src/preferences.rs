// UI preferences persisted next to the credentials

use anyhow::anyhow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::storage::{ClientStorage, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ApiError::Internal(anyhow!("Unknown theme: {}", other))),
        }
    }
}

/// Theme preference under the fixed `theme` key
pub struct Preferences {
    storage: Arc<dyn ClientStorage>,
}

impl Preferences {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    /// Stored theme; missing or unknown values read as light
    pub fn theme(&self) -> Result<Theme> {
        let stored = self
            .storage
            .get(THEME_KEY)
            .map_err(|e| ApiError::Storage(format!("{:#}", e)))?;

        Ok(stored
            .and_then(|value| value.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage
            .set(THEME_KEY, theme.as_str())
            .map_err(|e| ApiError::Storage(format!("{:#}", e)))
    }
}
