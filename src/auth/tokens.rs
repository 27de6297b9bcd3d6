// Typed access to the credential pair in client storage

use anyhow::Result;
use std::sync::Arc;

use super::types::{CredentialPair, RefreshResponse};
use crate::storage::{ClientStorage, ACCESS_KEY, REFRESH_KEY};

/// Credential pair persisted under the fixed `access` / `refresh` keys
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn ClientStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.storage.get(ACCESS_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.storage.get(REFRESH_KEY)
    }

    /// Both tokens, if both are present
    pub fn credentials(&self) -> Result<Option<CredentialPair>> {
        match (self.access_token()?, self.refresh_token()?) {
            (Some(access_token), Some(refresh_token)) => Ok(Some(CredentialPair {
                access_token,
                refresh_token,
            })),
            _ => Ok(None),
        }
    }

    /// Store a fresh pair after login
    pub fn store_pair(&self, pair: &CredentialPair) -> Result<()> {
        self.storage.set(ACCESS_KEY, &pair.access_token)?;
        self.storage.set(REFRESH_KEY, &pair.refresh_token)
    }

    /// Store the outcome of a refresh call
    pub fn store_refreshed(&self, data: &RefreshResponse) -> Result<()> {
        self.storage.set(ACCESS_KEY, &data.access)?;
        if let Some(ref refresh) = data.refresh {
            self.storage.set(REFRESH_KEY, refresh)?;
        }
        Ok(())
    }

    /// Drop both tokens
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(ACCESS_KEY)?;
        self.storage.remove(REFRESH_KEY)
    }
}
