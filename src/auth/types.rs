// Authentication types

use serde::{Deserialize, Serialize};

/// Access/refresh token pair as persisted in client storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token pair returned by the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

impl From<TokenPairResponse> for CredentialPair {
    fn from(pair: TokenPairResponse) -> Self {
        Self {
            access_token: pair.access,
            refresh_token: pair.refresh,
        }
    }
}

/// Refresh request body
#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response
/// `refresh` is only present when the backend rotates refresh tokens
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}
