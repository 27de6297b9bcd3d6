use reqwest::Method;
use serde_json::Value;

use crate::auth::{CredentialPair, LoginRequest, TokenPairResponse};
use crate::error::{ApiError, Result};
use crate::http_client::ApiClient;
use crate::models::account::PasswordResetConfirm;

/// Login, registration, profile and password flows under `/auth/`
pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and store the returned token pair
    pub async fn login(&self, username: &str, password: &str) -> Result<CredentialPair> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let pair: TokenPairResponse = self
            .client
            .send_public(self.client.request(Method::POST, "/auth/login/")?.json(&body))
            .await?;

        let pair = CredentialPair::from(pair);
        self.client
            .tokens()
            .store_pair(&pair)
            .map_err(|e| ApiError::Storage(format!("{:#}", e)))?;

        tracing::info!(username, "Logged in");
        Ok(pair)
    }

    /// Create an account; does not log in
    pub async fn register(&self, fields: &Value) -> Result<Value> {
        self.client
            .send_public(self.client.request(Method::POST, "/auth/register/")?.json(fields))
            .await
    }

    /// Forget the stored token pair
    pub fn logout(&self) -> Result<()> {
        self.client
            .tokens()
            .clear()
            .map_err(|e| ApiError::Storage(format!("{:#}", e)))?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Refresh the access token now, sharing any refresh already running
    pub async fn refresh(&self) -> Result<String> {
        self.client.refresh_access_token().await
    }

    pub async fn profile(&self) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::GET, "/auth/profile/")?)
            .await
    }

    pub async fn update_profile(&self, fields: &Value) -> Result<Value> {
        self.client
            .send_json(self.client.request(Method::PUT, "/auth/profile/")?.json(fields))
            .await
    }

    pub async fn change_password(&self, fields: &Value) -> Result<Value> {
        self.client
            .send_json(
                self.client
                    .request(Method::POST, "/auth/password/change/")?
                    .json(fields),
            )
            .await
    }

    pub async fn request_password_reset(&self, fields: &Value) -> Result<Value> {
        self.client
            .send_public(
                self.client
                    .request(Method::POST, "/auth/password_reset/")?
                    .json(fields),
            )
            .await
    }

    pub async fn confirm_password_reset(
        &self,
        uid: &str,
        token: &str,
        new_password: &str,
    ) -> Result<Value> {
        let body = PasswordResetConfirm {
            new_password: new_password.to_string(),
        };
        let path = format!("/auth/reset/{}/{}/", uid, token);
        self.client
            .send_public(self.client.request(Method::POST, &path)?.json(&body))
            .await
    }
}
