use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{retrieval_error, BotResult};

/// Google's OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Source of bearer tokens for the calendar API
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return a currently valid access token
    async fn access_token(&self) -> BotResult<String>;
}

/// Fixed access token, e.g. from the environment or in tests
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn access_token(&self) -> BotResult<String> {
        Ok(self.token.clone())
    }
}

/// OAuth token as persisted in the token file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl StoredToken {
    /// A token without an expiry is assumed valid
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(expiry) if expiry <= now)
    }
}

/// Response of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_stored(self, previous_refresh: Option<String>) -> StoredToken {
        let expires_in = self.expires_in.unwrap_or(3600);
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at: Some(Utc::now().timestamp() + expires_in),
        }
    }
}

/// Token manager backed by a JSON file, refreshing expired tokens
pub struct FileTokenStore {
    path: PathBuf,
    client_id: String,
    client_secret: String,
    token_url: String,
    client: Client,
    // Serializes read-refresh-write cycles on the token file
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, client_id: &str, client_secret: &str) -> Self {
        Self {
            path: path.into(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client: Client::new(),
            lock: Mutex::new(()),
        }
    }

    /// Use a different token endpoint
    pub fn with_token_url(mut self, token_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the token file
    pub async fn load(&self) -> BotResult<StoredToken> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            retrieval_error(&format!(
                "No valid token found at {}: {}. Run get_calendar_token first.",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| retrieval_error(&format!("Failed to parse token JSON: {}", e)))
    }

    /// Write the token file, creating its directory if needed
    pub async fn save(&self, token: &StoredToken) -> BotResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Token saved to {}", self.path.display());

        Ok(())
    }

    /// Exchange an authorization code for a token (consent flow)
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> BotResult<StoredToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        let response = self.request_token(&params).await?;
        Ok(response.into_stored(None))
    }

    /// Refresh an expired token
    async fn refresh(&self, token: &StoredToken) -> BotResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| retrieval_error("Token expired and no refresh token is stored"))?;

        info!("Refreshing Google Calendar access token");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let response = self.request_token(&params).await?;
        Ok(response.into_stored(Some(refresh_token.to_string())))
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> BotResult<TokenResponse> {
        let response = self
            .client
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| retrieval_error(&format!("Failed to request token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(retrieval_error(&format!(
                "Failed to request token: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| retrieval_error(&format!("Failed to parse token response: {}", e)))
    }
}

#[async_trait]
impl CredentialProvider for FileTokenStore {
    async fn access_token(&self) -> BotResult<String> {
        let _guard = self.lock.lock().await;

        let token = self.load().await?;
        if !token.is_expired(Utc::now().timestamp()) {
            return Ok(token.access_token);
        }

        let refreshed = self.refresh(&token).await?;
        self.save(&refreshed).await?;
        Ok(refreshed.access_token)
    }
}
