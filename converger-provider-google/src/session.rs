//! Creates a valid Google session (access token) that we can use to call the Calendar API

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh a little before the real expiry so a run never starts with a
/// token that dies mid-way.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Stored OAuth token, kept in the token file as JSON.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub refresh_token: String,
    pub expiry: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Response of the OAuth token endpoint.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl TokenResponse {
    /// Google typically doesn't return a new refresh_token on refresh
    pub(crate) fn into_token(self, previous_refresh_token: Option<&str>) -> Result<Token> {
        let refresh_token = self
            .refresh_token
            .or_else(|| previous_refresh_token.map(str::to_string))
            .context("Token response did not include a refresh token")?;

        Ok(Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(default_token_type),
            refresh_token,
            expiry: Utc::now() + Duration::seconds(self.expires_in),
        })
    }
}

pub struct Session {
    path: PathBuf,
    credentials: Credentials,
    token: Token,
}

impl Session {
    pub fn new(path: &Path, credentials: Credentials, token: Token) -> Self {
        Session {
            path: path.to_path_buf(),
            credentials,
            token,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    /// Load a session and refresh it if expired.
    pub async fn load_valid(path: &Path, credentials: Credentials) -> Result<Self> {
        let mut session = Self::load(path, credentials)?;

        if session.is_expired() {
            tracing::debug!(path = %path.display(), "access token expired, refreshing");
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load(path: &Path, credentials: Credentials) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth token not found at {}.\n\
                Run `gcal-converger auth` first.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Google OAuth token from {}", path.display()))?;

        let token: Token = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse Google OAuth token from {}", path.display()))?;

        Ok(Self::new(path, credentials, token))
    }

    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.token).context("Failed to serialize token")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write token to {}", self.path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }

    fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_LEEWAY_SECS) >= self.token.expiry
    }

    async fn refresh(&mut self) -> Result<()> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.token.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response: TokenResponse = request_token(&params).await.context("Failed to refresh token")?;

        self.token = response.into_token(Some(self.token.refresh_token.as_str()))?;
        self.save()?;

        Ok(())
    }
}

/// POST a form to the token endpoint.
pub(crate) async fn request_token(params: &[(&str, &str)]) -> Result<TokenResponse> {
    let response = reqwest::Client::new()
        .post(TOKEN_URL)
        .form(params)
        .send()
        .await
        .context("Failed to send token request")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Token endpoint returned HTTP {}: {}", status, error_text);
    }

    response.json().await.context("Failed to parse token response")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(refresh_token: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "new-access".to_string(),
            expires_in: 3599,
            refresh_token: refresh_token.map(str::to_string),
            token_type: None,
        }
    }

    #[test]
    fn refresh_keeps_previous_refresh_token() {
        let token = response(None).into_token(Some("old-refresh")).unwrap();

        assert_eq!(token.access_token, "new-access");
        assert_eq!(token.refresh_token, "old-refresh");
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expiry > Utc::now());
    }

    #[test]
    fn first_exchange_requires_refresh_token() {
        assert!(response(None).into_token(None).is_err());
        assert_eq!(response(Some("r")).into_token(None).unwrap().refresh_token, "r");
    }

    #[test]
    fn token_file_round_trips_through_save() {
        let path = std::env::temp_dir().join(format!("gcal-converger-token-{}.json", std::process::id()));
        let creds = Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        let token = response(Some("r")).into_token(None).unwrap();

        Session::new(&path, creds.clone(), token).save().unwrap();
        let loaded = Session::load(&path, creds).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.access_token(), "new-access");
        assert!(!loaded.is_expired());
    }

    #[test]
    fn missing_token_file_points_at_auth() {
        let creds = Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        let err = Session::load(Path::new("/nonexistent/token.json"), creds).err().unwrap();
        assert!(err.to_string().contains("gcal-converger auth"));
    }
}
