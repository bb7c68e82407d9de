//! OAuth client credentials.
//!
//! Read from the `credentials.json` file downloaded from the Google Cloud
//! console (APIs & Services > Credentials > OAuth client ID).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// The downloaded file nests the credentials under the client type.
#[derive(Deserialize)]
struct CredentialsFile {
    installed: Option<Credentials>,
    web: Option<Credentials>,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google credentials not found at {}.\n\n\
                Create an OAuth client ID of type \"Desktop app\" at\n\
                https://console.cloud.google.com/apis/credentials\n\
                and download its JSON to that path.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let file: CredentialsFile = serde_json::from_str(contents)?;

        file.installed
            .or(file.web)
            .context("Expected an \"installed\" or \"web\" client section")
    }
}
