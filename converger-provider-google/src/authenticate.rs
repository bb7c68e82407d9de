//! Interactive OAuth flow: consent in the browser, code back on a loopback
//! listener, token saved to the configured token file.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::credentials::Credentials;
use crate::session::{Session, request_token};

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

pub fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// Build the URL the user opens to grant calendar access.
pub fn consent_url(credentials: &Credentials, state: &str) -> Result<url::Url> {
    let mut url = url::Url::parse(AUTH_URL)?;
    url.query_pairs_mut()
        .append_pair("client_id", &credentials.client_id)
        .append_pair("redirect_uri", &redirect_uri())
        .append_pair("response_type", "code")
        .append_pair("scope", &SCOPES.join(" "))
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("state", state);
    Ok(url)
}

/// Run the OAuth flow and store the resulting token at `token_path`.
pub async fn authenticate(credentials_path: &Path, token_path: &Path) -> Result<()> {
    let credentials = Credentials::load(credentials_path)?;
    let state = uuid::Uuid::new_v4().simple().to_string();
    let auth_url = consent_url(&credentials, &state)?;

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(auth_url.as_str()).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, returned_state) = wait_for_callback().await?;
    if returned_state != state {
        anyhow::bail!("OAuth state mismatch; refusing the callback");
    }

    eprintln!("\nReceived authorization code, exchanging for tokens...");

    let redirect = redirect_uri();
    let params = [
        ("code", code.as_str()),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("redirect_uri", redirect.as_str()),
        ("grant_type", "authorization_code"),
    ];
    let token = request_token(&params)
        .await
        .context("Failed to exchange authorization code")?
        .into_token(None)?;

    Session::new(token_path, credentials, token).save()?;

    eprintln!("Authentication successful! Token saved to {}", token_path.display());

    Ok(())
}

async fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(redirect_address())
        .await
        .context("Failed to bind OAuth callback listener")?;

    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let (code, state) = parse_callback(&request_line)?;

    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    Ok((code, state))
}

/// Extract `code` and `state` from the callback's HTTP request line.
fn parse_callback(request_line: &str) -> Result<(String, String)> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    if let Some((_, error)) = url.query_pairs().find(|(k, _)| k == "error") {
        anyhow::bail!("Authorization was denied: {}", error);
    }

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No code in callback"))?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No state in callback"))?;

    Ok((code, state))
}
