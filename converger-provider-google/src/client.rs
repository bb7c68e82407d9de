//! `RemoteCalendar` over the Google Calendar REST API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::SecondsFormat;
use converger_core::remote::ListQuery;
use converger_core::{ConvergeConfig, ConvergeError, ConvergeResult, EventDraft, RemoteCalendar, RemoteEvent};
use reqwest::StatusCode;
use url::Url;

use crate::convert::{from_google, to_google};
use crate::credentials::Credentials;
use crate::session::Session;
use crate::types::{EventsPage, GoogleEvent};

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

pub struct GoogleCalendar {
    http: reqwest::Client,
    access_token: String,
    base_url: Url,
}

impl GoogleCalendar {
    /// Load credentials and a valid session from the paths in `config`.
    pub async fn connect(config: &ConvergeConfig) -> Result<Self> {
        let credentials = Credentials::load(&config.credentials_file)?;
        let session = Session::load_valid(&config.token_file, credentials).await?;

        Self::new(session.access_token())
    }

    pub fn new(access_token: &str) -> Result<Self> {
        Self::with_base_url(access_token, API_BASE)
    }

    /// Point the client at another API root (e.g. a local stub server in tests).
    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Self> {
        Ok(GoogleCalendar {
            http: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: Url::parse(base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?,
        })
    }

    /// `{base}/calendars/{calendar_id}/events[/{event_id}]`, with ids percent-encoded.
    pub fn events_url(&self, calendar_id: &str, event_id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("API base URL cannot have a path"))?;
            segments.pop_if_empty().push("calendars").push(calendar_id).push("events");
            if let Some(event_id) = event_id {
                segments.push(event_id);
            }
        }
        Ok(url)
    }

    pub fn list_url(&self, calendar_id: &str, query: &ListQuery) -> Result<Url> {
        let mut url = self.events_url(calendar_id, None)?;
        url.query_pairs_mut()
            .append_pair("showDeleted", &query.show_deleted.to_string())
            .append_pair("singleEvents", &query.single_events.to_string())
            .append_pair("timeMin", &query.time_min.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("q", &query.query)
            .append_pair("maxResults", &query.max_results.to_string())
            .append_pair("orderBy", &query.order_by.to_string());
        Ok(url)
    }

    async fn list(&self, calendar_id: &str, query: &ListQuery) -> Result<Vec<RemoteEvent>> {
        let url = self.list_url(calendar_id, query)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to fetch events")?;

        let page: EventsPage = check(response, "fetch events")
            .await?
            .json()
            .await
            .context("Failed to parse events response")?;

        if page.next_page_token.is_some() {
            tracing::debug!(calendar_id, "more events beyond maxResults were not fetched");
        }

        Ok(page
            .items
            .into_iter()
            .filter(|e| e.status != "cancelled" && !e.id.is_empty())
            .map(from_google)
            .collect())
    }

    async fn delete(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let url = self.events_url(calendar_id, Some(event_id))?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("Failed to delete event: {}", event_id))?;

        // 410: someone else deleted it between list and delete. The goal
        // state is reached, so this is not a failure.
        if response.status() == StatusCode::GONE {
            tracing::info!(calendar_id, event_id, "event was already deleted");
            return Ok(());
        }

        check(response, &format!("delete event {}", event_id)).await?;
        Ok(())
    }

    async fn insert(&self, calendar_id: &str, draft: &EventDraft) -> Result<RemoteEvent> {
        let url = self.events_url(calendar_id, None)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&to_google(draft))
            .send()
            .await
            .with_context(|| format!("Failed to create event: {}", draft.title))?;

        let created: GoogleEvent = check(response, &format!("create event {}", draft.title))
            .await?
            .json()
            .await
            .context("Failed to parse created event")?;

        Ok(from_google(created))
    }
}

/// Turn a non-success HTTP status into an error carrying the response body.
async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    anyhow::bail!("Failed to {}: HTTP {} - {}", what, status, error_text)
}

fn remote_error(err: anyhow::Error) -> ConvergeError {
    ConvergeError::Remote(format!("{:#}", err))
}

#[async_trait]
impl RemoteCalendar for GoogleCalendar {
    async fn list_events(&self, calendar_id: &str, query: &ListQuery) -> ConvergeResult<Vec<RemoteEvent>> {
        self.list(calendar_id, query).await.map_err(remote_error)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ConvergeResult<()> {
        self.delete(calendar_id, event_id).await.map_err(remote_error)
    }

    async fn insert_event(&self, calendar_id: &str, draft: &EventDraft) -> ConvergeResult<RemoteEvent> {
        self.insert(calendar_id, draft).await.map_err(remote_error)
    }
}
