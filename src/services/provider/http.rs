use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{MeetingProviderSync, ProviderEventUpdate};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Provider client that moves events through a JSON HTTP endpoint:
/// `PATCH {endpoint}/meetings/{meeting_id}`.
pub struct HttpMeetingProvider {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpMeetingProvider {
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self> {
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://localhost") {
            return Err(anyhow!("Provider endpoint must use HTTPS"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to build provider HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn event_url(&self, meeting_id: &str) -> String {
        format!(
            "{}/meetings/{}",
            self.endpoint,
            urlencoding::encode(meeting_id)
        )
    }

    fn excerpt(body: &str) -> String {
        let trimmed = body.trim();
        if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
            return trimmed.to_string();
        }
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", cut)
    }
}

#[async_trait]
impl MeetingProviderSync for HttpMeetingProvider {
    async fn update_event(&self, update: ProviderEventUpdate) -> Result<()> {
        let url = self.event_url(&update.meeting_id);

        let mut request = self.client.patch(&url).json(&update);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Network error while updating provider event {}", update.meeting_id))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Provider rejected update for meeting {} with HTTP status {}: {}",
                update.meeting_id,
                status,
                Self::excerpt(&body)
            ));
        }

        log::info!(
            "Provider event for meeting {} moved to {} ({})",
            update.meeting_id,
            update.start_time,
            update.timezone
        );
        Ok(())
    }
}
