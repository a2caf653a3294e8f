//! Per-platform "does this handle exist" heuristics.
//!
//! None of the platforms reliably answer 404 for an unknown handle, so each
//! one is read differently: LeetCode through the `errors` field of a GraphQL
//! reply, HackerRank through the title of the page it serves, and the rest
//! through the URL they finally land on after redirects.

use crate::config::{EndpointConfig, Settings};
use crate::domain::model::{Platform, ProbeOutcome, Strategy};
use crate::domain::ports::Probe;
use crate::utils::error::{Result, VerifyError};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

const LEETCODE_RANKING_FIELDS: &str =
    "attendedContestsCount rating globalRanking totalParticipants topPercentage";

pub struct HttpClassifier {
    client: Client,
    user_agent: String,
    endpoints: BTreeMap<Platform, EndpointConfig>,
}

impl HttpClassifier {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            user_agent: settings.user_agent.clone(),
            endpoints: Platform::ALL
                .into_iter()
                .map(|p| (p, settings.endpoint(p).clone()))
                .collect(),
        })
    }

    fn endpoint(&self, platform: Platform) -> &EndpointConfig {
        &self.endpoints[&platform]
    }

    /// The URL a probe for `handle` is sent to.
    pub fn probe_url(&self, platform: Platform, handle: &str) -> Result<String> {
        let endpoint = self.endpoint(platform);
        match platform.strategy() {
            Strategy::GraphQl => leetcode_query_url(&endpoint.profile_url, handle),
            Strategy::PageTitle | Strategy::RedirectCheck => {
                Ok(format!("{}{}", endpoint.profile_url, handle))
            }
        }
    }

    async fn probe_graphql(&self, url: &str) -> Result<ProbeOutcome> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let resolved = response.url().to_string();
        tracing::debug!("GraphQL response status: {}", status);

        if status != StatusCode::OK {
            return Ok(ProbeOutcome::not_found(resolved));
        }

        let body = response.text().await?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| VerifyError::UnexpectedResponse {
                url: resolved.clone(),
                reason: format!("body is not JSON: {}", e),
            })?;

        if has_errors(&json) {
            Ok(ProbeOutcome::not_found(resolved))
        } else {
            Ok(ProbeOutcome::exists(resolved))
        }
    }

    async fn probe_page_title(&self, platform: Platform, url: &str) -> Result<ProbeOutcome> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let resolved = response.url().to_string();
        let body = response.text().await?;

        let title = page_title(&body).ok_or_else(|| VerifyError::UnexpectedResponse {
            url: resolved.clone(),
            reason: "page has no title".to_string(),
        })?;
        tracing::debug!("{} page title: {}", platform, title);

        match self.endpoint(platform).landing_title.as_deref() {
            Some(landing) if title == landing.trim() => Ok(ProbeOutcome::not_found(resolved)),
            _ => Ok(ProbeOutcome::exists(resolved)),
        }
    }

    async fn probe_redirect(&self, platform: Platform, url: &str) -> Result<ProbeOutcome> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;
        let status = response.status();
        let final_url = response.url().clone();
        tracing::debug!("{} response status: {}, final URL: {}", platform, status, final_url);

        if status != StatusCode::OK {
            return Ok(ProbeOutcome::not_found(final_url.as_str()));
        }

        let landed = self
            .endpoint(platform)
            .landing_url
            .as_deref()
            .is_some_and(|landing| is_landing_url(&final_url, landing));

        if landed {
            Ok(ProbeOutcome::not_found(final_url.as_str()))
        } else {
            Ok(ProbeOutcome::exists(final_url.as_str()))
        }
    }
}

#[async_trait]
impl Probe for HttpClassifier {
    async fn classify(&self, platform: Platform, handle: &str) -> ProbeOutcome {
        let result = match self.probe_url(platform, handle) {
            Ok(url) => {
                tracing::debug!("Probing {} URL: {}", platform, url);
                match platform.strategy() {
                    Strategy::GraphQl => self.probe_graphql(&url).await,
                    Strategy::PageTitle => self.probe_page_title(platform, &url).await,
                    Strategy::RedirectCheck => self.probe_redirect(platform, &url).await,
                }
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("⚠️ {} probe for '{}' failed: {}", platform, handle, e);
                ProbeOutcome::transport_error()
            }
        }
    }
}

/// GraphQL text of the contest-ranking lookup. The handle is embedded as a
/// JSON string literal, which is also a valid GraphQL string.
pub fn leetcode_query(handle: &str) -> Result<String> {
    let literal = serde_json::to_string(handle)?;
    Ok(format!(
        "query {{ userContestRanking(username: {}) {{ {} }} }}",
        literal, LEETCODE_RANKING_FIELDS
    ))
}

/// The lookup sent as a GET, with the whole query percent-encoded into the
/// `query` parameter. Any query already on `endpoint` is replaced.
pub fn leetcode_query_url(endpoint: &str, handle: &str) -> Result<String> {
    let mut url = Url::parse(endpoint).map_err(|e| VerifyError::ConfigError {
        message: format!("LeetCode endpoint '{}': {}", endpoint, e),
    })?;
    let query = leetcode_query(handle)?;
    // byte_serialize turns a literal '+' into %2B, so every '+' left is a space.
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    url.set_query(Some(&format!("query={}", encoded)));
    Ok(url.to_string())
}

/// `errors` present and non-empty.
fn has_errors(json: &serde_json::Value) -> bool {
    match json.get("errors") {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Array(items)) => !items.is_empty(),
        Some(serde_json::Value::Object(map)) => !map.is_empty(),
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Number(_)) => true,
    }
}

/// Trimmed text of the first `<title>`, if any.
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let title: String = document.select(&selector).next()?.text().collect();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn is_landing_url(final_url: &Url, landing: &str) -> bool {
    Url::parse(landing).is_ok_and(|landing| landing == *final_url)
}
