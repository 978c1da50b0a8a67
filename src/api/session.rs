use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

/// Identifies this tool to the remote wiki.
const USER_AGENT: &str = concat!("intlang/", env!("CARGO_PKG_VERSION"));

/// Response-format options sent with every API call.
const BASE_PARAMS: &[(&str, &str)] = &[
    ("format", "json"),
    ("formatversion", "2"),
    ("errorformat", "plaintext"),
];

/// Outcome of a create-only edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// One entry of the API's structured error collection
/// (`errorformat=plaintext`).
#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    text: Option<String>,
}

/// An authenticated session against one wiki's action API.
///
/// Holds the HTTP client with the bearer token and user agent baked in, and
/// caches the CSRF token across write requests. All methods take `&self`, so
/// read requests may run concurrently on the same session.
pub struct Session {
    client: Client,
    api_url: String,
    csrf_token: Mutex<Option<String>>,
}

impl Session {
    pub fn new(domain: &str, access_token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .context("access token contains characters not allowed in a header")?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: format!("https://{domain}/w/api.php"),
            csrf_token: Mutex::new(None),
        })
    }

    /// Collects every language code the wiki supports, following the
    /// server's continuation until exhausted.
    ///
    /// Order and duplicates are whatever the server's pagination yields;
    /// no deduplication is applied.
    pub async fn language_codes(&self) -> Result<Vec<String>> {
        let mut codes = Vec::new();
        let mut continuation: Option<Map<String, Value>> = None;

        loop {
            let mut params = owned_params(&[
                ("action", "query"),
                ("meta", "languageinfo"),
                ("liprop", "code"),
            ]);
            if let Some(values) = continuation.take() {
                params.extend(continuation_params(&values));
            }

            let payload = self.get(&params).await?;
            let page: LanguageInfoResponse = serde_json::from_value(payload)
                .context("failed to decode languageinfo API response")?;

            codes.extend(page.query.languageinfo.into_values().map(|entry| entry.code));

            continuation = page.continuation;
            if continuation.is_none() {
                break;
            }
        }

        Ok(codes)
    }

    /// Looks up the wiki's configured content language code.
    pub async fn site_content_language(&self) -> Result<String> {
        let payload = self
            .get(&owned_params(&[
                ("action", "query"),
                ("meta", "siteinfo"),
                ("siprop", "general"),
            ]))
            .await?;
        let page: SiteInfoResponse =
            serde_json::from_value(payload).context("failed to decode siteinfo API response")?;
        Ok(page.query.general.lang)
    }

    /// Issues a create-only edit for `title` with `text` as the page body.
    ///
    /// A response carrying exactly one error with code `articleexists` maps
    /// to [`CreateOutcome::AlreadyExists`]; any other error shape is an
    /// `Err` with the formatted error details.
    pub async fn create_page(
        &self,
        title: &str,
        text: &str,
        summary: &str,
    ) -> Result<CreateOutcome> {
        let token = self.csrf_token().await?;
        let payload = self
            .post(&owned_params(&[
                ("action", "edit"),
                ("title", title),
                ("text", text),
                ("summary", summary),
                ("bot", "1"),
                ("createonly", "1"),
                ("watchlist", "unwatch"),
                ("token", &token),
            ]))
            .await?;

        let Some(raw_errors) = payload.get("errors") else {
            return Ok(CreateOutcome::Created);
        };
        let errors: Vec<ApiError> = serde_json::from_value(raw_errors.clone())
            .context("failed to decode edit error response")?;
        if already_exists(&errors) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        bail!("edit of {title} failed: {}", format_errors(&errors));
    }

    async fn csrf_token(&self) -> Result<String> {
        let mut cached = self.csrf_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let payload = self
            .get(&owned_params(&[("action", "query"), ("meta", "tokens")]))
            .await?;
        let response: TokenResponse =
            serde_json::from_value(payload).context("failed to decode csrf token response")?;
        let token = response.query.tokens.csrftoken;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn get(&self, params: &[(String, String)]) -> Result<Value> {
        let response = self
            .client
            .get(&self.api_url)
            .query(BASE_PARAMS)
            .query(params)
            .send()
            .await
            .with_context(|| format!("failed to call {}", self.api_url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("API request failed with HTTP {status}");
        }
        let payload: Value = response
            .json()
            .await
            .context("failed to decode API JSON response")?;
        if let Some(raw_errors) = payload.get("errors") {
            let errors: Vec<ApiError> = serde_json::from_value(raw_errors.clone())
                .context("failed to decode API error response")?;
            bail!("API request failed: {}", format_errors(&errors));
        }
        Ok(payload)
    }

    // Unlike `get`, API-level `errors` stay in the payload so the caller can
    // classify them.
    async fn post(&self, params: &[(String, String)]) -> Result<Value> {
        let response = self
            .client
            .post(&self.api_url)
            .query(BASE_PARAMS)
            .form(params)
            .send()
            .await
            .with_context(|| format!("failed to call {}", self.api_url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("API request failed with HTTP {status}");
        }
        response
            .json()
            .await
            .context("failed to decode API JSON response")
    }
}

/// The sole expected write failure: exactly one error and it signals that
/// the page is already there.
fn already_exists(errors: &[ApiError]) -> bool {
    matches!(errors, [only] if only.code == "articleexists")
}

fn format_errors(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|error| match &error.text {
            Some(text) => format!("[{}] {}", error.code, text),
            None => format!("[{}]", error.code),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn owned_params(params: &[(&str, &str)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// Echo every member of the server's `continue` object into the next
/// request, treating the tokens as opaque.
fn continuation_params(values: &Map<String, Value>) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(key, value)| {
            let value = match value.as_str() {
                Some(text) => text.to_string(),
                None => value.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct LanguageInfoResponse {
    query: LanguageInfoQuery,
    #[serde(rename = "continue")]
    continuation: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct LanguageInfoQuery {
    languageinfo: BTreeMap<String, LanguageEntry>,
}

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    code: String,
}

#[derive(Debug, Deserialize)]
struct SiteInfoResponse {
    query: SiteInfoQuery,
}

#[derive(Debug, Deserialize)]
struct SiteInfoQuery {
    general: SiteGeneral,
}

#[derive(Debug, Deserialize)]
struct SiteGeneral {
    lang: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    query: TokenQuery,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    tokens: Tokens,
}

#[derive(Debug, Deserialize)]
struct Tokens {
    csrftoken: String,
}
