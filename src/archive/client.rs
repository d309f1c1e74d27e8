//! HTTP-backed loan session for the archive.org lending library.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{CONTENT_TYPE, REFERER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::manifest::{find_manifest_url, page_request_url, parse_page_urls};
use crate::session::{Credentials, FetchOutcome, LoanSession, SessionError};
use crate::user_agent;

/// Production lending service.
pub const DEFAULT_BASE_URL: &str = "https://archive.org/";

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (2 minutes; page images can be slow).
pub const READ_TIMEOUT_SECS: u64 = 120;

const LOGIN_PATH: &str = "account/login";
const LOAN_PATH: &str = "services/loans/loan/";
const SEARCH_INSIDE_PATH: &str = "services/loans/loan/searchInside.php";

/// Timeouts applied to every request of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Connect timeout in seconds.
    pub connect_secs: u64,
    /// Read timeout in seconds.
    pub read_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// One login + loan conversation with archive.org.
///
/// Holds its own cookie jar, so two clients never share a login or a loan
/// token.
#[derive(Debug)]
pub struct ArchiveClient {
    http: Client,
    jar: Arc<Jar>,
    base: Url,
    book_id: Option<String>,
    pages: Vec<Url>,
}

impl ArchiveClient {
    /// Creates a client against `base_url` (normally [`DEFAULT_BASE_URL`]).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidUrl`] for an unparsable base URL and
    /// [`SessionError::ClientBuild`] when reqwest cannot build the client.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, SessionError> {
        let base = parse_base_url(base_url)?;
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .read_timeout(Duration::from_secs(timeouts.read_secs))
            .user_agent(user_agent::default_user_agent())
            .cookie_provider(Arc::clone(&jar))
            .gzip(true)
            .build()
            .map_err(|source| SessionError::ClientBuild { source })?;

        Ok(Self {
            http,
            jar,
            base,
            book_id: None,
            pages: Vec::new(),
        })
    }

    /// Number of pages discovered by the last metadata fetch.
    #[must_use]
    pub fn known_pages(&self) -> usize {
        self.pages.len()
    }

    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        self.base
            .join(path)
            .map_err(|_| SessionError::invalid_url(format!("{}{path}", self.base)))
    }

    fn loaned_book(&self) -> Result<&str, SessionError> {
        self.book_id
            .as_deref()
            .ok_or_else(|| SessionError::metadata("<none>", "no book has been borrowed"))
    }

    async fn get_text(&self, url: &Url) -> Result<String, SessionError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SessionError::network(url.as_str(), source))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::http_status(url.as_str(), status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|source| SessionError::network(url.as_str(), source))
    }

    /// Posts a form and returns status and body without judging the status.
    async fn post_form(
        &self,
        url: &Url,
        fields: &[(&str, &str)],
    ) -> Result<(StatusCode, String), SessionError> {
        let response = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(REFERER, self.base.as_str())
            .body(encode_form(fields))
            .send()
            .await
            .map_err(|source| SessionError::network(url.as_str(), source))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| SessionError::network(url.as_str(), source))?;
        Ok((status, body))
    }

    /// Posts a loan action and returns the parsed JSON reply.
    async fn loan_action(
        &self,
        action: &str,
        book_id: &str,
    ) -> Result<(StatusCode, Value), SessionError> {
        let url = self.endpoint(LOAN_PATH)?;
        let (status, body) = self
            .post_form(&url, &[("action", action), ("identifier", book_id)])
            .await?;
        let json = serde_json::from_str(&body).unwrap_or(Value::Null);
        Ok((status, json))
    }
}

#[async_trait]
impl LoanSession for ArchiveClient {
    #[instrument(skip(self, credentials), fields(identity = %credentials.identity))]
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), SessionError> {
        let url = self.endpoint(LOGIN_PATH)?;
        // The login form rejects posts that arrive without its test cookie.
        self.get_text(&url).await?;

        let referer = self.base.to_string();
        let (status, body) = self
            .post_form(
                &url,
                &[
                    ("username", credentials.identity.as_str()),
                    ("password", credentials.secret.as_str()),
                    ("remember", "true"),
                    ("referer", referer.as_str()),
                    ("login", "true"),
                    ("submit_by_js", "true"),
                ],
            )
            .await?;

        if body.contains("bad_login") {
            return Err(SessionError::login("invalid email or password"));
        }
        if !status.is_success() {
            return Err(SessionError::login(format!(
                "login endpoint returned HTTP {}",
                status.as_u16()
            )));
        }
        debug!("logged in");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn begin_loan(&mut self, book_id: &str) -> Result<(), SessionError> {
        let search_url = self.endpoint(SEARCH_INSIDE_PATH)?;
        self.post_form(
            &search_url,
            &[("action", "grant_access"), ("identifier", book_id)],
        )
        .await?;

        let (status, reply) = self.loan_action("browse_book", book_id).await?;
        if !status.is_success() || reply.get("success") == Some(&Value::Bool(false)) {
            return Err(SessionError::loan_denied(
                book_id,
                json_error(&reply).unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            ));
        }

        let (status, reply) = self.loan_action("create_token", book_id).await?;
        let Some(token) = reply.get("token").and_then(Value::as_str) else {
            return Err(SessionError::loan_denied(
                book_id,
                json_error(&reply)
                    .unwrap_or_else(|| format!("no loan token (HTTP {})", status.as_u16())),
            ));
        };
        self.jar
            .add_cookie_str(&format!("br-loan-{book_id}={token}; Path=/"), &self.base);
        self.jar
            .add_cookie_str(&format!("loan-{book_id}={token}; Path=/"), &self.base);

        self.book_id = Some(book_id.to_string());
        debug!("loan token acquired");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_page_count(&mut self) -> Result<u32, SessionError> {
        let book_id = self.loaned_book()?.to_string();
        let details_url = self.endpoint(&format!("details/{book_id}"))?;
        let details = self.get_text(&details_url).await?;

        let manifest_url = find_manifest_url(&details, &self.base).ok_or_else(|| {
            SessionError::metadata(&book_id, "book manifest URL not found on details page")
        })?;
        debug!(url = %manifest_url, "fetching book manifest");
        let manifest = self.get_text(&manifest_url).await?;

        self.pages = parse_page_urls(&manifest, &self.base)
            .map_err(|reason| SessionError::metadata(&book_id, reason))?;
        u32::try_from(self.pages.len())
            .map_err(|_| SessionError::metadata(&book_id, "page count out of range"))
    }

    #[instrument(skip(self))]
    async fn fetch_page(&mut self, index: u32, scale: u32) -> FetchOutcome {
        let Some(page) = usize::try_from(index).ok().and_then(|i| self.pages.get(i)) else {
            warn!(page = index + 1, known = self.pages.len(), "page is not in the manifest");
            return FetchOutcome::Failure;
        };
        let url = page_request_url(page, scale);

        let response = match self
            .http
            .get(url.clone())
            .header(REFERER, self.base.as_str())
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(page = index + 1, error = %error, "page request failed");
                return FetchOutcome::Failure;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(page = index + 1, status = status.as_u16(), "page request rejected");
            return FetchOutcome::Failure;
        }

        match response.bytes().await {
            Ok(bytes) => FetchOutcome::Success(bytes.to_vec()),
            Err(error) => {
                warn!(page = index + 1, error = %error, "page body interrupted");
                FetchOutcome::Failure
            }
        }
    }

    #[instrument(skip(self))]
    async fn end_loan(&mut self, book_id: &str) -> Result<(), SessionError> {
        let (status, reply) = self.loan_action("return_loan", book_id).await?;
        if status.is_success() && reply.get("success") == Some(&Value::Bool(true)) {
            self.book_id = None;
            return Ok(());
        }
        Err(SessionError::return_failed(
            book_id,
            json_error(&reply).unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        ))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, SessionError> {
    let mut base = Url::parse(raw).map_err(|_| SessionError::invalid_url(raw))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn json_error(reply: &Value) -> Option<String> {
    reply
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}
