//! Authenticated HTTP gateway to the ERP.
//!
//! Every failure surfaces synchronously as a typed [`ClientError`]; the
//! gateway never retries on its own. Pagination is strictly sequential —
//! each page request depends on the previous page having been full.

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use tapdesk_core::{ClientError, ClientResult};

use crate::config::{ErpConfig, ErpCredentials};
use crate::dto::ListResponse;

/// HTTP/JSON client for the MoySklad API.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    config: ErpConfig,
}

impl Gateway {
    /// Build a gateway from a validated configuration.
    ///
    /// Credential problems are reported here, before any request is made.
    pub fn new(config: ErpConfig) -> ClientResult<Self> {
        config.validate()?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    pub fn config(&self) -> &ErpConfig {
        &self.config
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json;charset=utf-8");

        match &self.config.credentials {
            ErpCredentials::Token(token) => builder.bearer_auth(token),
            ErpCredentials::Basic { login, password } => builder.basic_auth(login, Some(password)),
        }
    }

    /// GET `endpoint` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        self.execute(self.request(Method::GET, endpoint)).await
    }

    /// GET `endpoint` with URL-encoded query parameters.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        self.execute(self.request(Method::GET, endpoint).query(query))
            .await
    }

    /// POST a JSON `body` to `endpoint` and decode the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.execute(self.request(Method::POST, endpoint).json(body))
            .await
    }

    /// Fetch every row of a paginated listing.
    ///
    /// Pages are requested with `limit`/`offset`; a page shorter than the
    /// limit (or empty) ends the loop. Termination assumes the remote
    /// collection does not shrink mid-scan; the remote offers no snapshot
    /// consistency across pages.
    pub async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> ClientResult<Vec<T>> {
        let limit = self.config.page_limit;
        let mut items = Vec::new();
        let mut offset = 0usize;

        loop {
            let page: ListResponse<T> = self
                .get_with_query(
                    endpoint,
                    &[("limit", limit.to_string()), ("offset", offset.to_string())],
                )
                .await?;

            let count = page.rows.len();
            tracing::debug!(endpoint, offset, count, "fetched page");
            if count == 0 {
                break;
            }

            items.extend(page.rows);
            offset += count;
            if count < limit {
                break;
            }
        }

        Ok(items)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await.map_err(|err| {
            ClientError::network(format!("unable to reach the ERP API: {err}"))
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::authentication(
                "the ERP rejected the configured credentials; check MOYSKLAD_TOKEN \
                 or MOYSKLAD_LOGIN/MOYSKLAD_PASSWORD",
            ));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::rate_limited(
                "the ERP API rate limit was exceeded; try again later",
            ));
        }
        if !status.is_success() {
            let status_line = format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            );
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::remote_api(describe_failure(&status_line, &body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ClientError::remote_api(format!("unexpected response body: {err}")))
    }
}

/// Best-effort extraction of human-readable detail from an error body.
///
/// Preference order: the structured `errors` array, a top-level `error`
/// field, the raw body text, the bare status line.
fn describe_failure(status_line: &str, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(errors) = value.get("errors").and_then(|v| v.as_array()) {
            let details: Vec<String> = errors
                .iter()
                .map(|entry| {
                    entry
                        .get("error")
                        .and_then(|v| v.as_str())
                        .or_else(|| entry.get("message").and_then(|v| v.as_str()))
                        .map(str::to_string)
                        .unwrap_or_else(|| entry.to_string())
                })
                .collect();
            if !details.is_empty() {
                return format!("{status_line}. {}", details.join(", "));
            }
        }
        if let Some(detail) = value.get("error").and_then(|v| v.as_str()) {
            return format!("{status_line}. {detail}");
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status_line.to_string()
    } else {
        format!("{status_line}. {trimmed}")
    }
}
