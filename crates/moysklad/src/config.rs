//! Gateway configuration.
//!
//! All credentials and knobs are collected into one explicitly constructed
//! value, validated once at startup and passed into the gateway; nothing in
//! this crate reads the environment after construction.

use tapdesk_core::{ClientError, ClientResult};

/// Production API base; also used to build `meta.href` back-references in
/// outgoing payloads.
pub const DEFAULT_BASE_URL: &str = "https://api.moysklad.ru/api/remap/1.2";

/// Only products whose display name starts with this tag are surfaced.
pub const DEFAULT_CATALOG_TAG: &str = "Jaws";

/// Page size for offset pagination.
pub const DEFAULT_PAGE_LIMIT: usize = 1000;

/// How the gateway authenticates. One fixed scheme per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErpCredentials {
    /// API token, sent as `Authorization: Bearer`.
    Token(String),
    /// Account login/password, sent as basic auth.
    Basic { login: String, password: String },
}

impl ErpCredentials {
    fn validate(&self) -> ClientResult<()> {
        let ok = match self {
            ErpCredentials::Token(token) => !token.trim().is_empty(),
            ErpCredentials::Basic { login, password } => {
                !login.trim().is_empty() && !password.trim().is_empty()
            }
        };
        if ok {
            Ok(())
        } else {
            Err(ClientError::configuration(
                "ERP credentials are empty; set MOYSKLAD_TOKEN or MOYSKLAD_LOGIN/MOYSKLAD_PASSWORD",
            ))
        }
    }
}

/// Everything the gateway needs, constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpConfig {
    pub base_url: String,
    pub credentials: ErpCredentials,
    /// Display-name prefix filter for the catalog; `None` disables it.
    pub catalog_tag: Option<String>,
    /// Recipient of the best-effort order summary; `None` disables it.
    pub notification_email: Option<String>,
    pub page_limit: usize,
}

impl ErpConfig {
    pub fn new(base_url: impl Into<String>, credentials: ErpCredentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            catalog_tag: Some(DEFAULT_CATALOG_TAG.to_string()),
            notification_email: None,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_catalog_tag(mut self, tag: Option<String>) -> Self {
        self.catalog_tag = tag;
        self
    }

    pub fn with_notification_email(mut self, email: Option<String>) -> Self {
        self.notification_email = email;
        self
    }

    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit;
        self
    }

    /// Build the configuration from the process environment.
    ///
    /// `MOYSKLAD_TOKEN` wins over `MOYSKLAD_LOGIN`/`MOYSKLAD_PASSWORD` when
    /// both are present. Optional: `MOYSKLAD_BASE_URL`,
    /// `TAPDESK_CATALOG_TAG`, `ORDER_NOTIFICATION_EMAIL`.
    pub fn from_env() -> ClientResult<Self> {
        let credentials = if let Some(token) = env_var("MOYSKLAD_TOKEN") {
            ErpCredentials::Token(token)
        } else {
            match (env_var("MOYSKLAD_LOGIN"), env_var("MOYSKLAD_PASSWORD")) {
                (Some(login), Some(password)) => ErpCredentials::Basic { login, password },
                _ => {
                    return Err(ClientError::configuration(
                        "missing ERP credentials: set MOYSKLAD_TOKEN, or both \
                         MOYSKLAD_LOGIN and MOYSKLAD_PASSWORD, in the environment \
                         or a .env file",
                    ));
                }
            }
        };

        let base_url = env_var("MOYSKLAD_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let catalog_tag =
            env_var("TAPDESK_CATALOG_TAG").or_else(|| Some(DEFAULT_CATALOG_TAG.to_string()));

        let config = Self::new(base_url, credentials)
            .with_catalog_tag(catalog_tag)
            .with_notification_email(env_var("ORDER_NOTIFICATION_EMAIL"));
        config.validate()?;
        Ok(config)
    }

    /// One-time startup validation.
    pub fn validate(&self) -> ClientResult<()> {
        self.credentials.validate()?;
        if self.base_url.trim().is_empty() {
            return Err(ClientError::configuration("ERP base URL is empty"));
        }
        if self.page_limit == 0 {
            return Err(ClientError::configuration("page limit must be at least 1"));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
