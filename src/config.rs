// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup. A `.env`
//! file, when present, is loaded into the environment by `main` first.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `GITHUB_APP_ID` | Id of the app that performs setup | Required |
//! | `GITHUB_PRIVATE_KEY` | PEM (or base64 PEM) key of that app | Required |
//! | `LABEL_APP_ID` | Label app id, provisioned as secret `APP_ID` | Required |
//! | `LABEL_PRIVATE_KEY` | Label app key, provisioned as secret `APP_PRIVATE_KEY` | Required |
//! | `WEBHOOK_SECRET` | HMAC secret; unset disables verification | Unset |
//! | `GITHUB_API_URL` | REST API base URL | `https://api.github.com` |
//! | `SYNC_LABELS` | Reconcile labels server-side after setup | `false` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | Serve HTTPS with these PEM files | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;

use base64ct::{Base64, Encoding};

use crate::github::client::DEFAULT_API_BASE_URL;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const GITHUB_APP_ID_ENV: &str = "GITHUB_APP_ID";
pub const GITHUB_PRIVATE_KEY_ENV: &str = "GITHUB_PRIVATE_KEY";
pub const LABEL_APP_ID_ENV: &str = "LABEL_APP_ID";
pub const LABEL_PRIVATE_KEY_ENV: &str = "LABEL_PRIVATE_KEY";
pub const WEBHOOK_SECRET_ENV: &str = "WEBHOOK_SECRET";
pub const GITHUB_API_URL_ENV: &str = "GITHUB_API_URL";
pub const SYNC_LABELS_ENV: &str = "SYNC_LABELS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Read `LOG_FORMAT` directly, so logging can start before the rest of
    /// the configuration is validated.
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub github_app_id: u64,
    pub github_private_key: String,
    pub label_app_id: String,
    pub label_private_key: String,
    pub webhook_secret: Option<String>,
    pub api_base_url: String,
    pub sync_labels: bool,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let port = match env.optional(PORT_ENV) {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::invalid(PORT_ENV, format!("{e}")))?,
            None => DEFAULT_PORT,
        };

        let github_app_id = env
            .required(GITHUB_APP_ID_ENV)?
            .parse()
            .map_err(|_| ConfigError::invalid(GITHUB_APP_ID_ENV, "expected an unsigned integer"))?;

        let github_private_key = normalize_private_key(&env.required(GITHUB_PRIVATE_KEY_ENV)?)
            .map_err(|reason| ConfigError::invalid(GITHUB_PRIVATE_KEY_ENV, reason))?;
        let label_private_key = normalize_private_key(&env.required(LABEL_PRIVATE_KEY_ENV)?)
            .map_err(|reason| ConfigError::invalid(LABEL_PRIVATE_KEY_ENV, reason))?;

        let tls = match (env.optional(TLS_CERT_PATH_ENV), env.optional(TLS_KEY_PATH_ENV)) {
            (Some(cert_path), Some(key_path)) => Some(TlsPaths {
                cert_path,
                key_path,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        Ok(Self {
            host: env.or_default(HOST_ENV, DEFAULT_HOST),
            port,
            github_app_id,
            github_private_key,
            label_app_id: env.required(LABEL_APP_ID_ENV)?,
            label_private_key,
            webhook_secret: env.optional(WEBHOOK_SECRET_ENV),
            api_base_url: env.or_default(GITHUB_API_URL_ENV, DEFAULT_API_BASE_URL),
            sync_labels: env
                .optional(SYNC_LABELS_ENV)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
            tls,
            log_format: LogFormat::parse(env.optional(LOG_FORMAT_ENV).as_deref()),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::invalid(HOST_ENV, format!("{e}")))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("github_app_id", &self.github_app_id)
            .field("github_private_key", &"[REDACTED]")
            .field("label_app_id", &self.label_app_id)
            .field("label_private_key", &"[REDACTED]")
            .field("webhook_secret_set", &self.webhook_secret.is_some())
            .field("api_base_url", &self.api_base_url)
            .field("sync_labels", &self.sync_labels)
            .field("tls", &self.tls)
            .field("log_format", &self.log_format)
            .finish()
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }
}

/// Turn a private key from the environment into a PEM document.
///
/// Accepts a PEM with real newlines, a PEM with `\n` escapes (as most
/// secret stores flatten it), or the base64 encoding of either.
pub fn normalize_private_key(raw: &str) -> Result<String, String> {
    let pem = unescape_newlines(raw);
    if looks_like_pem(&pem) {
        return Ok(pem);
    }

    let compact: String = pem.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = Base64::decode_vec(&compact)
        .map_err(|_| "neither a PEM document nor base64".to_string())?;
    let text = String::from_utf8(decoded)
        .map_err(|_| "base64 payload is not UTF-8".to_string())?;

    let pem = unescape_newlines(&text);
    if looks_like_pem(&pem) {
        Ok(pem)
    } else {
        Err("base64 payload is not a PEM private key".to_string())
    }
}

fn unescape_newlines(raw: &str) -> String {
    raw.trim().replace("\r\n", "\n").replace("\\n", "\n")
}

fn looks_like_pem(text: &str) -> bool {
    text.contains("BEGIN") && text.contains("PRIVATE KEY")
}
