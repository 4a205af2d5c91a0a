//! Server settings read from the process environment.
//!
//! Nothing here fails: missing mail settings are reported per request as a
//! delivery failure, so the static site keeps serving.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_EMAIL_API_URL.to_string(),
            from: None,
            to: None,
        }
    }
}

impl MailConfig {
    /// Names of the settings delivery needs but does not have.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("EMAIL_API_KEY", &self.api_key),
            ("APPLY_MAIL_FROM", &self.from),
            ("APPLY_MAIL_TO", &self.to),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub web_root: PathBuf,
    pub mail: MailConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("[config] invalid PORT {raw:?}, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            port,
            web_root: get("WEB_ROOT").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            mail: MailConfig {
                api_key: get("EMAIL_API_KEY"),
                api_url: get("EMAIL_API_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
                from: get("APPLY_MAIL_FROM"),
                to: get("APPLY_MAIL_TO"),
            },
        }
    }
}
