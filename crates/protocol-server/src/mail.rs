//! Application payload, notification email formatting and delivery.

use crate::config::MailConfig;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const INVALID_DATE: &str = "Invalid Date";
const MAX_ERROR_BODY: usize = 512;

/// Submission time as sent by the form: epoch millis or a date string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Text(String),
}

/// A founding charter application as posted by the form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub name: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub profile: String,
    pub timestamp: Option<Timestamp>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email delivery is not configured (missing {0})")]
    NotConfigured(String),
    #[error("email API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers a notification for one application.
pub trait Mailer: Send + Sync + 'static {
    fn deliver(&self, application: Application) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Format like `Date.prototype.toUTCString`, e.g. `Tue, 15 Nov 1994 08:12:31 GMT`.
pub fn format_timestamp(timestamp: Option<&Timestamp>) -> String {
    let parsed = match timestamp {
        Some(Timestamp::Millis(ms)) => from_millis(*ms),
        Some(Timestamp::Text(text)) => parse_text(text.trim()),
        None => None,
    };
    parsed
        .map(|dt| dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(ms.trunc() as i64).single()
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    text.parse::<f64>().ok().and_then(from_millis)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn subject(application: &Application) -> String {
    format!(
        "New Founding Charter Application: {} - {}",
        application.name, application.company
    )
}

pub fn render_html(application: &Application) -> String {
    let email = escape_html(&application.email);
    let profile = escape_html(&application.profile);
    format!(
        "<h1>New Application Received</h1>\n\
         <p><strong>Timestamp:</strong> {timestamp}</p>\n\
         <hr>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Title:</strong> {title}</p>\n\
         <p><strong>Company:</strong> {company}</p>\n\
         <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\n\
         <p><strong>Profile:</strong> <a href=\"{profile}\">{profile}</a></p>\n",
        timestamp = format_timestamp(application.timestamp.as_ref()),
        name = escape_html(&application.name),
        title = escape_html(&application.title),
        company = escape_html(&application.company),
    )
}

impl OutgoingEmail {
    pub fn for_application(application: &Application, from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: subject(application),
            html: render_html(application),
        }
    }
}

/// Sends through a Resend-compatible HTTP API (`POST {api_url}/emails`).
#[derive(Clone, Debug)]
pub struct ApiMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl ApiMailer {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }
}

impl Mailer for ApiMailer {
    fn deliver(&self, application: Application) -> impl Future<Output = Result<(), MailError>> + Send {
        let client = self.client.clone();
        let config = self.config.clone();
        async move {
            let (Some(api_key), Some(from), Some(to)) = (&config.api_key, &config.from, &config.to) else {
                return Err(MailError::NotConfigured(config.missing().join(", ")));
            };
            let email = OutgoingEmail::for_application(&application, from, to);
            let url = format!("{}/emails", config.api_url);

            let response = client.post(&url).bearer_auth(api_key).json(&email).send().await?;
            let status = response.status();
            if status.is_success() {
                log::info!("[mail] sent \"{}\"", email.subject);
                return Ok(());
            }
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
