//! Static file server and founding charter application endpoint.

pub mod config;
pub mod mail;
pub mod routes;

pub use config::{MailConfig, ServerConfig};
pub use mail::{ApiMailer, Application, MailError, Mailer, OutgoingEmail, Timestamp};
pub use routes::{router, Message};
