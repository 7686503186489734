use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use duda_client::DudaEnvironment;

use crate::domains::landing_pages::models::PageCount;

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub environment: DudaEnvironment,
    pub hubspot_api_key: String,
    pub duda_api_user: String,
    pub duda_api_pass: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub content_length: String,
    pub content_tone: String,
    pub default_page_count: PageCount,
    pub api_call_delay: Duration,
    pub duda_collection: String,
    pub duda_batch_size: usize,
    pub duda_publish_site: bool,
    pub database_url: Option<String>,
    pub notification: Option<NotificationConfig>,
}

/// Where run summaries get emailed. Present only when a recipient and an SMTP
/// host are both configured.
#[derive(Clone)]
pub struct NotificationConfig {
    pub to: String,
    pub from: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

const DEFAULT_FROM_ADDRESS: &str = "noreply@landing-page-service.local";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let default_pages: u32 = var_or("DEFAULT_NUM_PAGES", "10")
            .parse()
            .context("DEFAULT_NUM_PAGES must be a number")?;
        let default_page_count = PageCount::try_from(default_pages)
            .map_err(|_| anyhow::anyhow!("DEFAULT_NUM_PAGES must be 10 or 50, got {}", default_pages))?;

        let delay_secs: f64 = var_or("API_CALL_DELAY", "0.5")
            .parse()
            .context("API_CALL_DELAY must be a number of seconds")?;
        if !delay_secs.is_finite() || delay_secs < 0.0 {
            bail!("API_CALL_DELAY must be zero or positive");
        }

        let duda_batch_size: usize = var_or("DUDA_BATCH_SIZE", "50")
            .parse()
            .context("DUDA_BATCH_SIZE must be a number")?;
        if duda_batch_size == 0 {
            bail!("DUDA_BATCH_SIZE must be at least 1");
        }

        Ok(Self {
            port: var_or("PORT", "8080")
                .parse()
                .context("PORT must be a valid number")?,
            environment: var_or("ENVIRONMENT", "production")
                .parse()
                .context("ENVIRONMENT must be production or sandbox")?,
            hubspot_api_key: required("HUBSPOT_API_KEY")?,
            duda_api_user: required("DUDA_API_USER")?,
            duda_api_pass: required("DUDA_API_PASS")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: var_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            content_length: var_or("CONTENT_LENGTH", "3-4 sentences"),
            content_tone: var_or("CONTENT_TONE", "professional"),
            default_page_count,
            api_call_delay: Duration::from_secs_f64(delay_secs),
            duda_collection: var_or("DUDA_COLLECTION", "Location"),
            duda_batch_size,
            duda_publish_site: parse_bool(&var_or("DUDA_PUBLISH_SITE", "true"))
                .context("DUDA_PUBLISH_SITE must be true or false")?,
            database_url: optional("DATABASE_URL"),
            notification: NotificationConfig::from_env()?,
        })
    }
}

impl NotificationConfig {
    fn from_env() -> Result<Option<Self>> {
        let (Some(to), Some(smtp_host)) = (optional("NOTIFICATION_EMAIL"), optional("SMTP_HOST"))
        else {
            return Ok(None);
        };

        Ok(Some(Self {
            to,
            from: optional("NOTIFICATION_EMAIL_FROM")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_host,
            smtp_port: var_or("SMTP_PORT", "587")
                .parse()
                .context("SMTP_PORT must be a valid number")?,
            smtp_user: optional("SMTP_USER"),
            smtp_password: optional("SMTP_PASSWORD"),
        }))
    }
}

fn required(name: &str) -> Result<String> {
    optional(name).with_context(|| format!("{} must be set", name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    optional(name).unwrap_or_else(|| default.to_string())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: {}", other),
    }
}

fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        "MISSING"
    } else {
        "***"
    }
}

// Secrets never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("hubspot_api_key", &mask(&self.hubspot_api_key))
            .field("duda_api_user", &mask(&self.duda_api_user))
            .field("duda_api_pass", &mask(&self.duda_api_pass))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .field("content_length", &self.content_length)
            .field("content_tone", &self.content_tone)
            .field("default_page_count", &self.default_page_count)
            .field("api_call_delay", &self.api_call_delay)
            .field("duda_collection", &self.duda_collection)
            .field("duda_batch_size", &self.duda_batch_size)
            .field("duda_publish_site", &self.duda_publish_site)
            .field("run_log", &self.database_url.as_ref().map(|_| "postgres"))
            .field("notification", &self.notification)
            .finish()
    }
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("to", &self.to)
            .field("from", &self.from)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_password", &self.smtp_password.as_deref().map(mask))
            .finish()
    }
}
