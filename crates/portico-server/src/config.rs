//! Process configuration from environment variables.

use portico_auth::AuthConfig;
use portico_comms::CommsConfig;
use portico_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub comms: CommsConfig,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub sendgrid_api_key: String,
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Read configuration from the process environment. Secrets have
    /// no defaults; connection settings fall back to local-dev
    /// values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match optional("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: "PORT",
                value: raw,
            })?,
            None => 3000,
        };

        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: optional("SURREAL_URL").unwrap_or(db_defaults.url),
            namespace: optional("SURREAL_NAMESPACE").unwrap_or(db_defaults.namespace),
            database: optional("SURREAL_DATABASE").unwrap_or(db_defaults.database),
            username: optional("SURREAL_USERNAME").unwrap_or(db_defaults.username),
            password: optional("SURREAL_PASSWORD").unwrap_or(db_defaults.password),
        };

        let auth = AuthConfig {
            jwt_secret: require("JWT_SECRET")?,
            pepper: optional("PASSWORD_PEPPER"),
            ..AuthConfig::default()
        };

        let email_domain =
            optional("EMAIL_DOMAIN").unwrap_or_else(|| "portico.example".into());
        let comms = CommsConfig {
            phone_number: require("TWILIO_PHONE_NUMBER")?,
            email_from: optional("EMAIL_FROM")
                .unwrap_or_else(|| format!("noreply@{email_domain}")),
            email_domain,
            status_callback_url: optional("PUBLIC_BASE_URL")
                .map(|base| format!("{}/api/twilio-webhook", base.trim_end_matches('/'))),
        };

        Ok(Self {
            port,
            db,
            auth,
            comms,
            twilio_account_sid: require("TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: require("TWILIO_AUTH_TOKEN")?,
            sendgrid_api_key: require("SENDGRID_API_KEY")?,
        })
    }
}
