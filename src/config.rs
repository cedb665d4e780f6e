use anyhow::{Context, Result};
use clap::Parser;
use std::{env, fmt};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_url: String,
    pub database: String,
    /// Use the in-process stores instead of MongoDB.
    pub in_memory: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Event management API")]
pub struct Args {
    /// Host to bind to (overrides EVENT_API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides EVENT_API_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// MongoDB connection string (overrides MONGODB_URL)
    #[arg(long)]
    pub mongodb_url: Option<String>,

    /// Database name (overrides MONGODB_DATABASE)
    #[arg(long)]
    pub database: Option<String>,

    /// Keep all data in memory; nothing survives a restart
    #[arg(long)]
    pub in_memory: bool,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "event_management";

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::merge(Args::parse(), |key| env::var(key))
    }

    /// Merge parsed arguments over values looked up with `var`; arguments win.
    fn merge(
        args: Args,
        var: impl Fn(&str) -> Result<String, env::VarError>,
    ) -> Result<Self> {
        let env_host = var("EVENT_API_HOST").unwrap_or_else(|_| DEFAULT_HOST.into());
        let env_port = match var("EVENT_API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing EVENT_API_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => DEFAULT_PORT,
            Err(err) => return Err(err).context("reading EVENT_API_PORT"),
        };
        let env_url = var("MONGODB_URL").unwrap_or_else(|_| DEFAULT_MONGODB_URL.into());
        let env_db = var("MONGODB_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.into());

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            mongodb_url: args.mongodb_url.unwrap_or(env_url),
            database: args.database.unwrap_or(env_db),
            in_memory: args.in_memory,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The connection string with any `user:password@` replaced, for logging.
    pub fn redacted_mongodb_url(&self) -> String {
        redact_userinfo(&self.mongodb_url)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("mongodb_url", &self.redacted_mongodb_url())
            .field("database", &self.database)
            .field("in_memory", &self.in_memory)
            .finish()
    }
}

fn redact_userinfo(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => url.to_string(),
    }
}
