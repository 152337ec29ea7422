use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Book content delivery API")]
pub struct Args {
    /// Host to bind to (overrides BOOKSHELF_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BOOKSHELF_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Bucket holding the book files (overrides AWS_BOOKS_BUCKET_NAME)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Object store region (overrides AWS_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// S3-compatible endpoint URL (overrides AWS_ENDPOINT_URL)
    #[arg(long)]
    pub endpoint_url: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    ///
    /// Access credentials are not handled here: the SDK's default provider
    /// chain reads AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY on its own,
    /// so they never pass through this struct or its Debug output.
    pub fn from_env_and_args() -> Result<Self> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("BOOKSHELF_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("BOOKSHELF_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing BOOKSHELF_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading BOOKSHELF_PORT"),
        };
        let env_bucket = env::var("AWS_BOOKS_BUCKET_NAME")
            .ok()
            .filter(|value| !value.is_empty());
        let env_region = env::var("AWS_REGION").ok().filter(|value| !value.is_empty());
        let env_endpoint = env::var("AWS_ENDPOINT_URL")
            .ok()
            .filter(|value| !value.is_empty());

        // --- Merge ---
        let bucket = args
            .bucket
            .filter(|value| !value.is_empty())
            .or(env_bucket)
            .context("no bucket configured: set AWS_BOOKS_BUCKET_NAME or pass --bucket")?;

        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            bucket,
            region: args.region.or(env_region),
            endpoint_url: args.endpoint_url.or(env_endpoint),
        };

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_joins_host_and_port() {
        let cfg = AppConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            bucket: "books".into(),
            region: None,
            endpoint_url: None,
        };
        assert_eq!(cfg.addr(), "127.0.0.1:3000");
    }
}
