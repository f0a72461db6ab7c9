use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Error, Subcommand, ValueEnum};

use crate::http::config::{DEFAULT_HTTP_TIMEOUT, HttpConfig, ProxyConfig};
use crate::reconciler::CleanupPolicy;

pub const DEFAULT_CREDENTIALS_PATH: &str = "./credentials.json";
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replaces the configured realm on the identity server and creates its clients and client
    /// scopes.
    ///
    /// A realm with the same name is deleted first. Clients and client scopes are created in the
    /// order they are declared, and the run stops at the first one the server rejects.
    Provision {
        /// Path to the administrator credentials document
        #[arg(long, default_value = DEFAULT_CREDENTIALS_PATH)]
        credentials: PathBuf,

        /// Path to the desired realm configuration document
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Abort before creating anything if an existing realm cannot be deleted
        #[arg(long)]
        strict_cleanup: bool,

        #[command(flatten)]
        http_args: HttpArgs,

        /// Select how the run report is printed
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        output_format: OutputFormat,
    },
    /// Parses the configuration document without contacting the server.
    Validate {
        /// Path to the desired realm configuration document
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Select how the parsed document is printed
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        output_format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// One human readable line
    #[value(name = "plain")]
    Plain,
    /// Pretty printed JSON
    #[value(name = "json")]
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct HttpArgs {
    /// Timeout in seconds for connecting and for each request
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT.as_secs())]
    timeout: u64,

    /// Proxy url. HTTPS_PROXY and then HTTP_PROXY are used when not set.
    #[arg(long)]
    proxy: Option<String>,
}

impl HttpArgs {
    pub fn http_config(&self) -> Result<HttpConfig, Error> {
        let proxy = match &self.proxy {
            Some(url) => ProxyConfig::new(url)?,
            None => ProxyConfig::default(),
        }
        .try_with_url_from_env()?;
        let timeout = Duration::from_secs(self.timeout);

        Ok(HttpConfig::new(timeout, timeout, proxy))
    }
}

pub fn select_cleanup_policy(strict_cleanup: bool) -> CleanupPolicy {
    if strict_cleanup {
        CleanupPolicy::Strict
    } else {
        CleanupPolicy::BestEffort
    }
}
