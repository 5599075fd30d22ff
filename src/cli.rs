mod healthcheck;

use clap::Parser;

pub use self::healthcheck::HealthcheckArgs;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(long, env = "SITE_ID")]
    pub site_id: String,

    /// Lookback window in minutes, reserved for historical queries.
    #[clap(long, env = "SINCE_MINUTES", default_value = "5")]
    pub since_minutes: u32,

    #[clap(flatten)]
    pub ingest: IngestArgs,

    #[clap(flatten)]
    pub vrm: VrmArgs,

    /// Timeout of each outbound call.
    #[clap(long, env = "HTTP_TIMEOUT", default_value = "30s")]
    pub http_timeout: humantime::Duration,

    /// Print the envelope instead of posting it.
    #[clap(long)]
    pub dry_run: bool,

    #[clap(flatten)]
    pub healthcheck: HealthcheckArgs,
}

/// Ingestion endpoint settings.
///
/// Optional for the parser, so that their absence is reported by [`crate::config::Config`].
#[derive(Parser)]
pub struct IngestArgs {
    /// Ingestion API base URL, for example: `https://ingest.example.com`.
    #[clap(long = "ingest-url-base", env = "INGEST_URL_BASE")]
    pub url_base: Option<String>,

    #[clap(long = "ingest-key", env = "INGEST_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Parser)]
pub struct VrmArgs {
    /// VRM access token.
    #[clap(long = "victron-token", env = "VICTRON_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[clap(long = "victron-installation-id", env = "VICTRON_INSTALLATION_ID")]
    pub installation_id: Option<String>,

    #[clap(
        long = "vrm-api-base-url",
        env = "VRM_API_BASE_URL",
        default_value = "https://vrmapi.victronenergy.com"
    )]
    pub base_url: String,
}
