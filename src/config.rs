use std::time::Duration;

use crate::{cli::Args, prelude::*};

/// Immutable run configuration, condensed from the arguments once at start-up.
#[must_use]
pub struct Config {
    pub site_id: String,
    pub since_minutes: u32,
    pub timeout: Duration,
    pub ingest: IngestConfig,
    vrm: Option<VrmConfig>,
}

pub struct IngestConfig {
    pub url_base: String,
    pub api_key: String,
}

pub struct VrmConfig {
    pub base_url: String,
    pub token: String,
    pub installation_id: String,
}

impl Config {
    /// VRM credentials, if both the token and the installation are configured.
    pub fn vrm(&self) -> Result<&VrmConfig, Error> {
        self.vrm.as_ref().ok_or(Error::UpstreamAuthMissing)
    }
}

impl TryFrom<&Args> for Config {
    type Error = Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let ingest = IngestConfig {
            url_base: non_blank(args.ingest.url_base.as_deref())
                .ok_or(Error::ConfigMissing("INGEST_URL_BASE"))?,
            api_key: non_blank(args.ingest.api_key.as_deref())
                .ok_or(Error::ConfigMissing("INGEST_KEY"))?,
        };

        let token = non_blank(args.vrm.token.as_deref());
        let installation_id = non_blank(args.vrm.installation_id.as_deref());
        let vrm = match (token, installation_id) {
            (Some(token), Some(installation_id)) => {
                Some(VrmConfig { base_url: args.vrm.base_url.clone(), token, installation_id })
            }
            (None, None) => None,
            (token, _) => {
                let missing =
                    if token.is_none() { "VICTRON_TOKEN" } else { "VICTRON_INSTALLATION_ID" };
                warn!(missing, "incomplete VRM credentials, ignoring");
                None
            }
        };

        Ok(Self {
            site_id: args.site_id.clone(),
            since_minutes: args.since_minutes,
            timeout: args.http_timeout.into(),
            ingest,
            vrm,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(ToOwned::to_owned)
}
