use std::time::Duration;

use clap::Parser;

use crate::{
    api::{ensure_success, new_agent},
    prelude::*,
};

/// External dead man's switch, pinged after a successful run.
#[derive(Parser)]
pub struct HealthcheckArgs {
    #[clap(long = "healthcheck-url", env = "HEALTHCHECK_URL")]
    pub url: Option<String>,
}

impl HealthcheckArgs {
    pub fn send(&self) {
        if let Some(url) = &self.url
            && let Err(error) = Self::send_fallible(url)
        {
            warn!("failed to ping the health check: {error:#}");
        }
    }

    #[instrument(skip_all)]
    fn send_fallible(url: &str) -> Result {
        info!("pinging the health check…");
        ensure_success(new_agent(Duration::from_secs(3)).post(url).send_empty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{received, serve_once};

    #[test]
    fn test_send_ok() -> Result {
        let (base_url, handle) = serve_once("200 OK", "")?;
        HealthcheckArgs::send_fallible(&format!("{base_url}/ping/abc"))?;
        let request = received(handle)?;
        assert!(request.head.starts_with("POST /ping/abc "));
        Ok(())
    }

    #[test]
    fn test_send_failure_is_reported_ok() -> Result {
        let (base_url, handle) = serve_once("503 Service Unavailable", "down")?;
        let error = HealthcheckArgs::send_fallible(&base_url).unwrap_err();
        assert!(format!("{error:#}").contains("503"));
        received(handle)?;
        Ok(())
    }
}
