use serde_json::Value;
use ureq::Agent;

use crate::{
    api::{CallError, ensure_success},
    config::VrmConfig,
    connector::LiveFeed,
    prelude::*,
};

/// Victron Remote Monitoring API client bound to a single installation.
pub struct Client {
    agent: Agent,
    base_url: String,
    authorization: String,
    installation_id: String,
}

impl Client {
    pub fn new(agent: Agent, config: &VrmConfig) -> Self {
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            authorization: format!("Bearer {}", config.token),
            installation_id: config.installation_id.clone(),
        }
    }

    /// Query the installation statistics of the given type.
    ///
    /// The response is returned as is, its shape differs between installations.
    #[instrument(
        skip_all,
        fields(installation_id = %self.installation_id, stats_type = stats_type),
    )]
    pub fn get_stats(&self, stats_type: &str) -> Result<Value, Error> {
        info!("fetching…");
        let url = format!("{}/v2/installations/{}/stats", self.base_url, self.installation_id);
        let mut response = self
            .agent
            .get(&url)
            .header("x-authorization", &self.authorization)
            .query("type", stats_type)
            .call()
            .map_err(CallError::from)
            .and_then(ensure_success)
            .map_err(Error::UpstreamCallFailed)?;
        let stats: Value = response
            .body_mut()
            .read_json()
            .map_err(|error| Error::UpstreamCallFailed(error.into()))?;
        debug!(%stats, "fetched");
        Ok(stats)
    }
}

impl LiveFeed for Client {
    fn get_live_feed(&self) -> Result<Value, Error> {
        self.get_stats("live_feed")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::api::{
        new_agent,
        testing::{received, serve_once},
    };

    fn client(base_url: String) -> Client {
        let config = VrmConfig {
            base_url,
            token: "secret".to_owned(),
            installation_id: "12345".to_owned(),
        };
        Client::new(new_agent(Duration::from_secs(5)), &config)
    }

    #[test]
    fn test_get_live_feed_ok() -> Result {
        let (base_url, handle) =
            serve_once("200 OK", r#"{"success":true,"records":{"solar":{"power":3000}}}"#)?;
        let stats = client(format!("{base_url}/")).get_live_feed()?;
        assert_eq!(stats["records"], json!({ "solar": { "power": 3000 } }));

        let request = received(handle)?;
        assert!(
            request.head.starts_with("GET /v2/installations/12345/stats?type=live_feed "),
            "{}",
            request.head,
        );
        assert!(request.head.to_ascii_lowercase().contains("x-authorization: bearer secret\r\n"));
        Ok(())
    }

    #[test]
    fn test_get_live_feed_unauthorized_ok() -> Result {
        let (base_url, handle) = serve_once("401 Unauthorized", r#"{"errors":"invalid token"}"#)?;
        let error = client(base_url).get_live_feed().unwrap_err();
        match &error {
            Error::UpstreamCallFailed(CallError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("invalid token"));
            }
            _ => panic!("unexpected error: {error}"),
        }
        received(handle)?;
        Ok(())
    }

    #[test]
    fn test_get_live_feed_invalid_json_ok() -> Result {
        let (base_url, handle) = serve_once("200 OK", "<html>maintenance</html>")?;
        let error = client(base_url).get_live_feed().unwrap_err();
        assert!(matches!(error, Error::UpstreamCallFailed(CallError::Transport(_))));
        received(handle)?;
        Ok(())
    }

    #[test]
    fn test_get_live_feed_unreachable_ok() {
        let error = client("http://127.0.0.1:1".to_owned()).get_live_feed().unwrap_err();
        assert!(matches!(error, Error::UpstreamCallFailed(CallError::Transport(_))));
    }
}
