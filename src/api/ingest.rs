use ureq::Agent;

use crate::{
    api::{CallError, ensure_success, read_body},
    config::IngestConfig,
    connector::TelemetrySink,
    prelude::*,
    telemetry::Envelope,
};

pub struct Client {
    agent: Agent,
    url: String,
    api_key: String,
}

impl Client {
    pub fn new(agent: Agent, config: &IngestConfig) -> Self {
        Self {
            agent,
            url: format!("{}/ingest/telemetry", config.url_base.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        }
    }
}

impl TelemetrySink for Client {
    #[instrument(skip_all, fields(url = %self.url, n_metrics = envelope.metrics.len()))]
    fn send(&self, envelope: &Envelope) -> Result<(), Error> {
        info!("sending…");
        let mut response = self
            .agent
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .send_json(envelope)
            .map_err(CallError::from)
            .and_then(ensure_success)
            .map_err(Error::IngestionCallFailed)?;
        let body = read_body(&mut response);
        info!(status = %response.status(), body = %body, "ingested");
        Ok(())
    }
}

/// Sink that prints the envelope instead of sending it.
pub struct DryRun;

impl TelemetrySink for DryRun {
    fn send(&self, envelope: &Envelope) -> Result<(), Error> {
        warn!("dry run, the envelope is not sent");
        println!("{}", serde_json::to_string_pretty(envelope)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::Value;

    use super::*;
    use crate::{
        api::{
            new_agent,
            testing::{received, serve_once},
        },
        telemetry::{Metrics, SOURCE},
    };

    fn client(url_base: String) -> Client {
        let config = IngestConfig { url_base, api_key: "key".to_owned() };
        Client::new(new_agent(Duration::from_secs(5)), &config)
    }

    #[test]
    fn test_send_ok() -> Result {
        let (base_url, handle) = serve_once("202 Accepted", r#"{"accepted":1}"#)?;
        client(format!("{base_url}/")).send(&Envelope::new("site-1", SOURCE, Metrics::sample()))?;

        let request = received(handle)?;
        let head = request.head.to_ascii_lowercase();
        assert!(head.starts_with("post /ingest/telemetry "), "{head}");
        assert!(head.contains("x-api-key: key\r\n"));
        assert!(head.contains("content-type: application/json"));

        let body: Value = serde_json::from_str(&request.body)?;
        assert_eq!(body["schema_version"], 1);
        assert_eq!(body["site_id"], "site-1");
        assert_eq!(body["source"], "victron");
        assert_eq!(body["metrics"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[test]
    fn test_send_server_error_ok() -> Result {
        let (base_url, handle) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#)?;
        let envelope = Envelope::new("site-1", SOURCE, Metrics::heartbeat());
        let error = client(base_url).send(&envelope).unwrap_err();
        match &error {
            Error::IngestionCallFailed(CallError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 500);
                assert!(body.contains("boom"));
            }
            _ => panic!("unexpected error: {error}"),
        }
        received(handle)?;
        Ok(())
    }

    #[test]
    fn test_dry_run_ok() -> Result {
        DryRun.send(&Envelope::new("site-1", SOURCE, Metrics::heartbeat()))?;
        Ok(())
    }
}
