use bon::Builder;
use serde_json::Value;

use crate::{
    normalize::{normalize, unwrap_record},
    prelude::*,
    telemetry::{Envelope, Metrics, SOURCE},
};

/// Source of the live readings.
pub trait LiveFeed {
    fn get_live_feed(&self) -> Result<Value, Error>;
}

/// Destination of the telemetry envelope.
pub trait TelemetrySink {
    fn send(&self, envelope: &Envelope) -> Result<(), Error>;
}

/// Which path the run took.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// VRM credentials are not configured, the sample metrics were sent.
    Sample,

    /// Live feed fetched, `n_metrics` metrics recognized. Zero means the heartbeat was sent.
    Live { n_metrics: usize },

    /// Live feed failed with `reason`, the heartbeat was sent.
    FallbackHeartbeat { reason: String },
}

/// Single invocation: fetch (maybe), normalize, and send exactly one envelope.
#[derive(Builder)]
pub struct Connector<'a> {
    site_id: &'a str,

    /// `None` when the VRM credentials are missing.
    live_feed: Option<&'a dyn LiveFeed>,

    sink: &'a dyn TelemetrySink,
}

impl Connector<'_> {
    /// Only a failed send errors, upstream failures are absorbed into the heartbeat.
    #[instrument(skip_all, fields(site_id = self.site_id))]
    pub fn run(&self) -> Result<Outcome, Error> {
        let (metrics, outcome) = match self.live_feed {
            None => {
                info!("no VRM credentials, sending the sample metrics…");
                (Metrics::sample(), Outcome::Sample)
            }
            Some(live_feed) => match live_feed.get_live_feed() {
                Ok(response) => {
                    let normalized = normalize(unwrap_record(&response));
                    let n_metrics = normalized.len();
                    if n_metrics == 0 {
                        info!("no recognized metrics in the live feed, sending the heartbeat…");
                    } else {
                        info!(n_metrics, "normalized the live feed");
                    }
                    (Metrics::or_heartbeat(normalized), Outcome::Live { n_metrics })
                }
                Err(error) => {
                    let reason = format!("{:#}", anyhow::Error::from(error));
                    warn!("failed to fetch the live feed, sending the heartbeat: {reason}");
                    (Metrics::heartbeat(), Outcome::FallbackHeartbeat { reason })
                }
            },
        };
        self.sink.send(&Envelope::new(self.site_id, SOURCE, metrics))?;
        Ok(outcome)
    }
}
