use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SCHEMA_VERSION: u32 = 1;

/// Source tag of every envelope sent by this connector.
pub const SOURCE: &str = "victron";

#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self { name: name.into(), value, unit: unit.into() }
    }

    /// Synthetic observation proving that the pipeline is alive.
    pub fn heartbeat() -> Self {
        Self::new("heartbeat", 1.0, "count")
    }
}

/// Non-empty, ordered metrics of a single envelope.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::Deref, derive_more::IntoIterator)]
#[serde(transparent)]
pub struct Metrics(#[into_iterator(owned, ref)] Vec<Metric>);

impl Metrics {
    pub fn heartbeat() -> Self {
        Self(vec![Metric::heartbeat()])
    }

    /// Fixed payload sent when the VRM credentials are not configured.
    pub fn sample() -> Self {
        Self(vec![
            Metric::new("pv_power_w", 5000.0, "W"),
            Metric::new("ac_load_w", 1200.0, "W"),
            Metric::new("soc_pct", 76.0, "%"),
        ])
    }

    /// Wrap the normalized metrics, falling back to the heartbeat when there are none.
    pub fn or_heartbeat(metrics: Vec<Metric>) -> Self {
        if metrics.is_empty() { Self::heartbeat() } else { Self(metrics) }
    }
}

#[must_use]
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub schema_version: u32,

    pub site_id: &'a str,

    /// Always `None` until devices get registered somewhere.
    pub device_id: Option<&'a str>,

    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    pub source: &'static str,

    pub metrics: Metrics,
}

impl<'a> Envelope<'a> {
    /// Build the envelope, capturing the current time.
    pub fn new(site_id: &'a str, source: &'static str, metrics: Metrics) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            site_id,
            device_id: None,
            timestamp: Utc::now(),
            source,
            metrics,
        }
    }
}
