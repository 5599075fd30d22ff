#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod config;
mod connector;
mod error;
mod normalize;
mod prelude;
mod telemetry;

use clap::{Parser, crate_version};

use crate::{
    api::{ingest, new_agent, vrm},
    cli::Args,
    config::Config,
    connector::{Connector, LiveFeed, Outcome, TelemetrySink},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let config = Config::try_from(&args)?;
    debug!(since_minutes = config.since_minutes, "lookback window is reserved");

    let agent = new_agent(config.timeout);
    let vrm = config
        .vrm()
        .inspect_err(|error| warn!("{error}"))
        .ok()
        .map(|vrm_config| vrm::Client::new(agent.clone(), vrm_config));
    let sink: Box<dyn TelemetrySink> = if args.dry_run {
        Box::new(ingest::DryRun)
    } else {
        Box::new(ingest::Client::new(agent, &config.ingest))
    };

    let outcome = Connector::builder()
        .site_id(&config.site_id)
        .maybe_live_feed(vrm.as_ref().map(|vrm| vrm as &dyn LiveFeed))
        .sink(sink.as_ref())
        .build()
        .run()?;
    match outcome {
        Outcome::Sample => info!("sent the sample metrics"),
        Outcome::Live { n_metrics } => info!(n_metrics, "sent the live metrics"),
        Outcome::FallbackHeartbeat { reason } => info!(%reason, "sent the fallback heartbeat"),
    }

    args.healthcheck.send();
    info!("done!");
    Ok(())
}
