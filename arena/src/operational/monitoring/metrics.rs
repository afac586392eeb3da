// arena/src/operational/monitoring/metrics.rs
use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

pub struct MetricsSystem;

impl MetricsSystem {
    /// Starts the Prometheus scrape endpoint on `port` and registers metric descriptions.
    pub fn install(port: u16) -> Result<Self> {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()
            .context("Failed to install Prometheus exporter")?;
        Self::describe();
        Ok(MetricsSystem)
    }

    fn describe() {
        describe_counter!("arena_ticks_total", "Simulation ticks processed");
        describe_counter!("arena_shots_total", "Shots fired by agents");
        describe_counter!("arena_hits_total", "Agent shots that hit");
        describe_counter!("arena_kills_total", "Kills credited by the match host");
        describe_counter!("arena_respawns_total", "Agent respawns");
        describe_gauge!("arena_agents_alive", "Agents alive at the end of the last tick");
        describe_histogram!("arena_tick_time_seconds", "Wall time spent in one simulation tick");
    }
}

pub fn record_tick(duration_secs: f64, alive_agents: usize) {
    histogram!("arena_tick_time_seconds").record(duration_secs);
    counter!("arena_ticks_total").increment(1);
    gauge!("arena_agents_alive").set(alive_agents as f64);
}

pub fn record_kill() {
    counter!("arena_kills_total").increment(1);
}

pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "arena=info,warn".into()))
        .with(fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
