// arena/src/main.rs
use anyhow::Context;
use arena::core::config::ArenaConfig;
use arena::operational::monitoring::metrics::{init_logging, MetricsSystem};
use arena::server::instance::ArenaMatch;
use tracing::{info, warn};

/// Headless host: plays one timed match and prints the summary as JSON.
///
/// Usage: `arena [config.yaml]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {:?}", e);
    }

    let config = match std::env::args().nth(1) {
        Some(path) => ArenaConfig::from_yaml_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => ArenaConfig::default(),
    };

    if let Some(port) = config.metrics_port {
        MetricsSystem::install(port)?;
        info!("Prometheus exporter listening on port {}", port);
    }

    let mut arena = ArenaMatch::new(config).context("Failed to set up match")?;

    let interrupted = tokio::select! {
        _ = arena.run(None) => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    if interrupted {
        warn!("Interrupted after {:.1}s, reporting partial results", arena.elapsed_secs());
    }

    let summary = arena.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
