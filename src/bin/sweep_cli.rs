//! Headless sweep inspector
//!
//! Run with: cargo run --features cli --bin sweep-cli [-- SOURCE]
//!
//! Loads the dataset once, logs what was parsed, then logs what the sweep
//! would be showing every second until Ctrl-C.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::info;
    use tracing_subscriber::{fmt, EnvFilter};
    use yearsweep::core::{ingest, PointLayer, PointShading, SweepConfig, VirtualClock};
    use yearsweep::loader_native::fetch;
    use yearsweep::time::now_seconds;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,yearsweep=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let mut config = SweepConfig::from_env()?;
    if let Some(source) = std::env::args().nth(1) {
        config.dataset.source = source;
    }
    let source = config.dataset.resolved_source();

    info!(source = %source, "Loading dataset");
    let body = fetch(&source).await?;
    let (set, summary) = ingest(&body, &config.size);
    info!(
        events = summary.events,
        short_rows = summary.short_rows,
        unprojectable_rows = summary.unprojectable_rows,
        year_range = ?summary.year_range,
        "Dataset loaded"
    );

    let mut layer = PointLayer::new(Arc::new(config.fade) as Arc<dyn PointShading>);
    layer.replace(set);
    let clock = VirtualClock::new(config.clock, now_seconds());
    if let Some(period) = clock.period() {
        info!(period_secs = %format!("{period:.1}"), "Sweep period");
    }

    let mut stats_interval = tokio::time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = stats_interval.tick() => {
                let year = clock.current_year(now_seconds());
                info!(
                    year = %format!("{year:.0}"),
                    visible = layer.visible_count(year),
                    discernible = layer.discernible_count(year, 1.0),
                    "stats"
                );
            }
            _ = &mut ctrl_c => {
                info!("Interrupted, exiting");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
