use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info, warn};

use agriwatch_adapters::{ClassifierClient, FirebaseSource, ProxySource};
use agriwatch_dashboard::{
    date_range, CacheState, DashboardState, FileSource, PollConfig, Poller, SnapshotSource,
    TickPolicy,
};
use agriwatch_types::SensorKind;

#[derive(Parser, Debug)]
#[command(name = "agriwatch")]
#[command(about = "Headless monitor for agriwatch smart-irrigation telemetry")]
struct Args {
    /// Realtime database base URL to read directly
    #[arg(long, conflicts_with_all = ["connect", "file"])]
    database_url: Option<String>,

    /// Database auth token (used with --database-url)
    #[arg(long, requires = "database_url")]
    auth_token: Option<String>,

    /// agriwatch-server base URL to read through the proxy
    #[arg(short, long, conflicts_with_all = ["database_url", "file"])]
    connect: Option<String>,

    /// Path to a snapshot JSON file to replay
    #[arg(short, long, conflicts_with_all = ["database_url", "connect"])]
    file: Option<PathBuf>,

    /// Classification service endpoint for leaf-disease predictions
    #[arg(long)]
    classifier: Option<String>,

    /// Poll interval in seconds
    #[arg(short, long, default_value = "2")]
    interval: u64,

    /// Start a snapshot read on every tick even if the previous read is
    /// still in flight (historical behavior; reads may race)
    #[arg(long)]
    allow_overlap: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let source: Arc<dyn SnapshotSource> = if let Some(url) = &args.database_url {
        let mut builder = FirebaseSource::builder().database_url(url.as_str());
        if let Some(token) = &args.auth_token {
            builder = builder.auth_token(token.as_str());
        }
        Arc::new(builder.build())
    } else if let Some(path) = &args.file {
        Arc::new(FileSource::new(path))
    } else {
        let base = args
            .connect
            .clone()
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        Arc::new(ProxySource::builder().base_url(base).build())
    };

    let config = PollConfig {
        interval: Duration::from_secs(args.interval),
        tick_policy: if args.allow_overlap {
            TickPolicy::AllowOverlap
        } else {
            TickPolicy::Serialize
        },
    };

    info!(
        "monitoring {} every {}s",
        source.description(),
        args.interval
    );

    let mut poller = Poller::new(source, config);
    if let Some(endpoint) = &args.classifier {
        let classifier = ClassifierClient::builder().endpoint(endpoint.as_str()).build();
        poller = poller.with_classifier(Arc::new(classifier));
    }

    let (handle, mut state_rx) = poller.start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow().clone();
                log_state(&state);
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Log one derived state update; this is the render layer of the headless
/// monitor.
fn log_state(state: &DashboardState) {
    if let Some(error) = &state.read_error {
        warn!("snapshot read failing: {}", error);
        return;
    }

    info!(
        "temperature {:.1}°C | humidity {:.1} | soil {:.1} ({}) | water {:.1} ({})",
        state.temperature.latest.value,
        state.humidity.latest.value,
        state.soil_moisture.latest.value,
        state.soil_moisture_band().label(),
        state.water_level.latest.value,
        state.water_level_band().label(),
    );

    for kind in SensorKind::ALL {
        debug!(
            "{} chart window: {}",
            kind.label(),
            date_range(&state.sensor(kind).series)
        );
    }

    if let Some(controller) = &state.controller {
        info!(
            "pump {} ({}) | last start {}",
            controller.relay_state, controller.relay_reason, controller.last_relay_start
        );
    }

    match state.prediction_state {
        CacheState::Idle => {}
        CacheState::Pending => info!("prediction: pending"),
        CacheState::Ready => {
            if let Some(prediction) = &state.prediction {
                info!(
                    "prediction: {} ({:.0}%)",
                    prediction.predict,
                    prediction.probs.get(prediction.predict) * 100.0
                );
            }
        }
    }
}
