//! Episode assembly pipeline binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newscast_pipeline::{run, PipelineConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting newscast-pipeline");

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    match run(&config).await {
        Ok(result) => {
            info!(
                output = %result.output_path.display(),
                subtitles = %result.subtitle_path.display(),
                metadata = %result.metadata_path.display(),
                duration_secs = format!("{:.1}", result.metadata.duration_seconds),
                "Episode assembly complete"
            );
        }
        Err(e) => {
            error!("Pipeline failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
