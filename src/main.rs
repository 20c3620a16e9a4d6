//! cloudsim-pilot: Terminal dashboards for simulated cloud services

use clap::Parser;
use cloudsim_pilot_core::{PilotConfig, ThemeKind};
use cloudsim_pilot_tui::{App, ViewKind};
use color_eyre::Result;
use std::fs::File;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// cloudsim-pilot: Terminal UI for the bucket and queue simulators
#[derive(Parser, Debug)]
#[command(name = "cloudsim-pilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/cloudsim-pilot/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bucket service endpoint (host, host:port or URL)
    #[arg(long)]
    bucket_url: Option<String>,

    /// Queue service endpoint (host, host:port or URL)
    #[arg(long)]
    queue_url: Option<String>,

    /// Bucket refresh interval in milliseconds
    #[arg(long)]
    bucket_interval_ms: Option<u64>,

    /// Queue refresh interval in milliseconds
    #[arg(long)]
    queue_interval_ms: Option<u64>,

    /// Color theme (light or dark)
    #[arg(long)]
    theme: Option<ThemeKind>,

    /// View to open first (bucket or queue)
    #[arg(long, default_value = "bucket")]
    view: ViewKind,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log file path (default: /tmp/cloudsim-pilot.log)
    #[arg(long, default_value = "/tmp/cloudsim-pilot.log")]
    log_file: String,
}

impl Cli {
    /// Command-line flags take precedence over the config file
    fn apply_overrides(&self, config: &mut PilotConfig) {
        if let Some(url) = &self.bucket_url {
            config.bucket.endpoint = Some(url.clone());
        }
        if let Some(url) = &self.queue_url {
            config.queue.endpoint = Some(url.clone());
        }
        if let Some(ms) = self.bucket_interval_ms {
            config.bucket.refresh_interval_ms = Some(ms);
        }
        if let Some(ms) = self.queue_interval_ms {
            config.queue.refresh_interval_ms = Some(ms);
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging to file (not stdout, which would corrupt TUI)
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let log_file = File::create(&cli.log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false),
        )
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    tracing::info!("Starting cloudsim-pilot");

    let mut config = PilotConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let mut app = App::new(&config, cli.view)?;
    app.run().await?;

    tracing::info!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "cloudsim-pilot",
            "--queue-url",
            "queue.local:9001",
            "--queue-interval-ms",
            "1000",
            "--theme",
            "dark",
            "--view",
            "queue",
        ]);
        let mut config = PilotConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.queue_endpoint(), "queue.local:9001");
        assert_eq!(config.queue_interval().as_millis(), 1000);
        assert_eq!(config.bucket_endpoint(), "http://localhost:8080");
        assert_eq!(config.theme, ThemeKind::Dark);
        assert_eq!(cli.view, ViewKind::Queue);
    }

    #[test]
    fn test_zero_interval_flag_fails_validation() {
        let cli = Cli::parse_from(["cloudsim-pilot", "--bucket-interval-ms", "0"]);
        let mut config = PilotConfig::default();
        cli.apply_overrides(&mut config);
        assert!(config.validate().is_err());
    }
}
