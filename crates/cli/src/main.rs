mod commands;
mod config;
mod error;
mod prompt;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(&cli.overrides())?;

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), &config.log_level))
        .with_writer(std::io::stderr)
        .init();

    cli.run(config).await
}

/// `RUST_LOG` wins when it is set and parses; otherwise the configured level
/// applies to both crates.
fn log_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("financeapp={level},financeapp_core={level}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_config_level() {
        let filter = log_filter(Some("financeapp_core=trace"), "warn").to_string();
        assert!(filter.contains("financeapp_core=trace"));
        assert!(!filter.contains("warn"));
    }

    #[test]
    fn config_level_without_rust_log() {
        let filter = log_filter(None, "debug").to_string();
        assert!(filter.contains("financeapp=debug"));
        assert!(filter.contains("financeapp_core=debug"));
    }

    #[test]
    fn blank_or_broken_rust_log_falls_back() {
        for bad in ["", "   ", "financeapp=loud"] {
            let filter = log_filter(Some(bad), "info").to_string();
            assert!(filter.contains("financeapp=info"), "{bad:?} -> {filter}");
        }
    }
}
