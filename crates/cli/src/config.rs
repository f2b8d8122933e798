use financeapp_core::models::settings::LedgerSettings;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/financeapp.toml";
const ENV_PREFIX: &str = "FINANCEAPP";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the storage files.
    pub data_dir: PathBuf,
    /// `tracing` level for both the CLI and the core crate.
    pub log_level: String,
    pub ledger: LedgerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "warn".to_string(),
            ledger: LedgerSettings::default(),
        }
    }
}

/// Flag values that override the file and the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// File (optional) < `FINANCEAPP_*` environment < command-line flags.
///
/// Nested keys use `__` in the environment, e.g.
/// `FINANCEAPP_LEDGER__STORAGE_KEY=@financeapp`.
pub fn load(overrides: &Overrides) -> Result<AppConfig> {
    let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let builder = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(data_dir) = &overrides.data_dir {
        settings.data_dir = data_dir.clone();
    }
    if let Some(level) = &overrides.log_level {
        settings.log_level = level.clone();
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let overrides = Overrides {
            config: Some("/nonexistent/financeapp".into()),
            ..Overrides::default()
        };
        let config = load(&overrides).unwrap();
        assert_eq!(config.ledger.storage_key, "FINANCEAPP_TRANSACTIONS_V1");
        assert_eq!(config.ledger.locale.decimal_separator, ',');
    }

    #[test]
    fn file_values_and_flag_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
data_dir = "/tmp/from-file"
log_level = "debug"

[ledger]
storage_key = "financeapp_entries_v1"
utc_offset_minutes = -180

[ledger.locale]
currency_symbol = "$"
thousands_separator = ","
decimal_separator = "."
"#
        )
        .unwrap();

        let overrides = Overrides {
            config: Some(file.path().to_string_lossy().into_owned()),
            data_dir: Some(PathBuf::from("/tmp/from-flag")),
            log_level: None,
        };
        let config = load(&overrides).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/from-flag"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.ledger.storage_key, "financeapp_entries_v1");
        assert_eq!(config.ledger.utc_offset_minutes, -180);
        assert_eq!(config.ledger.locale.currency_symbol, "$");
        assert_eq!(config.ledger.locale.decimal_separator, '.');
        assert_eq!(config.ledger.income_fallback_category, "Receita");
    }
}
