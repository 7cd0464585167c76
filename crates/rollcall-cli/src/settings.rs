//! Startup settings.
//!
//! Sources, lowest precedence first: built-in defaults, the settings file
//! (`config/rollcall.toml` if present, or the file given with `--config`),
//! then `ROLLCALL_<SECTION>__<KEY>` environment variables. Settings are read
//! once; there is no reconfiguration at runtime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use rollcall_core::constants::{
    DEFAULT_LINK_RETRY_MS, DEFAULT_LONG_SIGNAL_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SCAN_COOLDOWN_MS, DEFAULT_SHORT_SIGNAL_MS,
};
use rollcall_network::{ReportClientConfig, parse_endpoint};
use rollcall_terminal::{DedupPolicy, FeedbackConfig, TerminalConfig};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SETTINGS_FILE: &str = "config/rollcall";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub network: NetworkSettings,
    pub terminal: TerminalSettings,
    pub feedback: FeedbackSettings,
    pub reader: ReaderSettings,
    pub indicator: IndicatorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSettings {
    pub endpoint: String,
    pub request_timeout_ms: u64,
    pub link_retry_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TerminalSettings {
    #[serde(default)]
    pub group_id: Option<i32>,
    pub poll_interval_ms: u64,
    pub scan_cooldown_ms: u64,
    pub dedup: DedupPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackSettings {
    pub short_ms: u64,
    pub long_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderKind {
    /// Hex UIDs typed on standard input
    Stdin,
    /// PC/SC contactless reader
    Pcsc,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaderSettings {
    pub kind: ReaderKind,
    /// PC/SC reader name; the first reader found when unset
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// Log every change, no lamp
    Log,
    /// One lamp on one output line
    Single,
    /// Positive, negative and session lamps
    Tri,
}

impl IndicatorKind {
    fn line_count(self) -> usize {
        match self {
            IndicatorKind::Log => 0,
            IndicatorKind::Single => 1,
            IndicatorKind::Tri => 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorSettings {
    pub kind: IndicatorKind,
    /// GPIO value files, in lamp order
    #[serde(default)]
    pub lines: Vec<PathBuf>,
    pub active_low: bool,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_sources(path, None)
    }

    /// Load settings, taking overrides from `env_vars` instead of the process
    /// environment when given.
    pub fn load_with_sources(
        path: Option<&Path>,
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = ConfigLib::builder()
            .set_default("network.endpoint", "http://127.0.0.1:5000/log-rfid")?
            .set_default("network.request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?
            .set_default("network.link_retry_ms", DEFAULT_LINK_RETRY_MS)?
            .set_default("terminal.poll_interval_ms", DEFAULT_POLL_INTERVAL_MS)?
            .set_default("terminal.scan_cooldown_ms", DEFAULT_SCAN_COOLDOWN_MS)?
            .set_default("terminal.dedup", "last_reported")?
            .set_default("feedback.short_ms", DEFAULT_SHORT_SIGNAL_MS)?
            .set_default("feedback.long_ms", DEFAULT_LONG_SIGNAL_MS)?
            .set_default("reader.kind", "stdin")?
            .set_default("indicator.kind", "log")?
            .set_default("indicator.active_low", true)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_SETTINGS_FILE).required(false)),
        };

        // Explicit overrides keep tests independent of the process environment
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // ROLLCALL_NETWORK__ENDPOINT, ROLLCALL_INDICATOR__LINES=/a,/b,/c
            builder = builder.add_source(
                Environment::with_prefix("ROLLCALL")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("indicator.lines")
                    .try_parsing(true),
            );
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        parse_endpoint(&self.network.endpoint)
            .map_err(|e| SettingsError::invalid("network.endpoint", e.to_string()))?;

        if self.network.request_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "network.request_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.network.link_retry_ms == 0 {
            return Err(SettingsError::invalid(
                "network.link_retry_ms",
                "must be greater than zero",
            ));
        }

        self.terminal_config()
            .validate()
            .map_err(|e| SettingsError::invalid("terminal.poll_interval_ms", e.to_string()))?;

        let expected = self.indicator.kind.line_count();
        if self.indicator.lines.len() != expected {
            return Err(SettingsError::invalid(
                "indicator.lines",
                format!(
                    "{:?} indicator needs {} line(s), got {}",
                    self.indicator.kind,
                    expected,
                    self.indicator.lines.len()
                ),
            ));
        }

        Ok(())
    }

    pub fn report_client_config(&self) -> ReportClientConfig {
        ReportClientConfig {
            endpoint: self.network.endpoint.clone(),
            timeout: Duration::from_millis(self.network.request_timeout_ms),
            group_id: self.terminal.group_id,
        }
    }

    pub fn terminal_config(&self) -> TerminalConfig {
        TerminalConfig {
            poll_interval: Duration::from_millis(self.terminal.poll_interval_ms),
            scan_cooldown: Duration::from_millis(self.terminal.scan_cooldown_ms),
        }
    }

    pub fn feedback_config(&self) -> FeedbackConfig {
        FeedbackConfig {
            short: Duration::from_millis(self.feedback.short_ms),
            long: Duration::from_millis(self.feedback.long_ms),
        }
    }

    pub fn link_retry(&self) -> Duration {
        Duration::from_millis(self.network.link_retry_ms)
    }
}
