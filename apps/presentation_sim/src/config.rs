use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub present_delay_ms: u64,
    pub dismiss_delay_ms: u64,
    pub hidden_delay_ms: u64,
    pub animated: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            present_delay_ms: 50,
            dismiss_delay_ms: 50,
            hidden_delay_ms: 20,
            animated: true,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn present_delay(&self) -> Duration {
        Duration::from_millis(self.present_delay_ms)
    }

    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_delay_ms)
    }

    pub fn hidden_delay(&self) -> Duration {
        Duration::from_millis(self.hidden_delay_ms)
    }
}

/// Defaults, then the TOML file at `path` if it exists, then `SIM__*` env vars.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

fn load_settings_with_env(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            apply_file(&mut settings, &file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    apply_env(&mut settings, env);
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    let millis = |key: &str| {
        file_cfg
            .get(key)
            .and_then(toml::Value::as_integer)
            .and_then(|v| u64::try_from(v).ok())
    };

    if let Some(v) = millis("present_delay_ms") {
        settings.present_delay_ms = v;
    }
    if let Some(v) = millis("dismiss_delay_ms") {
        settings.dismiss_delay_ms = v;
    }
    if let Some(v) = millis("hidden_delay_ms") {
        settings.hidden_delay_ms = v;
    }
    if let Some(v) = file_cfg.get("animated").and_then(toml::Value::as_bool) {
        settings.animated = v;
    }
    if let Some(v) = file_cfg.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }
}

fn apply_env(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("SIM__PRESENT_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.present_delay_ms = v;
    }
    if let Some(v) = env("SIM__DISMISS_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.dismiss_delay_ms = v;
    }
    if let Some(v) = env("SIM__HIDDEN_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.hidden_delay_ms = v;
    }
    if let Some(v) = env("SIM__ANIMATED").and_then(|v| v.parse().ok()) {
        settings.animated = v;
    }
    if let Some(v) = env("SIM__LOG_FILTER") {
        settings.log_filter = v;
    }
}
