use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::{DemoProviderConfig, SessionConfig};
use crate::theme::ThemeManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Theme preferences
    pub theme: ThemeSettings,
    /// Identity provider timings
    pub session: SessionSettings,
    /// Log output
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub theme_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Delay of the start-up session check
    pub restore_delay_ms: u64,
    /// Upper bound for any identity provider call
    pub provider_timeout_secs: u64,
    /// Artificial latency of the demo provider
    pub simulated_latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeSettings::default(),
            session: SessionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            theme_name: "Light".to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            restore_delay_ms: 1000,
            provider_timeout_secs: 10,
            simulated_latency_ms: 300,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SessionSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            provider_timeout: Duration::from_secs(self.provider_timeout_secs.max(1)),
        }
    }

    pub fn demo_provider_config(&self) -> DemoProviderConfig {
        DemoProviderConfig {
            restore_delay: Duration::from_millis(self.restore_delay_ms),
            latency: Duration::from_millis(self.simulated_latency_ms),
        }
    }
}

pub struct SettingsManager {
    settings_path: PathBuf,
    settings: AppSettings,
}

impl SettingsManager {
    pub fn new() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::at_path(settings_path))
    }

    /// Load from an explicit file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn at_path(settings_path: PathBuf) -> Self {
        let settings = Self::load_from_file(&settings_path).unwrap_or_else(|e| {
            log::warn!(
                "Failed to read settings from {}, using defaults: {}",
                settings_path.display(),
                e
            );
            AppSettings::default()
        });

        Self {
            settings_path,
            settings,
        }
    }

    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = home::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        let config_dir = home_dir.join(".config").join("plugandtest-portal");

        // Ensure the directory exists
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("settings.json"))
    }

    fn load_from_file(path: &Path) -> Result<AppSettings> {
        if !path.exists() {
            return Ok(AppSettings::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: AppSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, content)?;
        log::info!("Settings saved to: {}", self.settings_path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn update<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut AppSettings),
    {
        updater(&mut self.settings);
        self.save()
    }

    /// Remember a theme for future runs. Names match case-insensitively.
    pub fn set_theme(&mut self, theme_name: &str) -> Result<()> {
        let available = ThemeManager::available_themes();
        let Some(canonical) = available
            .iter()
            .find(|name| name.eq_ignore_ascii_case(theme_name.trim()))
        else {
            anyhow::bail!(
                "Unknown theme '{}' (available: {})",
                theme_name,
                available.join(", ")
            );
        };
        self.update(|s| s.theme.theme_name = canonical.to_string())
    }

    // Convenience getters
    pub fn theme_name(&self) -> &str {
        &self.settings.theme.theme_name
    }

    pub fn log_level(&self) -> &str {
        &self.settings.logging.level
    }

    pub fn session_config(&self) -> SessionConfig {
        self.settings.session.session_config()
    }

    pub fn demo_provider_config(&self) -> DemoProviderConfig {
        self.settings.session.demo_provider_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "plugandtest-settings-{}-{}",
            name,
            uuid::Uuid::new_v4().simple()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir.join("settings.json")
    }

    #[test]
    fn missing_file_gives_defaults() {
        let manager = SettingsManager::at_path(scratch_path("missing"));
        assert_eq!(manager.theme_name(), "Light");
        assert_eq!(manager.log_level(), "info");
        assert_eq!(manager.session_config().provider_timeout, Duration::from_secs(10));
        assert_eq!(
            manager.demo_provider_config().restore_delay,
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let path = scratch_path("partial");
        fs::write(&path, r#"{ "session": { "provider_timeout_secs": 3 } }"#).unwrap();

        let manager = SettingsManager::at_path(path);
        assert_eq!(manager.session_config().provider_timeout, Duration::from_secs(3));
        assert_eq!(
            manager.demo_provider_config().latency,
            Duration::from_millis(300)
        );
        assert_eq!(manager.theme_name(), "Light");
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let settings = SessionSettings {
            provider_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(settings.session_config().provider_timeout, Duration::from_secs(1));
    }

    #[test]
    fn update_persists() {
        let path = scratch_path("update");
        let mut manager = SettingsManager::at_path(path.clone());
        manager.update(|s| s.theme.theme_name = "Dark".to_string()).unwrap();

        let reloaded = SettingsManager::at_path(path);
        assert_eq!(reloaded.theme_name(), "Dark");
    }

    #[test]
    fn chosen_theme_is_saved_under_its_listed_name() {
        let path = scratch_path("theme");
        let mut manager = SettingsManager::at_path(path.clone());
        manager.set_theme("high contrast").unwrap();
        assert_eq!(manager.theme_name(), "High Contrast");

        let reloaded = SettingsManager::at_path(path);
        assert_eq!(reloaded.theme_name(), "High Contrast");
    }

    #[test]
    fn unknown_theme_is_refused_and_nothing_is_written() {
        let path = scratch_path("bad-theme");
        let mut manager = SettingsManager::at_path(path.clone());
        let err = manager.set_theme("Neon").unwrap_err();
        assert!(err.to_string().contains("Unknown theme 'Neon'"));
        assert_eq!(manager.theme_name(), "Light");
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = scratch_path("corrupt");
        fs::write(&path, "not json").unwrap();
        let manager = SettingsManager::at_path(path);
        assert_eq!(manager.log_level(), "info");
    }
}
