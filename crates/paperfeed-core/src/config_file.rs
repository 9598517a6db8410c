use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::FeedSettings;
use crate::source::http::DEFAULT_BASE_URL;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub backend: Option<BackendConfig>,
    pub feed: Option<FeedConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedConfig {
    pub fallback_limit: Option<usize>,
    pub recommend_every: Option<u64>,
    pub lock_duration_ms: Option<u64>,
    pub refilter_on_promotion: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub abstract_preview_chars: Option<usize>,
}

/// Platform config directory path: `<config_dir>/paperfeed/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paperfeed").join("config.toml"))
}

/// Load config by cascading CWD `.paperfeed.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".paperfeed.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        backend: Some(BackendConfig {
            base_url: overlay
                .backend
                .as_ref()
                .and_then(|b| b.base_url.clone())
                .or_else(|| base.backend.as_ref().and_then(|b| b.base_url.clone())),
            timeout_secs: overlay
                .backend
                .as_ref()
                .and_then(|b| b.timeout_secs)
                .or_else(|| base.backend.as_ref().and_then(|b| b.timeout_secs)),
        }),
        feed: Some(FeedConfig {
            fallback_limit: overlay
                .feed
                .as_ref()
                .and_then(|f| f.fallback_limit)
                .or_else(|| base.feed.as_ref().and_then(|f| f.fallback_limit)),
            recommend_every: overlay
                .feed
                .as_ref()
                .and_then(|f| f.recommend_every)
                .or_else(|| base.feed.as_ref().and_then(|f| f.recommend_every)),
            lock_duration_ms: overlay
                .feed
                .as_ref()
                .and_then(|f| f.lock_duration_ms)
                .or_else(|| base.feed.as_ref().and_then(|f| f.lock_duration_ms)),
            refilter_on_promotion: overlay
                .feed
                .as_ref()
                .and_then(|f| f.refilter_on_promotion)
                .or_else(|| base.feed.as_ref().and_then(|f| f.refilter_on_promotion)),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
            abstract_preview_chars: overlay
                .display
                .as_ref()
                .and_then(|d| d.abstract_preview_chars)
                .or_else(|| base.display.as_ref().and_then(|d| d.abstract_preview_chars)),
        }),
    }
}

impl ConfigFile {
    pub fn base_url(&self) -> String {
        self.backend
            .as_ref()
            .and_then(|b| b.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.backend
            .as_ref()
            .and_then(|b| b.timeout_secs)
            .map(Duration::from_secs)
    }

    /// Controller settings with unset values taken from the defaults.
    pub fn feed_settings(&self) -> FeedSettings {
        let defaults = FeedSettings::default();
        let Some(feed) = self.feed.as_ref() else {
            return defaults;
        };
        FeedSettings {
            fallback_limit: feed
                .fallback_limit
                .filter(|n| *n > 0)
                .unwrap_or(defaults.fallback_limit),
            recommend_every: feed.recommend_every.unwrap_or(defaults.recommend_every),
            lock_duration: feed
                .lock_duration_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.lock_duration),
            refilter_on_promotion: feed
                .refilter_on_promotion
                .unwrap_or(defaults.refilter_on_promotion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_section_round_trip_toml() {
        let config = ConfigFile {
            feed: Some(FeedConfig {
                fallback_limit: Some(8),
                lock_duration_ms: Some(250),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        let feed = parsed.feed.unwrap();
        assert_eq!(feed.fallback_limit, Some(8));
        assert_eq!(feed.lock_duration_ms, Some(250));
        assert!(feed.recommend_every.is_none());
    }

    #[test]
    fn empty_config_yields_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
        assert!(config.timeout().is_none());
        assert_eq!(config.feed_settings(), FeedSettings::default());
    }

    #[test]
    fn partial_feed_section_falls_back_per_field() {
        let toml_str = "[feed]\nrecommend_every = 3\nrefilter_on_promotion = false\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let settings = parsed.feed_settings();
        assert_eq!(settings.recommend_every, 3);
        assert!(!settings.refilter_on_promotion);
        assert_eq!(settings.fallback_limit, 5);
        assert_eq!(settings.lock_duration, Duration::from_millis(600));
    }

    #[test]
    fn zero_fallback_limit_is_ignored() {
        let parsed: ConfigFile = toml::from_str("[feed]\nfallback_limit = 0\n").unwrap();
        assert_eq!(parsed.feed_settings().fallback_limit, 5);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            backend: Some(BackendConfig {
                base_url: Some("http://base:8000".to_string()),
                timeout_secs: Some(30),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            backend: Some(BackendConfig {
                base_url: Some("http://overlay:9000".to_string()),
                timeout_secs: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.base_url(), "http://overlay:9000");
        assert_eq!(merged.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("midnight".to_string()),
                abstract_preview_chars: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("midnight"));
    }

    #[test]
    fn load_from_path_reads_and_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[backend]\nbase_url = \"http://x:1\"\n").unwrap();
        assert_eq!(load_from_path(&good).unwrap().base_url(), "http://x:1");

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[backend\nbase_url = ").unwrap();
        assert!(load_from_path(&bad).is_none());

        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
