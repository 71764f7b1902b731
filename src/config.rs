//! Settings loaded from a TOML file
//!
//! Lookup order: an explicit path (the `--config` flag), the
//! `TRENDSCOPE_CONFIG` environment variable, then
//! `<config home>/trendscope/config.toml` when it exists. Missing keys fall
//! back to defaults; command line flags are applied on top by the caller.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::indicators::WindowPair;

pub const CONFIG_ENV_VAR: &str = "TRENDSCOPE_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub symbol: String,
    pub short_window: usize,
    pub long_window: usize,
    /// Extra calendar days fetched beyond the long window's trading days
    pub padding_days: u32,
    pub news: NewsSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsSettings {
    /// Page URL; `{symbol}` is replaced with the requested symbol
    pub url: String,
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub yahoo_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symbol: "TSLA".to_string(),
            short_window: 20,
            long_window: 50,
            padding_days: 10,
            news: NewsSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            url: "https://www.cnbc.com/quotes/{symbol}?tab=news".to_string(),
            selector: "div.Card-titleContainer".to_string(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; trendscope/0.1)".to_string(),
            timeout_secs: 30,
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, using defaults when no config file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn windows(&self) -> WindowPair {
        WindowPair::new(self.short_window, self.long_window)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".to_string()));
        }
        if self.short_window == 0 || self.long_window == 0 {
            return Err(ConfigError::Invalid(
                "moving average windows must be positive".to_string(),
            ));
        }
        if self.news.selector.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "news selector must not be empty".to_string(),
            ));
        }
        if self.short_window >= self.long_window {
            warn!(
                "short window ({}) is not shorter than long window ({})",
                self.short_window, self.long_window
            );
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dir_spec::config_home()
        .map(|dir| dir.join("trendscope").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp config");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_defaults_match_classic_crossover() {
        let settings = Settings::default();
        assert_eq!(settings.symbol, "TSLA");
        assert_eq!(settings.windows(), WindowPair::new(20, 50));
        assert_eq!(settings.news.selector, "div.Card-titleContainer");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
symbol = "AAPL"
long_window = 200

[news]
selector = "h3.headline"
"#,
        );
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.symbol, "AAPL");
        assert_eq!(settings.short_window, 20);
        assert_eq!(settings.long_window, 200);
        assert_eq!(settings.news.selector, "h3.headline");
        assert_eq!(settings.news.url, NewsSettings::default().url);
        assert_eq!(settings.http, HttpSettings::default());
    }

    #[test]
    fn test_explicit_path_wins() {
        let file = write_config("symbol = \"MSFT\"\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.symbol, "MSFT");
    }

    #[test]
    fn test_zero_window_rejected() {
        let file = write_config("short_window = 0\n");
        assert!(matches!(
            Settings::from_file(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let file = write_config("symbl = \"TSLA\"\n");
        assert!(matches!(
            Settings::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let missing = Path::new("/nonexistent/trendscope/config.toml");
        assert!(matches!(
            Settings::from_file(missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
