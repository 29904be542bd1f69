use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub polling: Option<PollingConfig>,
    pub upload: Option<UploadConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_file_size_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config directory path: `<config_dir>/askdocs/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("askdocs").join("config.toml"))
}

/// Load config by cascading CWD `.askdocs.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".askdocs.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            base_url: overlay
                .server
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.base_url.clone())),
        }),
        polling: Some(PollingConfig {
            interval_ms: overlay
                .polling
                .as_ref()
                .and_then(|p| p.interval_ms)
                .or_else(|| base.polling.as_ref().and_then(|p| p.interval_ms)),
        }),
        upload: Some(UploadConfig {
            max_file_size_mb: overlay
                .upload
                .as_ref()
                .and_then(|u| u.max_file_size_mb)
                .or_else(|| base.upload.as_ref().and_then(|u| u.max_file_size_mb)),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let cfg: ConfigFile = toml::from_str(
            r#"
            [server]
            base_url = "http://example.com:8000"
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.server.and_then(|s| s.base_url).as_deref(),
            Some("http://example.com:8000")
        );
        assert!(cfg.polling.is_none());
    }

    #[test]
    fn merge_prefers_overlay() {
        let base: ConfigFile = toml::from_str(
            r#"
            [server]
            base_url = "http://base"
            [polling]
            interval_ms = 2000
            "#,
        )
        .unwrap();
        let overlay: ConfigFile = toml::from_str(
            r#"
            [server]
            base_url = "http://overlay"
            [upload]
            max_file_size_mb = 10
            "#,
        )
        .unwrap();

        let merged = merge(base, overlay);
        assert_eq!(
            merged.server.and_then(|s| s.base_url).as_deref(),
            Some("http://overlay")
        );
        // Base value survives when overlay is silent.
        assert_eq!(merged.polling.and_then(|p| p.interval_ms), Some(2000));
        assert_eq!(merged.upload.and_then(|u| u.max_file_size_mb), Some(10));
    }

    #[test]
    fn missing_file_loads_as_none() {
        assert!(load_from_path(&PathBuf::from("/nonexistent/askdocs.toml")).is_none());
    }
}
