//! Client configuration: backend URL and where files and history live.

use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

pub const ENV_API_URL: &str = "VIDEO_DOWNLOADER_API_URL";
pub const ENV_DOWNLOAD_DIR: &str = "VIDEO_DOWNLOADER_DOWNLOAD_DIR";
pub const ENV_STORAGE_DIR: &str = "VIDEO_DOWNLOADER_STORAGE_DIR";

const CONFIG_FILE: &str = "config.json";

/// Explicit configuration handed to the client constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, swapped per deployment target
    pub api_base_url: Url,
    /// Where downloaded files are saved
    pub download_dir: PathBuf,
    /// Where persisted client state (history) is kept
    pub storage_dir: PathBuf,
}

/// On-disk overrides; every field optional
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct ConfigFile {
    api_base_url: Option<String>,
    download_dir: Option<PathBuf>,
    storage_dir: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "VideoDownloader", "video_downloader_client")
}

impl Default for ClientConfig {
    fn default() -> Self {
        let download_dir = UserDirs::new()
            .and_then(|u| u.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("./downloads"));
        let storage_dir = project_dirs()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default URL is valid"),
            download_dir,
            storage_dir,
        }
    }
}

impl ClientConfig {
    /// Config pointing at a specific backend, other fields defaulted.
    pub fn with_base_url(base: &str) -> Result<Self> {
        Ok(Self {
            api_base_url: parse_base_url(base)?,
            ..Self::default()
        })
    }

    /// Defaults, then `config.json` in the user config dir, then environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(dirs) = project_dirs() {
            let path = dirs.config_dir().join(CONFIG_FILE);
            if path.exists() {
                config.apply_file(&path)?;
                tracing::debug!(path = %path.display(), "loaded config file");
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&raw)?;
        if let Some(url) = file.api_base_url {
            self.api_base_url = parse_base_url(&url)?;
        }
        if let Some(dir) = file.download_dir {
            self.download_dir = dir;
        }
        if let Some(dir) = file.storage_dir {
            self.storage_dir = dir;
        }
        Ok(())
    }

    fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = get(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = parse_base_url(&url)?;
        }
        if let Some(dir) = get(ENV_DOWNLOAD_DIR).filter(|v| !v.trim().is_empty()) {
            self.download_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Full URL of an API path such as `api/info`, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ClientError::Validation(format!("Invalid API base URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Validation(format!(
            "API base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn endpoint_keeps_prefix_and_single_slash() {
        let c = ClientConfig::with_base_url("https://api.example.com/v1/").unwrap();
        assert_eq!(c.endpoint("/api/info"), "https://api.example.com/v1/api/info");

        let c = ClientConfig::default();
        assert_eq!(c.endpoint("api/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(ClientConfig::with_base_url("ftp://example.com").is_err());
        assert!(ClientConfig::with_base_url("::").is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "https://dl.example.com"),
            (ENV_DOWNLOAD_DIR, "/tmp/videos"),
            (ENV_STORAGE_DIR, ""),
        ]);
        let mut c = ClientConfig::default();
        let storage_before = c.storage_dir.clone();
        c.apply_env(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(c.api_base_url.as_str(), "https://dl.example.com/");
        assert_eq!(c.download_dir, PathBuf::from("/tmp/videos"));
        assert_eq!(c.storage_dir, storage_before);
    }

    #[test]
    fn file_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"api_base_url":"https://video-downloader-api.up.railway.app","download_dir":"/data/dl"}"#,
        )
        .unwrap();

        let mut c = ClientConfig::default();
        c.apply_file(&path).unwrap();
        assert_eq!(
            c.endpoint("api/info"),
            "https://video-downloader-api.up.railway.app/api/info"
        );
        assert_eq!(c.download_dir, PathBuf::from("/data/dl"));
    }
}
