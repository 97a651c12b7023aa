//! Reading and writing `~/.chatcli/config.json`.
//!
//! A missing, unreadable or malformed file yields `Config::default()`; fields
//! absent from the file take their default values. There is no locking: every
//! save rewrites the full file and the last writer wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// `~/.chatcli/config.json`.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

fn resolve(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(get_config_path)
}

/// Load the config at `path` (the default location when `None`).
pub fn load_config(path: Option<&Path>) -> Config {
    read_or_default(&resolve(path))
}

fn read_or_default(path: &Path) -> Config {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config file unreadable, using defaults");
            return Config::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "config file is not valid JSON, using defaults");
        Config::default()
    })
}

/// Write `config` to `path` (the default location when `None`) as pretty JSON.
///
/// Creates the parent directory if needed. On Unix the file is made owner-only.
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let target = resolve(path);
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let body = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(&target, body)?;
    restrict_permissions(&target)?;

    debug!(path = %target.display(), "config written");
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch(contents: Option<&str>) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        if let Some(contents) = contents {
            std::fs::write(&path, contents).unwrap();
        }
        (dir, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let (_dir, path) = scratch(None);
        assert_eq!(load_config(Some(&path)), Config::default());
    }

    #[test]
    fn reads_saved_provider() {
        let (_dir, path) = scratch(Some(
            r#"{
                "default_provider": "claude",
                "providers": {
                    "claude": { "api_key": "sk-ant-123", "default_model": "claude-3-opus-20240229" }
                }
            }"#,
        ));

        let config = load_config(Some(&path));
        assert_eq!(config.default_provider, "claude");
        let claude = config.provider("claude").unwrap();
        assert_eq!(claude.api_key, "sk-ant-123");
        assert_eq!(claude.default_model.as_deref(), Some("claude-3-opus-20240229"));
        // settings absent from the file keep their defaults
        assert!(!config.show_response_time());
    }

    #[test]
    fn garbage_gives_defaults() {
        let (_dir, path) = scratch(Some("{ default_provider: "));
        assert_eq!(load_config(Some(&path)), Config::default());
    }

    #[test]
    fn empty_object_gives_defaults() {
        let (_dir, path) = scratch(Some("{}"));
        assert_eq!(load_config(Some(&path)).default_provider, "openai");
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".chatcli").join("config.json");

        let mut config = Config::default();
        config.default_provider = "gemini".to_string();
        config.provider_mut("gemini").api_key = "g-key".to_string();
        save_config(&config, Some(&path)).unwrap();

        assert_eq!(load_config(Some(&path)), config);
    }

    #[test]
    fn saved_keys_are_snake_case() {
        let (_dir, path) = scratch(None);
        save_config(&Config::default(), Some(&path)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(raw.get("default_provider").is_some());
        assert!(raw["settings"].get("show_response_time").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = scratch(None);
        save_config(&Config::default(), Some(&path)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
