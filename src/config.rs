use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LogshipError, LogshipResult};

/// Fixed name of the source log inside the log directory
pub const LOG_FILE_NAME: &str = "log.txt";

/// Fixed name of the extracted-addresses artifact
pub const EXTRACTED_FILE_NAME: &str = "extracted_data.txt";

/// Fixed name of the filtered artifact
pub const FILTERED_FILE_NAME: &str = "transformed_data.txt";

/// Fixed name of the archive produced by a run
pub const ARCHIVE_FILE_NAME: &str = "weblog.tar";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for one pipeline run
///
/// All artifact paths are derived from `log_dir`; the file names themselves
/// are fixed so downstream consumers can rely on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the source log and every artifact the run produces
    pub log_dir: PathBuf,

    /// IP address dropped by the filter stage (exact match against the
    /// trimmed token)
    pub blocked_ip: String,

    /// Endpoint receiving the completion notification
    pub webhook_url: String,

    /// Upper bound for the notification round trip, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            blocked_ip: String::new(),
            webhook_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> LogshipResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            LogshipError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            LogshipError::ConfigError(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Check that the settings a full run needs are present
    pub fn validate(&self) -> LogshipResult<()> {
        if self.blocked_ip.trim().is_empty() {
            return Err(LogshipError::ConfigError(
                "blocked_ip must be set".to_string(),
            ));
        }
        if self.webhook_url.trim().is_empty() {
            return Err(LogshipError::ConfigError(
                "webhook_url must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the source log
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Path of the extracted-addresses artifact
    pub fn extracted_path(&self) -> PathBuf {
        self.log_dir.join(EXTRACTED_FILE_NAME)
    }

    /// Path of the filtered artifact
    pub fn filtered_path(&self) -> PathBuf {
        self.log_dir.join(FILTERED_FILE_NAME)
    }

    /// Path of the archive
    pub fn archive_path(&self) -> PathBuf {
        self.log_dir.join(ARCHIVE_FILE_NAME)
    }

    /// Notification timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            log_dir: PathBuf::from("/data/weblogs"),
            blocked_ip: "198.46.149.143".to_string(),
            webhook_url: "https://hooks.example.com/abc".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_artifact_paths() {
        let config = test_config();
        assert_eq!(config.log_path(), PathBuf::from("/data/weblogs/log.txt"));
        assert_eq!(
            config.extracted_path(),
            PathBuf::from("/data/weblogs/extracted_data.txt")
        );
        assert_eq!(
            config.filtered_path(),
            PathBuf::from("/data/weblogs/transformed_data.txt")
        );
        assert_eq!(
            config.archive_path(),
            PathBuf::from("/data/weblogs/weblog.tar")
        );
    }

    #[test]
    fn test_validate_requires_blocked_ip() {
        let mut config = test_config();
        config.blocked_ip = "  ".to_string();

        let result = config.validate();
        assert!(matches!(result, Err(LogshipError::ConfigError(_))));
    }

    #[test]
    fn test_validate_requires_webhook_url() {
        let mut config = test_config();
        config.webhook_url = String::new();

        let result = config.validate();
        assert!(matches!(result, Err(LogshipError::ConfigError(_))));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("logship.json");
        let mut file = fs::File::create(&config_path).unwrap();
        file.write_all(
            br#"{
                "log_dir": "/data/weblogs",
                "blocked_ip": "198.46.149.143",
                "webhook_url": "https://hooks.example.com/abc"
            }"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(&config_path).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/data/weblogs"));
        assert_eq!(config.blocked_ip, "198.46.149.143");
        // timeout falls back to the default when omitted
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_from_file_missing() {
        let result = PipelineConfig::from_file(Path::new("/nonexistent/logship.json"));
        assert!(matches!(result, Err(LogshipError::ConfigError(_))));
    }

    #[test]
    fn test_from_file_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("logship.json");
        fs::write(&config_path, "not json").unwrap();

        let result = PipelineConfig::from_file(&config_path);
        assert!(matches!(result, Err(LogshipError::ConfigError(_))));
    }
}
