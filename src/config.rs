use chrono::Offset;
use std::time::Duration;

pub const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub probe_interval: Duration,
    /// `None` waits for the backend however long inference takes.
    pub request_timeout: Option<Duration>,
    pub max_upload_bytes: u64,
    pub accepted_mime_types: Vec<String>,
    pub history_limit: usize,
    pub debug_panel: bool,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            probe_interval: Duration::from_secs(30),
            request_timeout: None,
            max_upload_bytes: 10 * MIB,
            accepted_mime_types: [
                "image/png",
                "image/jpeg",
                "image/jpg",
                "image/gif",
                "image/bmp",
                "image/webp",
            ]
            .iter()
            .map(|mime| mime.to_string())
            .collect(),
            history_limit: 10,
            debug_panel: cfg!(debug_assertions),
            logger_timezone: utc(),
        }
    }
}

impl Config {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url.trim_end_matches('/'), path)
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mut config = Config::default();
        assert_eq!(config.endpoint("health"), "http://localhost:5000/health");

        config.backend_url = "http://127.0.0.1:9000/".to_string();
        assert_eq!(config.endpoint("predict"), "http://127.0.0.1:9000/predict");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.probe_interval, Duration::from_secs(30));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.accepted_mime_types.len(), 6);
    }
}
