use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `GET /health`. Only `model_loaded` is required; anything that
/// lacks it is treated as an offline backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    pub model_loaded: bool,
    #[serde(default)]
    pub database_connected: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// A 2xx reply from `POST /predict`, classified once on receipt.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictReply {
    Prediction {
        label: String,
        confidence: Option<f64>,
    },
    Rejected {
        message: String,
    },
    Malformed,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PredictBody {
    Rejected {
        error: String,
    },
    Prediction {
        prediction: String,
        #[serde(default)]
        confidence: Option<f64>,
    },
}

impl PredictReply {
    /// An `error` field wins over `prediction`; empty strings count as absent.
    pub fn from_value(value: serde_json::Value) -> Self {
        match serde_json::from_value::<PredictBody>(value.clone()) {
            Ok(PredictBody::Rejected { error }) if !error.is_empty() => {
                PredictReply::Rejected { message: error }
            }
            Ok(PredictBody::Prediction {
                prediction,
                confidence,
            }) if !prediction.is_empty() => PredictReply::Prediction {
                label: prediction,
                confidence,
            },
            Ok(PredictBody::Rejected { .. }) => match value
                .get("prediction")
                .and_then(serde_json::Value::as_str)
            {
                Some(label) if !label.is_empty() => PredictReply::Prediction {
                    label: label.to_string(),
                    confidence: value.get("confidence").and_then(serde_json::Value::as_f64),
                },
                _ => PredictReply::Malformed,
            },
            _ => PredictReply::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The connection could not be opened at all.
    Unreachable(String),
    /// The connection opened but the exchange failed midway.
    Network(String),
    /// Non-2xx status; `message` is what the user should see.
    Status { code: u16, message: String },
    Decode(String),
    Io(String),
    Other(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unreachable(message) => write!(f, "backend unreachable: {}", message),
            BackendError::Network(message) => write!(f, "network error: {}", message),
            BackendError::Status { message, .. } => write!(f, "{}", message),
            BackendError::Decode(message) => write!(f, "invalid response body: {}", message),
            BackendError::Io(message) => write!(f, "{}", message),
            BackendError::Other(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for BackendError {}

impl BackendError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackendError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            BackendError::Unreachable(err.to_string())
        } else if err.is_timeout() || err.is_request() || err.is_body() {
            BackendError::Network(err.to_string())
        } else if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

/// The remote inference service.
pub trait Backend: Send + Sync {
    fn health(&self) -> Result<HealthReport, BackendError>;
    fn predict(&self, upload: Upload) -> Result<PredictReply, BackendError>;
    fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, BackendError>;
}
