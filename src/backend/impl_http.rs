use crate::backend::interface::{
    Backend, BackendError, HealthReport, HistoryEntry, PredictReply, Upload,
};
use crate::config::Config;
use crate::library::logger::interface::Logger;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

pub struct BackendHttp {
    client: Client,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl BackendHttp {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            config,
            logger: logger.with_namespace("backend").with_namespace("http"),
        })
    }

    fn read_json(&self, response: Response) -> Result<serde_json::Value, BackendError> {
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Turns a non-2xx reply into the message shown to the user, preferring the
/// backend's own `error` field.
fn status_error(status: StatusCode, body: &str) -> BackendError {
    let code = status.as_u16();
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(error),
        }) if !error.is_empty() => error,
        Ok(_) => format!("Server Error: {}", code),
        Err(_) => format!(
            "HTTP {}: {}",
            code,
            status.canonical_reason().unwrap_or("Unknown Status")
        ),
    };
    BackendError::Status { code, message }
}

impl Backend for BackendHttp {
    fn health(&self) -> Result<HealthReport, BackendError> {
        let response = self
            .client
            .get(self.config.endpoint("health"))
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                code: status.as_u16(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let report: HealthReport = serde_json::from_str(&response.text()?)?;
        Ok(report)
    }

    fn predict(&self, upload: Upload) -> Result<PredictReply, BackendError> {
        let url = self.config.endpoint("predict");
        let _ = self.logger.info(&format!(
            "Uploading {} ({:.2} KB) to {}",
            upload.file_name,
            upload.bytes.len() as f64 / 1024.0,
            url
        ));

        // Content-Type with the boundary comes from the form itself.
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send()?;
        let _ = self
            .logger
            .info(&format!("Response status: {}", response.status()));

        let value = self.read_json(response)?;
        Ok(PredictReply::from_value(value))
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, BackendError> {
        let response = self
            .client
            .get(self.config.endpoint("history"))
            .header(ACCEPT, "application/json")
            .send()?;

        let value = self.read_json(response)?;
        let mut entries: Vec<HistoryEntry> = serde_json::from_value(value)?;
        entries.truncate(limit);
        Ok(entries)
    }
}
