use crate::backend::interface::{
    Backend, BackendError, HealthReport, HistoryEntry, PredictReply, Upload,
};
use crate::library::logger::interface::Logger;
use std::sync::{Arc, Mutex};

/// Scripted backend: every call answers with whatever was last configured
/// and records what it was asked.
pub struct BackendFake {
    logger: Arc<dyn Logger + Send + Sync>,
    health: Mutex<Result<HealthReport, BackendError>>,
    predict: Mutex<Result<PredictReply, BackendError>>,
    history: Mutex<Result<Vec<HistoryEntry>, BackendError>>,
    uploads: Mutex<Vec<(String, String, usize)>>,
    health_calls: Mutex<usize>,
}

impl BackendFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("backend").with_namespace("fake"),
            health: Mutex::new(Ok(HealthReport {
                status: Some("healthy".to_string()),
                model_loaded: true,
                database_connected: Some(true),
            })),
            predict: Mutex::new(Ok(PredictReply::Malformed)),
            history: Mutex::new(Ok(vec![])),
            uploads: Mutex::new(vec![]),
            health_calls: Mutex::new(0),
        }
    }

    pub fn set_health(&self, health: Result<HealthReport, BackendError>) {
        *self.health.lock().unwrap() = health;
    }

    pub fn set_predict(&self, predict: Result<PredictReply, BackendError>) {
        *self.predict.lock().unwrap() = predict;
    }

    pub fn set_history(&self, history: Result<Vec<HistoryEntry>, BackendError>) {
        *self.history.lock().unwrap() = history;
    }

    /// `(file name, mime type, byte count)` of every upload received.
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn health_calls(&self) -> usize {
        *self.health_calls.lock().unwrap()
    }
}

impl Backend for BackendFake {
    fn health(&self) -> Result<HealthReport, BackendError> {
        let _ = self.logger.info("BackendFake::health()");
        *self.health_calls.lock().unwrap() += 1;
        self.health.lock().unwrap().clone()
    }

    fn predict(&self, upload: Upload) -> Result<PredictReply, BackendError> {
        let _ = self
            .logger
            .info(&format!("BackendFake::predict({:?})", upload));
        self.uploads.lock().unwrap().push((
            upload.file_name,
            upload.mime_type,
            upload.bytes.len(),
        ));
        self.predict.lock().unwrap().clone()
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, BackendError> {
        let _ = self
            .logger
            .info(&format!("BackendFake::history({})", limit));
        self.history
            .lock()
            .unwrap()
            .clone()
            .map(|entries| entries.into_iter().take(limit).collect())
    }
}
