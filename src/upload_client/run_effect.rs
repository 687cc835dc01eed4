use crate::backend::interface::{Backend, BackendError, Upload};
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::upload_client::core::{Effect, Msg};
use crate::upload_client::intake;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    backend: Arc<dyn Backend + Send + Sync>,
    event_sender: Sender<Msg>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        backend: Arc<dyn Backend + Send + Sync>,
        event_sender: Sender<Msg>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            backend,
            event_sender,
        }
    }

    /// Runs one effect to completion on the current thread and posts exactly
    /// one message back.
    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        let msg = match effect {
            Effect::ProbeHealth => {
                let health = self.backend.health();
                match &health {
                    Ok(report) => {
                        let _ = self.logger.info(&format!("Server status: {:?}", report));
                    }
                    Err(err) => {
                        let _ = self.logger.warn(&format!("Server not reachable: {}", err));
                    }
                }
                Msg::HealthDone(health)
            }
            Effect::ReadPreview { file } => {
                let preview = intake::read_preview(&file).map_err(|err| err.to_string());
                if let Err(err) = &preview {
                    let _ = self
                        .logger
                        .warn(&format!("Preview of {} failed: {}", file.name, err));
                }
                Msg::PreviewDone {
                    path: file.path,
                    preview,
                }
            }
            Effect::Predict { file } => {
                let outcome = std::fs::read(&file.path)
                    .map_err(BackendError::from)
                    .and_then(|bytes| {
                        self.backend.predict(Upload {
                            file_name: file.name.clone(),
                            mime_type: file.mime_type.clone(),
                            bytes,
                        })
                    });
                match &outcome {
                    Ok(reply) => {
                        let _ = self.logger.info(&format!("Response data: {:?}", reply));
                    }
                    Err(err) => {
                        let _ = self.logger.error(&format!(
                            "Upload error (status {:?}): {}",
                            err.status_code(),
                            err
                        ));
                    }
                }
                Msg::PredictDone(outcome)
            }
            Effect::FetchHistory => {
                let history = self.backend.history(self.config.history_limit);
                if let Err(err) = &history {
                    let _ = self.logger.warn(&format!("History unavailable: {}", err));
                }
                Msg::HistoryDone(history)
            }
        };

        if self.event_sender.send(msg).is_err() {
            let _ = self
                .logger
                .warn("Client is gone, dropping effect result");
        }
    }
}
