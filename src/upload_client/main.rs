use crate::backend::interface::Backend;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::upload_client::core::{init, transition, Effect, Model, Msg};
use crate::upload_client::run_effect::RunEffect;
use crate::upload_client::schedule::ProbeSchedule;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Owns the model, the message queue and the probe schedule. Dropping it
/// stops the schedule; effects still in flight finish and find the queue
/// closed.
pub struct UploadClient {
    model: Model,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    event_sender: Sender<Msg>,
    event_receiver: Receiver<Msg>,
    run_effect: RunEffect,
    schedule: Option<ProbeSchedule>,
    pending_effects: Vec<Effect>,
}

impl UploadClient {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        backend: Arc<dyn Backend + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let logger = logger.with_namespace("upload");
        let run_effect = RunEffect::new(
            config.clone(),
            logger.clone(),
            backend,
            event_sender.clone(),
        );
        let (model, pending_effects) = init();

        Self {
            model,
            config,
            logger,
            event_sender,
            event_receiver,
            run_effect,
            schedule: None,
            pending_effects,
        }
    }

    /// Fires the initial probe and starts the periodic one.
    pub fn start(&mut self) {
        if self.schedule.is_some() {
            return;
        }
        let _ = self.logger.info(&format!(
            "Starting, backend at {} probed every {:?}",
            self.config.backend_url, self.config.probe_interval
        ));

        let initial = std::mem::take(&mut self.pending_effects);
        self.spawn_effects(initial);

        self.schedule = Some(ProbeSchedule::start(
            self.config.probe_interval,
            self.event_sender.clone(),
            self.logger.clone(),
        ));
    }

    pub fn stop(&mut self) {
        if let Some(mut schedule) = self.schedule.take() {
            schedule.stop();
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let _ = self
            .logger
            .info(&format!("msg: {}", msg.to_display_string()));

        let model = std::mem::take(&mut self.model);
        let (new_model, effects) = transition(&self.config, model, msg);
        self.model = new_model;

        if !effects.is_empty() {
            let _ = self.logger.info(&format!("effects: {:?}", effects));
        }
        self.spawn_effects(effects);
    }

    /// Applies every message that has arrived since the last call.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.event_receiver.try_recv() {
            self.dispatch(msg);
            processed += 1;
        }
        processed
    }

    #[cfg(test)]
    pub fn process_next(&mut self, timeout: std::time::Duration) -> bool {
        match self.event_receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
                true
            }
            Err(_) => false,
        }
    }

    #[cfg(test)]
    pub fn is_scheduled(&self) -> bool {
        self.schedule
            .as_ref()
            .is_some_and(|schedule| schedule.is_running())
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }
}
