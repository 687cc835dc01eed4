use crate::library::logger::interface::Logger;
use crate::upload_client::core::Msg;
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Periodic liveness probe. Posts `Msg::ProbeTick` every `interval` until
/// stopped or dropped; the owner decides when it dies.
pub struct ProbeSchedule {
    stop_sender: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProbeSchedule {
    pub fn start(
        interval: Duration,
        event_sender: Sender<Msg>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        let (stop_sender, stop_receiver) = channel::<()>();
        let logger = logger.with_namespace("schedule");

        let handle = std::thread::spawn(move || loop {
            match stop_receiver.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if event_sender.send(Msg::ProbeTick).is_err() {
                        let _ = logger.info("Client gone, probe schedule exiting");
                        return;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    let _ = logger.info("Probe schedule stopped");
                    return;
                }
            }
        });

        Self {
            stop_sender: Some(stop_sender),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(stop_sender) = self.stop_sender.take() {
            let _ = stop_sender.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProbeSchedule {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    fn logger() -> Arc<dyn Logger + Send + Sync> {
        Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()))
    }

    #[test]
    fn test_ticks_until_stopped() {
        let (sender, receiver) = channel();
        let mut schedule = ProbeSchedule::start(Duration::from_millis(20), sender, logger());

        for _ in 0..3 {
            let msg = receiver.recv_timeout(Duration::from_secs(2)).unwrap();
            assert!(matches!(msg, Msg::ProbeTick));
        }
        assert!(schedule.is_running());

        schedule.stop();
        assert!(!schedule.is_running());

        // Drain anything sent before the stop landed, then expect silence.
        while receiver.try_recv().is_ok() {}
        assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_drop_stops_promptly() {
        let (sender, receiver) = channel();
        let schedule = ProbeSchedule::start(Duration::from_secs(3600), sender, logger());
        let started = std::time::Instant::now();
        drop(schedule);

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(
            receiver.recv_timeout(Duration::from_millis(50)),
            Err(RecvTimeoutError::Disconnected)
        ));
    }
}
