use crate::backend::interface::{BackendError, HealthReport, HistoryEntry, PredictReply};
use crate::upload_client::core::{BackendStatus, Msg};
use crate::upload_client::intake;
use crate::upload_client::present::{can_submit, status_badge, StatusBadge};
use crate::upload_client::tests::fixture::Fixture;
use std::time::Duration;

#[test]
fn test_start_probes_and_fetches_history() {
    let mut f = Fixture::new("start");
    f.backend.set_history(Ok(vec![HistoryEntry {
        filename: Some("earlier.png".to_string()),
        prediction: Some("No Cancer Detected ✅".to_string()),
        confidence: Some(91.2),
        timestamp: Some("Thu, 15 Oct 2026 10:00:00 GMT".to_string()),
    }]));

    f.client.start();
    assert!(f.client.is_scheduled());

    f.settle(|model| model.history.requested && !model.history.loading);

    assert_eq!(status_badge(&f.client.model().backend_status), StatusBadge::Ready);
    assert_eq!(f.client.model().history.entries.len(), 1);
    assert_eq!(f.backend.health_calls(), 1);

    f.client.stop();
    assert!(!f.client.is_scheduled());
}

#[test]
fn test_probe_failure_goes_offline() {
    let mut f = Fixture::new("offline");
    f.backend
        .set_health(Err(BackendError::Unreachable("connection refused".to_string())));

    f.client.start();
    f.settle(|model| model.backend_status != BackendStatus::Checking);

    assert_eq!(status_badge(&f.client.model().backend_status), StatusBadge::Offline);

    // A manual refresh picks up a recovered backend.
    f.backend.set_health(Ok(HealthReport {
        status: Some("healthy".to_string()),
        model_loaded: true,
        database_connected: None,
    }));
    f.client.dispatch(Msg::RefreshRequested);
    f.settle(|model| model.backend_status.is_model_loaded());
}

#[test]
fn test_select_preview_and_predict() {
    let mut f = Fixture::new("predict");
    f.backend.set_predict(Ok(PredictReply::Prediction {
        label: "No Cancer Detected ✅".to_string(),
        confidence: Some(92.0),
    }));
    let path = f.write_file("mouth.png", &[0x89, b'P', b'N', b'G', 0, 1, 2, 3]);

    f.client.start();
    f.settle(|model| model.backend_status.is_model_loaded());

    f.client
        .dispatch(Msg::FileChosen(intake::inspect(&path).map_err(|e| e.to_string())));
    f.settle(|model| model.preview.is_some());

    let preview = f.client.model().preview.clone().unwrap();
    assert_eq!(preview.decode().unwrap(), vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3]);
    assert!(can_submit(f.client.model()));

    f.client.dispatch(Msg::SubmitRequested);
    assert!(f.client.model().loading);
    assert!(!can_submit(f.client.model()));

    f.settle(|model| !model.loading);

    let result = f.client.model().result.clone().unwrap();
    assert_eq!(result.text, "No Cancer Detected ✅");
    assert_eq!(result.confidence, Some(92.0));
    assert_eq!(
        f.backend.uploads(),
        vec![("mouth.png".to_string(), "image/png".to_string(), 8)]
    );
}

#[test]
fn test_submit_blocked_makes_no_request() {
    let mut f = Fixture::new("blocked");
    f.backend.set_health(Ok(HealthReport {
        status: Some("unhealthy".to_string()),
        model_loaded: false,
        database_connected: None,
    }));
    let path = f.write_file("mouth.jpg", &[0xFF, 0xD8]);

    f.client.start();
    f.settle(|model| model.backend_status.is_reachable());

    f.client
        .dispatch(Msg::FileChosen(intake::inspect(&path).map_err(|e| e.to_string())));
    f.settle(|model| model.preview.is_some());

    assert_eq!(
        status_badge(&f.client.model().backend_status),
        StatusBadge::ModelNotLoaded
    );
    assert!(!can_submit(f.client.model()));

    f.client.dispatch(Msg::SubmitRequested);
    assert!(!f.client.model().loading);
    assert!(f.client.model().notice.is_some());

    f.client.process_next(Duration::from_millis(200));
    assert!(f.backend.uploads().is_empty());
    assert_eq!(f.client.model().result, None);
}

#[test]
fn test_file_removed_before_upload() {
    let mut f = Fixture::new("removed");
    let path = f.write_file("gone.webp", &[1, 2, 3]);

    f.client.start();
    f.settle(|model| model.backend_status.is_model_loaded());

    f.client
        .dispatch(Msg::FileChosen(intake::inspect(&path).map_err(|e| e.to_string())));
    f.settle(|model| model.preview.is_some());
    std::fs::remove_file(&path).unwrap();

    f.client.dispatch(Msg::SubmitRequested);
    f.settle(|model| !model.loading);

    let result = f.client.model().result.clone().unwrap();
    assert!(result.text.starts_with("⚠️ "));
    assert_eq!(result.confidence, None);
    assert!(f.backend.uploads().is_empty());
}

#[test]
fn test_transport_failure_clears_loading() {
    let mut f = Fixture::new("transport");
    f.backend.set_predict(Err(BackendError::Unreachable(
        "error sending request".to_string(),
    )));
    let path = f.write_file("mouth.bmp", &[b'B', b'M']);

    f.client.start();
    f.settle(|model| model.backend_status.is_model_loaded());
    f.client
        .dispatch(Msg::FileChosen(intake::inspect(&path).map_err(|e| e.to_string())));
    f.client.dispatch(Msg::SubmitRequested);
    f.settle(|model| model.result.is_some());

    let model = f.client.model();
    assert!(!model.loading);
    assert!(model
        .result
        .as_ref()
        .unwrap()
        .text
        .contains("Cannot connect to server"));
    assert_eq!(f.config.backend_url, "http://localhost:5000");
}

#[test]
fn test_process_pending_drains_queue() {
    let mut f = Fixture::new("pending");
    f.client.start();

    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while f.client.model().backend_status == BackendStatus::Checking {
        assert!(std::time::Instant::now() < deadline);
        f.client.process_pending();
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(f.client.model().backend_status.is_reachable());
}
