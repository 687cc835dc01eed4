//! Pure mapping from the current `Model` to what the window shows. Nothing
//! here knows how the model was produced.

use crate::upload_client::core::{BackendStatus, Model};
use crate::upload_client::intake::SelectedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Checking,
    Offline,
    Ready,
    ModelNotLoaded,
}

impl StatusBadge {
    pub fn label(&self) -> &'static str {
        match self {
            StatusBadge::Checking => "Checking...",
            StatusBadge::Offline => "Server Offline",
            StatusBadge::Ready => "✓ Ready",
            StatusBadge::ModelNotLoaded => "Model Not Loaded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStyle {
    Success,
    Danger,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub style: ResultStyle,
    pub title: &'static str,
    pub detail: String,
}

pub fn status_badge(status: &BackendStatus) -> StatusBadge {
    match status {
        BackendStatus::Checking => StatusBadge::Checking,
        BackendStatus::Offline { .. } => StatusBadge::Offline,
        BackendStatus::Online(report) if report.model_loaded => StatusBadge::Ready,
        BackendStatus::Online(_) => StatusBadge::ModelNotLoaded,
    }
}

/// Chosen from the wording of the result text. "No Cancer" must be checked
/// before "Cancer Detected" since the healthy label contains both.
pub fn result_style(text: &str) -> ResultStyle {
    if text.contains("No Cancer") {
        ResultStyle::Success
    } else if text.contains("Cancer Detected") {
        ResultStyle::Danger
    } else if text.contains("Error") || text.contains("⚠️") {
        ResultStyle::Warning
    } else {
        ResultStyle::Info
    }
}

pub fn confidence_band(confidence: f64) -> ConfidenceBand {
    if confidence > 80.0 {
        ConfidenceBand::Success
    } else if confidence > 60.0 {
        ConfidenceBand::Warning
    } else {
        ConfidenceBand::Info
    }
}

pub fn can_submit(model: &Model) -> bool {
    !model.loading
        && model.selected_file.is_some()
        && model.backend_status.is_reachable()
        && model.backend_status.is_model_loaded()
}

pub fn status_banner(status: &BackendStatus, backend_url: &str) -> Option<Banner> {
    match status {
        BackendStatus::Offline { error } => Some(Banner {
            style: ResultStyle::Danger,
            title: "⚠️ Backend Server Not Connected",
            detail: format!(
                "Please ensure the backend server is running at {} ({})",
                backend_url, error
            ),
        }),
        BackendStatus::Online(report) if !report.model_loaded => Some(Banner {
            style: ResultStyle::Warning,
            title: "⚠️ Model Not Loaded",
            detail: "Check that the model file exists on the server.".to_string(),
        }),
        _ => None,
    }
}

pub fn file_summary(file: &SelectedFile) -> String {
    format!("{} — {:.2} KB", file.name, file.size as f64 / 1024.0)
}

pub fn confidence_label(confidence: f64) -> String {
    format!("{}%", confidence)
}
