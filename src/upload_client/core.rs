use crate::backend::interface::{BackendError, HealthReport, HistoryEntry, PredictReply};
use crate::config::Config;
use crate::upload_client::intake::{self, FileCandidate, PreviewData, SelectedFile};
use std::path::PathBuf;

/// Last known liveness of the backend. Every probe replaces it whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BackendStatus {
    #[default]
    Checking,
    Offline {
        error: String,
    },
    Online(HealthReport),
}

impl BackendStatus {
    pub fn is_reachable(&self) -> bool {
        matches!(self, BackendStatus::Online(_))
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self, BackendStatus::Online(report) if report.model_loaded)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub text: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
    pub loading: bool,
    pub error: Option<String>,
    pub requested: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub selected_file: Option<SelectedFile>,
    pub preview: Option<PreviewData>,
    pub backend_status: BackendStatus,
    pub result: Option<PredictionResult>,
    pub loading: bool,
    pub notice: Option<String>,
    pub history: History,
}

#[derive(Debug)]
pub enum Msg {
    ProbeTick,
    RefreshRequested,
    HealthDone(Result<HealthReport, BackendError>),
    FileChosen(Result<FileCandidate, String>),
    FileCleared,
    PreviewDone {
        path: PathBuf,
        preview: Result<PreviewData, String>,
    },
    SubmitRequested,
    PredictDone(Result<PredictReply, BackendError>),
    NoticeDismissed,
    HistoryRequested,
    HistoryDone(Result<Vec<HistoryEntry>, BackendError>),
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::PreviewDone {
                path,
                preview: Ok(_),
            } => format!("PreviewDone({}, Ok(..))", path.display()),
            Msg::HistoryDone(Ok(entries)) => format!("HistoryDone(Ok({} entries))", entries.len()),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ProbeHealth,
    ReadPreview { file: SelectedFile },
    Predict { file: SelectedFile },
    FetchHistory,
}

pub const NO_FILE_NOTICE: &str = "Please select an image first.";
pub const MODEL_NOT_LOADED_NOTICE: &str =
    "Model is not loaded on the server. Please check server logs.";
pub const UNEXPECTED_FORMAT: &str = "Unexpected response format from server";

pub fn offline_notice(config: &Config) -> String {
    format!(
        "Backend server is not connected. Please ensure the backend is running at {}.",
        config.backend_url
    )
}

pub fn connection_guidance(config: &Config) -> String {
    format!(
        "⚠️ Cannot connect to server.\n\nPlease check:\n1. The backend server is running\n2. Server is on {}\n3. No firewall blocking the connection",
        config.backend_url
    )
}

pub const NETWORK_GUIDANCE: &str = "⚠️ Network error occurred.\n\nTry:\n1. Refreshing the server status\n2. Restarting the backend server\n3. Checking the client logs";

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![Effect::ProbeHealth])
}

/// Folds a finished upload into what the result panel shows.
pub fn prediction_result(
    config: &Config,
    outcome: Result<PredictReply, BackendError>,
) -> PredictionResult {
    let (text, confidence) = match outcome {
        Ok(PredictReply::Prediction { label, confidence }) => (label, confidence),
        Ok(PredictReply::Rejected { message }) => (format!("Error: {}", message), None),
        Ok(PredictReply::Malformed) => (UNEXPECTED_FORMAT.to_string(), None),
        Err(BackendError::Unreachable(_)) => (connection_guidance(config), None),
        Err(BackendError::Network(_)) => (NETWORK_GUIDANCE.to_string(), None),
        Err(err) => (format!("⚠️ {}", err), None),
    };
    PredictionResult { text, confidence }
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match msg {
        Msg::ProbeTick => (model, vec![Effect::ProbeHealth]),

        Msg::RefreshRequested => {
            if model.loading {
                (model, vec![])
            } else {
                (model, vec![Effect::ProbeHealth])
            }
        }

        Msg::HealthDone(outcome) => {
            let mut model = model;
            let mut effects = vec![];
            match outcome {
                Ok(report) => {
                    model.backend_status = BackendStatus::Online(report);
                    if !model.history.requested {
                        model.history.requested = true;
                        model.history.loading = true;
                        effects.push(Effect::FetchHistory);
                    }
                }
                Err(err) => {
                    model.backend_status = BackendStatus::Offline {
                        error: err.to_string(),
                    };
                }
            }
            (model, effects)
        }

        Msg::FileChosen(candidate) => {
            if model.loading {
                return (model, vec![]);
            }

            let mut model = Model {
                selected_file: None,
                preview: None,
                result: None,
                ..model
            };

            let candidate = match candidate {
                Ok(candidate) => candidate,
                Err(error) => {
                    model.notice = Some(format!("Could not open file: {}", error));
                    return (model, vec![]);
                }
            };

            match intake::validate(config, candidate) {
                Ok(file) => {
                    model.selected_file = Some(file.clone());
                    (model, vec![Effect::ReadPreview { file }])
                }
                Err(rejection) => {
                    model.notice = Some(rejection.notice());
                    (model, vec![])
                }
            }
        }

        Msg::FileCleared => {
            if model.loading {
                return (model, vec![]);
            }
            (
                Model {
                    selected_file: None,
                    preview: None,
                    result: None,
                    ..model
                },
                vec![],
            )
        }

        Msg::PreviewDone { path, preview } => {
            let still_selected = model
                .selected_file
                .as_ref()
                .is_some_and(|file| file.path == path);

            match preview {
                Ok(preview) if still_selected => (
                    Model {
                        preview: Some(preview),
                        ..model
                    },
                    vec![],
                ),
                _ => (model, vec![]),
            }
        }

        Msg::SubmitRequested => {
            if model.loading {
                return (model, vec![]);
            }

            let mut model = model;
            let file = match &model.selected_file {
                Some(file) => file.clone(),
                None => {
                    model.notice = Some(NO_FILE_NOTICE.to_string());
                    return (model, vec![]);
                }
            };

            if !model.backend_status.is_reachable() {
                model.notice = Some(offline_notice(config));
                return (model, vec![]);
            }

            if !model.backend_status.is_model_loaded() {
                model.notice = Some(MODEL_NOT_LOADED_NOTICE.to_string());
                return (model, vec![]);
            }

            model.loading = true;
            model.result = None;
            (model, vec![Effect::Predict { file }])
        }

        Msg::PredictDone(outcome) => {
            let succeeded = matches!(outcome, Ok(PredictReply::Prediction { .. }));
            let mut model = Model {
                loading: false,
                result: Some(prediction_result(config, outcome)),
                ..model
            };

            if succeeded && !model.history.loading {
                model.history.loading = true;
                model.history.requested = true;
                (model, vec![Effect::FetchHistory])
            } else {
                (model, vec![])
            }
        }

        Msg::NoticeDismissed => (
            Model {
                notice: None,
                ..model
            },
            vec![],
        ),

        Msg::HistoryRequested => {
            if model.history.loading {
                return (model, vec![]);
            }
            let mut model = model;
            model.history.loading = true;
            model.history.requested = true;
            (model, vec![Effect::FetchHistory])
        }

        Msg::HistoryDone(outcome) => {
            let mut model = model;
            model.history.loading = false;
            match outcome {
                Ok(entries) => {
                    model.history.entries = entries;
                    model.history.error = None;
                }
                Err(err) => {
                    model.history.error = Some(err.to_string());
                }
            }
            (model, vec![])
        }
    }
}
