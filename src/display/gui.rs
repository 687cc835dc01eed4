use crate::upload_client::core::{BackendStatus, Model, Msg};
use crate::upload_client::intake;
use crate::upload_client::main::UploadClient;
use crate::upload_client::present::{
    can_submit, confidence_band, confidence_label, file_summary, result_style, status_badge,
    status_banner, ConfidenceBand, ResultStyle, StatusBadge,
};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const SUCCESS: egui::Color32 = egui::Color32::from_rgb(25, 135, 84);
const DANGER: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);
const WARNING: egui::Color32 = egui::Color32::from_rgb(255, 193, 7);
const INFO: egui::Color32 = egui::Color32::from_rgb(13, 202, 240);
const SECONDARY: egui::Color32 = egui::Color32::from_rgb(108, 117, 125);

const DISCLAIMER: &str = "⚕️ Medical Disclaimer: This tool is for research and educational purposes only. \
Always consult qualified healthcare professionals for medical diagnosis and treatment.";

fn style_color(style: ResultStyle) -> egui::Color32 {
    match style {
        ResultStyle::Success => SUCCESS,
        ResultStyle::Danger => DANGER,
        ResultStyle::Warning => WARNING,
        ResultStyle::Info => INFO,
    }
}

fn badge_color(badge: StatusBadge) -> egui::Color32 {
    match badge {
        StatusBadge::Checking => SECONDARY,
        StatusBadge::Offline => DANGER,
        StatusBadge::Ready => SUCCESS,
        StatusBadge::ModelNotLoaded => WARNING,
    }
}

fn band_color(band: ConfidenceBand) -> egui::Color32 {
    match band {
        ConfidenceBand::Success => SUCCESS,
        ConfidenceBand::Warning => WARNING,
        ConfidenceBand::Info => INFO,
    }
}

fn panel(ui: &mut egui::Ui, color: egui::Color32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(color.linear_multiply(0.12))
        .stroke(egui::Stroke::new(1.0, color))
        .rounding(4.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

/// Decoded preview bytes, keyed by the egui image uri so a new file gets a
/// fresh texture.
struct PreviewCache {
    uri: String,
    bytes: Option<Arc<[u8]>>,
}

pub struct UploadWindow {
    client: UploadClient,
    path_input: String,
    preview_cache: Option<PreviewCache>,
}

impl UploadWindow {
    pub fn new(client: UploadClient) -> Self {
        Self {
            client,
            path_input: String::new(),
            preview_cache: None,
        }
    }

    fn refresh_preview_cache(&mut self) {
        let model = self.client.model();
        let (file, preview) = match (&model.selected_file, &model.preview) {
            (Some(file), Some(preview)) => (file, preview),
            _ => {
                self.preview_cache = None;
                return;
            }
        };

        let uri = format!("bytes://preview/{}/{}", file.path.display(), file.size);
        if self
            .preview_cache
            .as_ref()
            .is_some_and(|cache| cache.uri == uri)
        {
            return;
        }

        self.preview_cache = Some(PreviewCache {
            uri,
            bytes: preview.decode().ok().map(Arc::from),
        });
    }
}

fn choose(path: PathBuf) -> Msg {
    Msg::FileChosen(intake::inspect(&path).map_err(|err| format!("{}: {}", path.display(), err)))
}

fn header(ui: &mut egui::Ui, model: &Model, outbox: &mut Vec<Msg>) {
    ui.horizontal(|ui| {
        ui.heading(egui::RichText::new("🩺 Oral Cancer Detection").color(egui::Color32::from_rgb(13, 110, 253)));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let refresh = ui
                .add_enabled(!model.loading, egui::Button::new("🔄"))
                .on_hover_text("Refresh server status");
            if refresh.clicked() {
                outbox.push(Msg::RefreshRequested);
            }

            let badge = status_badge(&model.backend_status);
            let detail = match &model.backend_status {
                BackendStatus::Online(report) => format!(
                    "status: {}, database connected: {}",
                    report.status.as_deref().unwrap_or("unknown"),
                    report
                        .database_connected
                        .map(|connected| connected.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                ),
                BackendStatus::Offline { error } => error.clone(),
                BackendStatus::Checking => "waiting for the first probe".to_string(),
            };
            ui.label(
                egui::RichText::new(badge.label())
                    .strong()
                    .color(badge_color(badge)),
            )
            .on_hover_text(detail);
        });
    });
}

fn file_input(ui: &mut egui::Ui, model: &Model, path_input: &mut String, outbox: &mut Vec<Msg>) {
    ui.label(egui::RichText::new("Upload Medical Image").strong());
    ui.add_enabled_ui(!model.loading, |ui| {
        ui.horizontal(|ui| {
            let width = ui.available_width() - 140.0;
            let response = ui.add(
                egui::TextEdit::singleline(path_input)
                    .hint_text("Path to an image, or drop a file on the window")
                    .desired_width(width),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if (ui.button("Select").clicked() || submitted) && !path_input.trim().is_empty() {
                outbox.push(choose(PathBuf::from(path_input.trim())));
            }
            if ui.button("Clear").clicked() {
                path_input.clear();
                outbox.push(Msg::FileCleared);
            }
        });
    });
    ui.small(
        egui::RichText::new("Supported: PNG, JPG, JPEG, GIF, BMP, WEBP (Max: 10MB)").color(SECONDARY),
    );
}

fn result_panel(ui: &mut egui::Ui, model: &Model) {
    let Some(result) = &model.result else {
        return;
    };
    if result.text.is_empty() {
        return;
    }

    panel(ui, style_color(result_style(&result.text)), |ui| {
        ui.label(egui::RichText::new("📊 Analysis Result").strong().size(16.0));
        ui.add_space(6.0);
        ui.label(egui::RichText::new(&result.text).size(15.0));

        if let Some(confidence) = result.confidence {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.strong("Confidence Level:");
                ui.label(confidence_label(confidence));
            });
            ui.add(
                egui::ProgressBar::new((confidence / 100.0).clamp(0.0, 1.0) as f32)
                    .text(confidence_label(confidence))
                    .fill(band_color(confidence_band(confidence))),
            );
        }
    });
}

fn history_panel(ui: &mut egui::Ui, model: &Model, outbox: &mut Vec<Msg>) {
    egui::CollapsingHeader::new("Recent analyses").show(ui, |ui| {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!model.history.loading, egui::Button::new("Reload"))
                .clicked()
            {
                outbox.push(Msg::HistoryRequested);
            }
            if model.history.loading {
                ui.spinner();
            }
        });

        if let Some(error) = &model.history.error {
            ui.colored_label(DANGER, format!("History unavailable: {}", error));
        }
        if model.history.entries.is_empty() && model.history.error.is_none() {
            ui.label("No analyses yet.");
        }

        egui::Grid::new("history").striped(true).show(ui, |ui| {
            for entry in &model.history.entries {
                ui.label(entry.filename.as_deref().unwrap_or("-"));
                let prediction = entry.prediction.as_deref().unwrap_or("-");
                ui.colored_label(style_color(result_style(prediction)), prediction);
                ui.label(entry.confidence.map(confidence_label).unwrap_or_default());
                ui.label(entry.timestamp.as_deref().unwrap_or(""));
                ui.end_row();
            }
        });
    });
}

fn debug_panel(ui: &mut egui::Ui, window_client: &UploadClient) {
    let model = window_client.model();
    let snapshot = serde_json::json!({
        "backend_url": window_client.config().backend_url,
        "backend_status": format!("{:?}", model.backend_status),
        "file_selected": model.selected_file.is_some(),
        "file_name": model.selected_file.as_ref().map(|file| file.name.clone()),
        "preview_bytes": model.preview.as_ref().map(|preview| preview.data_url().len()),
    });

    egui::CollapsingHeader::new("Debug Info").show(ui, |ui| {
        let text = serde_json::to_string_pretty(&snapshot).unwrap_or_default();
        ui.label(egui::RichText::new(text).monospace().small());
    });
}

impl eframe::App for UploadWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.client.process_pending();
        self.refresh_preview_cache();

        let mut outbox: Vec<Msg> = vec![];

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            if !self.client.model().loading {
                self.path_input = path.display().to_string();
                outbox.push(choose(path));
            }
        }

        let Self {
            client,
            path_input,
            preview_cache,
        } = self;
        let model = client.model();
        let config = client.config();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                header(ui, model, &mut outbox);
                ui.separator();

                if let Some(banner) = status_banner(&model.backend_status, &config.backend_url) {
                    panel(ui, style_color(banner.style), |ui| {
                        ui.strong(banner.title);
                        ui.label(&banner.detail);
                    });
                    ui.add_space(8.0);
                }

                file_input(ui, model, path_input, &mut outbox);

                if let Some(file) = &model.selected_file {
                    ui.add_space(6.0);
                    panel(ui, INFO, |ui| {
                        ui.label(format!("📄 {}", file_summary(file)));
                    });
                }

                if let Some(cache) = preview_cache.as_ref() {
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| match &cache.bytes {
                        Some(bytes) => {
                            ui.add(
                                egui::Image::from_bytes(cache.uri.clone(), bytes.clone())
                                    .max_size(egui::vec2(400.0, 400.0))
                                    .rounding(4.0),
                            );
                        }
                        None => {
                            ui.label("Preview unavailable");
                        }
                    });
                }

                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    let label = if model.loading {
                        "Analyzing Image..."
                    } else {
                        "🔍 Analyze Image"
                    };
                    ui.horizontal(|ui| {
                        let button = egui::Button::new(egui::RichText::new(label).size(18.0))
                            .min_size(egui::vec2(220.0, 36.0));
                        if ui.add_enabled(can_submit(model), button).clicked() {
                            outbox.push(Msg::SubmitRequested);
                        }
                        if model.loading {
                            ui.spinner();
                        }
                    });
                });
                ui.add_space(10.0);

                result_panel(ui, model);

                ui.add_space(10.0);
                history_panel(ui, model, &mut outbox);

                ui.separator();
                ui.small(egui::RichText::new(DISCLAIMER).color(SECONDARY));

                if config.debug_panel {
                    debug_panel(ui, client);
                }
            });
        });

        if let Some(notice) = &model.notice {
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(notice);
                    if ui.button("OK").clicked() {
                        outbox.push(Msg::NoticeDismissed);
                    }
                });
        }

        for msg in outbox {
            client.dispatch(msg);
        }

        // Effects report back on the channel; keep polling it.
        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.client.stop();
    }
}

pub fn run(client: UploadClient) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 860.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let window = UploadWindow::new(client);

    eframe::run_native(
        "Oral Cancer Detection",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Box::new(window)
        }),
    )
    .map_err(|err| err.to_string())?;

    Ok(())
}
