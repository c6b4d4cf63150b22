use std::path::PathBuf;

use eframe::egui;

use paser_dashboards::data::export::save_png;
use paser_dashboards::state::AppState;

use crate::ui::pages::{self, Action};
use crate::ui::panels::{self, TopBarAction};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PaserApp {
    pub state: AppState,
    /// Target of a requested screenshot, until the frame arrives.
    screenshot_path: Option<PathBuf>,
}

impl PaserApp {
    fn apply(&mut self, action: Action) {
        let result = match action {
            Action::Export(export) => {
                let Some(path) = rfd::FileDialog::new()
                    .set_file_name(export.file_name())
                    .add_filter(export.extension(), &[export.extension()])
                    .save_file()
                else {
                    return;
                };
                self.state.export(export, &path).map(|()| format!("Saved {}", path.display()))
            }
            Action::SaveDiff => {
                let Some(dir) = rfd::FileDialog::new().set_title("Save Diff files").pick_folder() else {
                    return;
                };
                self.state
                    .save_diff(&dir)
                    .map(|n| format!("Saved {n} files to {}", dir.display()))
            }
        };
        self.report(result);
    }

    fn report(&mut self, result: anyhow::Result<String>) {
        match result {
            Ok(msg) => {
                log::info!("{msg}");
                self.state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    fn request_screenshot(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("screenshot.png")
            .add_filter("PNG", &["png"])
            .save_file()
        {
            self.screenshot_path = Some(path);
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
        }
    }

    /// Save the screenshot once egui delivers it.
    fn receive_screenshot(&mut self, ctx: &egui::Context) {
        let image = ctx.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let (Some(image), Some(path)) = (image, self.screenshot_path.take()) else {
            return;
        };
        let [w, h] = image.size;
        let result = save_png(&path, w as u32, h as u32, image.as_raw().to_vec())
            .map(|()| format!("Saved screenshot to {}", path.display()));
        self.report(result);
    }
}

impl eframe::App for PaserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_screenshot(ctx);

        // ---- Top panel: menu bar ----
        let top = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state))
            .inner;
        if top == Some(TopBarAction::Screenshot) {
            self.request_screenshot(ctx);
        }

        // ---- Left side panel: batch and options ----
        egui::SidePanel::left("batch_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| pages::central_panel(ui, &self.state))
            .inner;
        if let Some(action) = action {
            self.apply(action);
        }
    }
}
