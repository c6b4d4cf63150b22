use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, TextEdit, Ui};

use paser_dashboards::color::experiment_color;
use paser_dashboards::config::{CHARGE_HELP, GROUP_HELP, MODIFICATION_HELP};
use paser_dashboards::state::{AppState, Page};

use super::pages::page_selector;

/// Requests from the top bar that need the frame or a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    Screenshot,
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<TopBarAction> {
    let mut action = None;
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Clear").clicked() {
                state.clear();
                ui.close_menu();
            }
            if ui.button("Save screenshot…").clicked() {
                action = Some(TopBarAction::Screenshot);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(page) = page_selector(ui, state.page) {
            state.set_page(page);
        }

        ui.separator();

        ui.label(format!("{} files loaded", state.experiments.len()));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
    action
}

// ---------------------------------------------------------------------------
// Left side panel – batch and identity options
// ---------------------------------------------------------------------------

/// Render the left panel: uploaded files with their order and label, the
/// identity options and the Run button.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Experiments");
    ui.separator();

    if state.experiments.is_empty() {
        ui.label("No files loaded.");
    }

    let n = state.experiments.len();
    let mut remove = None;
    let mut edited = false;
    ScrollArea::vertical()
        .max_height(ui.available_height() * 0.6)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for (i, ex) in state.experiments.iter_mut().enumerate() {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(experiment_color(i, n)));
                    ui.label(&ex.file_name).on_hover_text(format!(
                        "{}\nversion {}, {} groups, {} peptides",
                        ex.path.display(),
                        ex.data.version(),
                        ex.data.group_count(),
                        ex.data.peptide_count()
                    ));
                    if ui.small_button("✕").on_hover_text("Remove").clicked() {
                        remove = Some(i);
                    }
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("Order");
                    edited |= ui.add(DragValue::new(&mut ex.order)).changed();
                    ui.label("Label");
                    edited |= ui
                        .add(TextEdit::singleline(&mut ex.label).desired_width(90.0))
                        .changed();
                });
                ui.add_space(4.0);
            }
        });

    if let Some(i) = remove {
        state.remove(i);
    }
    if edited {
        state.invalidate();
    }

    ui.separator();
    ui.strong("Identity");
    let identity = &mut state.settings.identity;
    let mut changed = false;
    changed |= ui
        .checkbox(&mut identity.use_charge, "Use charge")
        .on_hover_text(CHARGE_HELP)
        .changed();
    changed |= ui
        .checkbox(&mut identity.use_modifications, "Use modifications")
        .on_hover_text(MODIFICATION_HELP)
        .changed();
    // Proteins are always compared by locus on the Diff page.
    changed |= ui
        .add_enabled(
            state.page != Page::Diff,
            egui::Checkbox::new(&mut identity.use_groups, "Use protein groups"),
        )
        .on_hover_text(GROUP_HELP)
        .changed();
    if state.page == Page::Diff {
        changed |= ui
            .checkbox(&mut state.settings.group_by_peptide, "Group by peptide")
            .on_hover_text("Compare by peptide key; off compares by protein key")
            .changed();
    }
    if changed {
        state.invalidate();
    }

    ui.separator();
    ui.vertical_centered_justified(|ui: &mut Ui| {
        if ui.button(RichText::new("Run").strong()).clicked() {
            state.run();
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open DTASelect-filter files")
        .add_filter("DTASelect-filter", &["txt"])
        .pick_files();

    if let Some(paths) = files {
        state.add_files(paths);
    }
}
