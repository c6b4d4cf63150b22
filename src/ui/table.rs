use eframe::egui::{Id, Ui};
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable, striped table of pre-formatted cells.
pub fn data_table(ui: &mut Ui, id: impl Into<Id>, headers: &[&str], rows: &[Vec<String>]) {
    ui.push_id(id.into(), |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(260.0)
            .columns(Column::auto().at_least(60.0), headers.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let cells = &rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

/// Format a float with two decimals for table cells.
pub fn fmt2(v: f64) -> String {
    format!("{v:.2}")
}
