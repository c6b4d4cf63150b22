use eframe::egui::{self, RichText, ScrollArea, Ui};

use paser_dashboards::analysis::overlap::VennReport;
use paser_dashboards::analysis::stats::{ExperimentStats, Metric};
use paser_dashboards::analysis::summary::{ExperimentSummary, KeyStats};
use paser_dashboards::state::{AppState, DiffOutput, Export, Page, PageResults};

use super::plot::{bars_with_errors, stacked_bars, Series};
use super::table::{data_table, fmt2};
use super::venn::venn_diagram;

/// What the user asked for on a page, applied once the page is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Export(Export),
    SaveDiff,
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the active dashboard.
pub fn central_panel(ui: &mut Ui, state: &AppState) -> Option<Action> {
    let Some(results) = state.results.as_ref().filter(|r| r.page() == state.page) else {
        ui.heading(state.page.title());
        ui.label(state.page.help());
        ui.add_space(8.0);
        ui.label(RichText::new("Open DTASelect-filter files (File → Open…), then press Run.").italics());
        return None;
    };

    let mut action = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            action = match results {
                PageResults::Venn {
                    report,
                    peptides,
                    proteins,
                } => venn_page(ui, report, peptides.len(), proteins.len()),
                PageResults::Plot(summaries) => plot_page(ui, summaries),
                PageResults::Stats(stats) => stats_page(ui, stats),
                PageResults::Diff(outputs) => diff_page(ui, outputs, state.settings.group_by_peptide),
            };
        });
    action
}

fn export_buttons(ui: &mut Ui, exports: &[Export]) -> Option<Action> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.label("Export:");
        for export in exports {
            if ui.button(export.button_text()).clicked() {
                action = Some(Action::Export(*export));
            }
        }
    });
    action
}

// ---------------------------------------------------------------------------
// Venn
// ---------------------------------------------------------------------------

fn venn_page(ui: &mut Ui, report: &VennReport, peptide_rows: usize, protein_rows: usize) -> Option<Action> {
    ui.heading("Venn");

    ui.columns(2, |cols| {
        venn_diagram(&mut cols[0], "Proteins", &report.labels, &report.protein_regions);
        venn_diagram(&mut cols[1], "Peptides", &report.labels, &report.peptide_regions);
    });

    ui.columns(2, |cols| {
        let protein_counts: Vec<f64> = report.protein_counts().iter().map(|&c| c as f64).collect();
        let peptide_counts: Vec<f64> = report.peptide_counts().iter().map(|&c| c as f64).collect();
        bars_with_errors(&mut cols[0], "venn_protein_counts", "Protein Counts", &report.labels, &protein_counts, None, "Proteins");
        bars_with_errors(&mut cols[1], "venn_peptide_counts", "Peptide Counts", &report.labels, &peptide_counts, None, "Peptides");
    });

    ui.separator();
    ui.strong("Experiments");
    let rows: Vec<Vec<String>> = report
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            vec![
                label.clone(),
                report.file_names[i].clone(),
                report.protein_counts()[i].to_string(),
                report.peptide_counts()[i].to_string(),
                fmt2(report.average_coverage[i]),
                fmt2(report.average_intensity[i]),
            ]
        })
        .collect();
    data_table(
        ui,
        "venn_experiments",
        &["Label", "File", "Proteins", "Peptides", "Avg Coverage %", "Avg Intensity"],
        &rows,
    );

    ui.separator();
    egui::Grid::new("venn_metrics").striped(true).show(ui, |ui| {
        ui.strong("");
        ui.strong("Shared");
        ui.strong("Unique");
        ui.end_row();
        ui.label("Proteins");
        ui.label(report.proteins.shared.len().to_string());
        ui.label(report.proteins.unique.len().to_string());
        ui.end_row();
        ui.label("Peptides");
        ui.label(report.peptides.shared.len().to_string());
        ui.label(report.peptides.unique.len().to_string());
        ui.end_row();
    });

    ui.separator();
    ui.label(format!("Combined tables: {peptide_rows} peptide rows, {protein_rows} protein rows"));
    export_buttons(
        ui,
        &[
            Export::PeptidesCsv,
            Export::ProteinsCsv,
            Export::PeptidesParquet,
            Export::ProteinsParquet,
        ],
    )
}

// ---------------------------------------------------------------------------
// Plot (sequential summary)
// ---------------------------------------------------------------------------

fn plot_page(ui: &mut Ui, summaries: &[ExperimentSummary]) -> Option<Action> {
    ui.heading("Plot");
    let labels: Vec<String> = summaries.iter().map(|s| s.name.clone()).collect();

    let headers = [
        "Name", "Order", "Unique Pep", "Dup Pep", "Total Pep", "New Unique Pep", "New Pep",
        "Seen Unique Pep", "Seen Pep", "Unique Prot", "Dup Prot", "Total Prot", "New Prot",
        "New Unique Prot", "Seen Prot", "Seen Unique Prot",
    ];
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            let (p, q) = (&s.peptides, &s.proteins);
            vec![
                s.name.clone(),
                s.order.to_string(),
                p.unique.to_string(),
                p.duplicate.to_string(),
                p.total.to_string(),
                p.new_unique.to_string(),
                p.new.to_string(),
                p.seen_unique.to_string(),
                p.seen.to_string(),
                q.unique.to_string(),
                q.duplicate.to_string(),
                q.total.to_string(),
                q.new.to_string(),
                q.new_unique.to_string(),
                q.seen.to_string(),
                q.seen_unique.to_string(),
            ]
        })
        .collect();
    data_table(ui, "summary_table", &headers, &rows);
    ui.separator();

    let peptides = |f: fn(&KeyStats) -> f64| summaries.iter().map(|s| f(&s.peptides)).collect::<Vec<_>>();
    let proteins = |f: fn(&KeyStats) -> f64| summaries.iter().map(|s| f(&s.proteins)).collect::<Vec<_>>();

    ui.columns(2, |cols| {
        stacked_bars(
            &mut cols[0],
            "unique_peptides",
            "Unique vs Duplicate Peptides",
            &labels,
            Series { name: "unique", values: peptides(|k| k.unique as f64) },
            Series { name: "duplicate", values: peptides(|k| k.duplicate as f64) },
            "#",
        );
        stacked_bars(
            &mut cols[1],
            "unique_peptides_perc",
            "Unique vs Duplicate Peptides (%)",
            &labels,
            Series { name: "unique", values: peptides(KeyStats::unique_perc) },
            Series { name: "duplicate", values: peptides(KeyStats::duplicate_perc) },
            "%",
        );
    });
    ui.columns(2, |cols| {
        stacked_bars(
            &mut cols[0],
            "new_peptides",
            "New vs Seen Peptides",
            &labels,
            Series { name: "new", values: peptides(|k| k.new as f64) },
            Series { name: "seen", values: peptides(|k| k.seen as f64) },
            "#",
        );
        stacked_bars(
            &mut cols[1],
            "new_peptides_perc",
            "New vs Seen Peptides (%)",
            &labels,
            Series { name: "new", values: peptides(KeyStats::new_perc) },
            Series { name: "seen", values: peptides(KeyStats::seen_perc) },
            "%",
        );
    });
    ui.columns(2, |cols| {
        stacked_bars(
            &mut cols[0],
            "new_proteins",
            "New vs Seen Proteins",
            &labels,
            Series { name: "new", values: proteins(|k| k.new as f64) },
            Series { name: "seen", values: proteins(|k| k.seen as f64) },
            "#",
        );
        stacked_bars(
            &mut cols[1],
            "new_proteins_perc",
            "New vs Seen Proteins (%)",
            &labels,
            Series { name: "new", values: proteins(KeyStats::new_perc) },
            Series { name: "seen", values: proteins(KeyStats::seen_perc) },
            "%",
        );
    });

    ui.separator();
    export_buttons(ui, &[Export::SummaryCsv, Export::SummaryJson])
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

fn stats_page(ui: &mut Ui, stats: &[ExperimentStats]) -> Option<Action> {
    ui.heading("Stats");
    let labels: Vec<String> = stats.iter().map(|s| s.name.clone()).collect();

    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|s| {
            let mut row = vec![s.name.clone(), s.proteins.to_string(), s.peptides.to_string()];
            row.extend(Metric::ALL.iter().map(|m| match s.value(*m) {
                (mean, Some(sem)) => format!("{mean:.2} ± {sem:.2}"),
                (mean, None) => fmt2(mean),
            }));
            row
        })
        .collect();
    let mut headers = vec!["Name", "Protein Groups", "Peptides"];
    headers.extend(Metric::ALL.iter().map(|m| m.axis_label()));
    data_table(ui, "stats_table", &headers, &rows);
    ui.separator();

    for pair in Metric::ALL.chunks(2) {
        ui.columns(2, |cols| {
            for (col, metric) in cols.iter_mut().zip(pair) {
                let values: Vec<f64> = stats.iter().map(|s| s.value(*metric).0).collect();
                let errors: Vec<f64> = stats.iter().map(|s| s.value(*metric).1.unwrap_or(0.0)).collect();
                bars_with_errors(
                    col,
                    metric.title(),
                    metric.title(),
                    &labels,
                    &values,
                    Some(&errors),
                    metric.axis_label(),
                );
            }
        });
    }

    ui.separator();
    export_buttons(ui, &[Export::StatsCsv])
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

fn diff_page(ui: &mut Ui, outputs: &[DiffOutput], by_peptide: bool) -> Option<Action> {
    ui.heading("Diff");
    ui.label(if by_peptide {
        "Compared by peptide key."
    } else {
        "Compared by protein key."
    });

    let rows: Vec<Vec<String>> = outputs
        .iter()
        .map(|o| {
            let (d, i) = (&o.subsets.difference, &o.subsets.intersection);
            vec![
                o.label.clone(),
                d.group_count().to_string(),
                d.protein_count().to_string(),
                d.peptide_count().to_string(),
                i.group_count().to_string(),
                i.protein_count().to_string(),
                i.peptide_count().to_string(),
            ]
        })
        .collect();
    data_table(
        ui,
        "diff_table",
        &[
            "Label",
            "Diff Groups",
            "Diff Proteins",
            "Diff Peptides",
            "Inter Groups",
            "Inter Proteins",
            "Inter Peptides",
        ],
        &rows,
    );

    ui.separator();
    let mut action = None;
    if ui
        .button("Save files to folder…")
        .on_hover_text("Writes <label>_diff.txt/.csv and <label>_inter.txt/.csv per experiment")
        .clicked()
    {
        action = Some(Action::SaveDiff);
    }
    action
}

/// Page tabs; returns the page the user switched to.
pub fn page_selector(ui: &mut Ui, current: Page) -> Option<Page> {
    let mut selected = None;
    for page in Page::ALL {
        if ui.selectable_label(current == page, page.title()).clicked() {
            selected = Some(page);
        }
    }
    selected
}
