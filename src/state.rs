use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Result};

use crate::analysis::overlap::VennReport;
use crate::analysis::stats::{stats_table, ExperimentStats};
use crate::analysis::summary::{summary_table, ExperimentSummary, SummaryRow};
use crate::batch::{arrange, BatchError, Experiment, FileCount};
use crate::config::{IdentityConfig, Settings, DIFF_HELP, PLOT_HELP, STATS_HELP, VENN_HELP};
use crate::data::export;
use crate::data::filter::{diff_subsets, ExperimentSubsets, SubsetLevel};
use crate::data::loader::load_file;
use crate::data::model::FilterFile;
use crate::data::table::{file_peptide_rows, peptide_rows, protein_rows, PeptideRow, ProteinRow};
use crate::keyer::key_batch;

// ---------------------------------------------------------------------------
// Dashboards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Venn,
    Plot,
    Stats,
    Diff,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Venn, Page::Plot, Page::Stats, Page::Diff];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Venn => "Venn",
            Page::Plot => "Plot",
            Page::Stats => "Stats",
            Page::Diff => "Diff",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Page::Venn => VENN_HELP,
            Page::Plot => PLOT_HELP,
            Page::Stats => STATS_HELP,
            Page::Diff => DIFF_HELP,
        }
    }

    pub fn file_count(&self) -> FileCount {
        match self {
            Page::Venn => FileCount::TwoOrThree,
            Page::Plot | Page::Stats | Page::Diff => FileCount::AtLeastOne,
        }
    }

    /// The Diff page compares proteins by locus, never by group.
    pub fn identity(&self, settings: &Settings) -> IdentityConfig {
        match self {
            Page::Diff => IdentityConfig {
                use_groups: false,
                ..settings.identity
            },
            _ => settings.identity,
        }
    }
}

/// Difference / intersection subsets of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOutput {
    pub label: String,
    pub subsets: ExperimentSubsets,
}

/// Results of the last successful run.
#[derive(Debug, Clone, PartialEq)]
pub enum PageResults {
    Venn {
        report: VennReport,
        peptides: Vec<PeptideRow>,
        proteins: Vec<ProteinRow>,
    },
    Plot(Vec<ExperimentSummary>),
    Stats(Vec<ExperimentStats>),
    Diff(Vec<DiffOutput>),
}

impl PageResults {
    pub fn page(&self) -> Page {
        match self {
            PageResults::Venn { .. } => Page::Venn,
            PageResults::Plot(_) => Page::Plot,
            PageResults::Stats(_) => Page::Stats,
            PageResults::Diff(_) => Page::Diff,
        }
    }
}

/// Validate, key and analyse a batch for `page`.
pub fn compute(experiments: &[Experiment], page: Page, settings: &Settings) -> Result<PageResults, BatchError> {
    let sorted = arrange(experiments, page.file_count())?;
    let files: Vec<&FilterFile> = sorted.iter().map(|ex| &ex.data).collect();
    let keys = key_batch(&files, page.identity(settings));

    Ok(match page {
        Page::Venn => PageResults::Venn {
            report: VennReport::build(&sorted, &keys),
            peptides: peptide_rows(&sorted, &keys),
            proteins: protein_rows(&sorted, &keys),
        },
        Page::Plot => PageResults::Plot(summary_table(&sorted, &keys)),
        Page::Stats => PageResults::Stats(stats_table(&sorted)),
        Page::Diff => {
            let level = if settings.group_by_peptide {
                SubsetLevel::Peptide
            } else {
                SubsetLevel::Protein
            };
            let outputs = diff_subsets(&files, &keys, level)
                .into_iter()
                .zip(&sorted)
                .map(|(subsets, ex)| DiffOutput {
                    label: ex.label.clone(),
                    subsets,
                })
                .collect();
            PageResults::Diff(outputs)
        }
    })
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Uploaded files in upload order, with their editable order and label.
    pub experiments: Vec<Experiment>,

    pub page: Page,

    pub settings: Settings,

    /// Output of the last run; cleared whenever its inputs change.
    pub results: Option<PageResults>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load DTASelect-filter files and append them to the batch. Files that
    /// fail to parse are skipped and reported in the status line.
    pub fn add_files(&mut self, paths: Vec<PathBuf>) {
        let mut failures = Vec::new();
        for path in paths {
            match load_file(&path) {
                Ok(data) => {
                    log::info!(
                        "Loaded {} ({} groups, {} peptides)",
                        path.display(),
                        data.group_count(),
                        data.peptide_count()
                    );
                    self.add_experiment(path, data);
                }
                Err(e) => {
                    log::error!("Failed to load file: {e:#}");
                    failures.push(format!("{e:#}"));
                }
            }
        }
        self.status_message = (!failures.is_empty()).then(|| format!("Error: {}", failures.join("; ")));
    }

    pub fn add_experiment(&mut self, path: PathBuf, data: FilterFile) {
        let position = self.experiments.len();
        self.experiments.push(Experiment::new(path, data, position));
        self.results = None;
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.experiments.len() {
            self.experiments.remove(index);
            self.results = None;
        }
    }

    pub fn clear(&mut self) {
        self.experiments.clear();
        self.results = None;
        self.status_message = None;
    }

    pub fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.results = None;
            self.status_message = None;
        }
    }

    /// Run the active page. A validation failure clears the results and is
    /// shown as the status message.
    pub fn run(&mut self) {
        match compute(&self.experiments, self.page, &self.settings) {
            Ok(results) => {
                log::info!(
                    "Ran {} on {} experiments",
                    self.page.title(),
                    self.experiments.len()
                );
                self.results = Some(results);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("{} run rejected: {e}", self.page.title());
                self.results = None;
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.results = None;
    }

    // -----------------------------------------------------------------------
    // Exports
    // -----------------------------------------------------------------------

    /// Write the Diff subsets into `dir`: `<label>_diff.txt/.csv` and
    /// `<label>_inter.txt/.csv` per experiment. Returns the number of files
    /// written.
    pub fn save_diff(&self, dir: &Path) -> Result<usize> {
        let Some(PageResults::Diff(outputs)) = &self.results else {
            return Ok(0);
        };
        if let Some(output) = outputs.iter().find(|o| !is_file_stem(&o.label)) {
            bail!("Label `{}` cannot be used as a file name", output.label);
        }
        let mut written = 0;
        for (i, output) in outputs.iter().enumerate() {
            let subsets = &output.subsets;
            for (suffix, file, keys) in [
                ("diff", &subsets.difference, &subsets.difference_keys),
                ("inter", &subsets.intersection, &subsets.intersection_keys),
            ] {
                let stem = format!("{}_{suffix}", output.label);
                export::write_filter_text(&dir.join(format!("{stem}.txt")), file)?;
                let rows = file_peptide_rows(i, &output.label, file, keys);
                export::write_csv(&dir.join(format!("{stem}.csv")), &rows)?;
                written += 2;
            }
        }
        log::info!("Wrote {written} Diff files to {}", dir.display());
        Ok(written)
    }

    /// Flat summary rows of the Plot page.
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        match &self.results {
            Some(PageResults::Plot(summaries)) => summaries.iter().map(SummaryRow::from).collect(),
            _ => Vec::new(),
        }
    }

    /// Write one table of the current results to `path`. Exports that do not
    /// match the current results are a no-op.
    pub fn export(&self, kind: Export, path: &Path) -> Result<()> {
        match (kind, &self.results) {
            (Export::PeptidesCsv, Some(PageResults::Venn { peptides, .. })) => {
                export::write_csv(path, peptides)
            }
            (Export::ProteinsCsv, Some(PageResults::Venn { proteins, .. })) => {
                export::write_csv(path, proteins)
            }
            (Export::PeptidesParquet, Some(PageResults::Venn { peptides, .. })) => {
                export::write_peptides_parquet(path, peptides)
            }
            (Export::ProteinsParquet, Some(PageResults::Venn { proteins, .. })) => {
                export::write_proteins_parquet(path, proteins)
            }
            (Export::SummaryCsv, Some(PageResults::Plot(_))) => {
                export::write_csv(path, &self.summary_rows())
            }
            (Export::SummaryJson, Some(PageResults::Plot(_))) => {
                export::write_json(path, &self.summary_rows())
            }
            (Export::StatsCsv, Some(PageResults::Stats(stats))) => export::write_csv(path, stats),
            _ => {
                log::warn!("Nothing to export for {kind:?}");
                Ok(())
            }
        }
    }
}

/// Table exports offered by the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Export {
    PeptidesCsv,
    ProteinsCsv,
    PeptidesParquet,
    ProteinsParquet,
    SummaryCsv,
    SummaryJson,
    StatsCsv,
}

impl Export {
    pub fn button_text(&self) -> &'static str {
        match self {
            Export::PeptidesCsv => "Peptides CSV",
            Export::ProteinsCsv => "Proteins CSV",
            Export::PeptidesParquet => "Peptides Parquet",
            Export::ProteinsParquet => "Proteins Parquet",
            Export::SummaryCsv => "Summary CSV",
            Export::SummaryJson => "Summary JSON",
            Export::StatsCsv => "Stats CSV",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Export::PeptidesCsv => "peptides.csv",
            Export::ProteinsCsv => "proteins.csv",
            Export::PeptidesParquet => "peptides.parquet",
            Export::ProteinsParquet => "proteins.parquet",
            Export::SummaryCsv => "summary.csv",
            Export::SummaryJson => "summary.json",
            Export::StatsCsv => "stats.csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Export::PeptidesCsv | Export::ProteinsCsv | Export::SummaryCsv | Export::StatsCsv => "csv",
            Export::PeptidesParquet | Export::ProteinsParquet => "parquet",
            Export::SummaryJson => "json",
        }
    }
}

/// A label names one plain file inside the chosen folder.
fn is_file_stem(label: &str) -> bool {
    let mut components = Path::new(label).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !label.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_filter_file;
    use crate::data::testdata;

    fn state_with(files: &[(&str, String)]) -> AppState {
        let mut state = AppState::default();
        for (name, text) in files {
            state.add_experiment(PathBuf::from(name), read_filter_file(text).unwrap());
        }
        state
    }

    fn two_files() -> AppState {
        state_with(&[
            (
                "2_DTASelect-filter.txt",
                testdata::build_file(&[(&["P1"], &[("K.BBB.R", 2), ("K.CCC.R", 2)])]),
            ),
            (
                "1_DTASelect-filter.txt",
                testdata::build_file(&[(&["P1"], &[("K.AAA.R", 2), ("K.BBB.R", 2)])]),
            ),
        ])
    }

    #[test]
    fn venn_needs_two_or_three_files() {
        let mut state = state_with(&[(
            "a.txt",
            testdata::build_file(&[(&["P1"], &[("K.AAA.R", 2)])]),
        )]);
        state.run();
        assert!(state.results.is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Incorrect number of files: 1. Please use only 2 or 3 files!")
        );
    }

    #[test]
    fn plot_runs_in_configured_order() {
        let mut state = two_files();
        state.set_page(Page::Plot);
        state.run();
        let rows = state.summary_rows();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["1", "2"]);
        assert_eq!(rows[1].new_peptides, 1);
        assert_eq!(rows[1].seen_peptides, 1);
        assert_eq!(rows[1].seen_proteins, 1);
    }

    #[test]
    fn duplicate_orders_halt_the_run() {
        let mut state = two_files();
        state.set_page(Page::Stats);
        state.experiments[1].order = 2;
        state.run();
        assert!(state.results.is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Order must be unique! (2 is used more than once)")
        );
    }

    #[test]
    fn diff_forces_locus_identity() {
        let settings = Settings::default();
        assert!(!Page::Diff.identity(&settings).use_groups);
        assert!(Page::Venn.identity(&settings).use_groups);

        let mut state = two_files();
        state.set_page(Page::Diff);
        state.run();
        let Some(PageResults::Diff(outputs)) = &state.results else {
            panic!("expected diff results");
        };
        assert_eq!(outputs[0].label, "1");
        assert_eq!(outputs[0].subsets.difference.peptide_count(), 1);
        assert_eq!(outputs[1].subsets.intersection.peptide_count(), 1);
    }

    #[test]
    fn diff_files_are_written_per_label() {
        let mut state = two_files();
        state.set_page(Page::Diff);
        state.run();
        let dir = std::env::temp_dir().join(format!("paser_diff_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        assert_eq!(state.save_diff(&dir).unwrap(), 8);
        let text = std::fs::read_to_string(dir.join("1_diff.txt")).unwrap();
        assert!(text.starts_with("DTASelect v2.1.12\n"));
        assert!(text.contains("K.AAA.R"));
        assert!(!text.contains("K.BBB.R"));
        let csv = std::fs::read_to_string(dir.join("2_inter.csv")).unwrap();
        assert!(csv.starts_with("experiment,label,protein_group,sequence"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn diff_csv_keys_follow_identity_settings() {
        let mut state = state_with(&[
            (
                "1_DTASelect-filter.txt",
                testdata::build_file(&[(&["P1"], &[("K.PEPTIDE.R", 2), ("K.PEPTIDE.R", 3)])]),
            ),
            (
                "2_DTASelect-filter.txt",
                testdata::build_file(&[(&["P2"], &[("K.OTHERS.R", 2)])]),
            ),
        ]);
        state.set_page(Page::Diff);
        state.settings.identity.use_charge = false;
        state.run();
        let dir = std::env::temp_dir().join(format!("paser_diff_keys_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        state.save_diff(&dir).unwrap();

        let mut reader = csv::Reader::from_path(dir.join("1_diff.csv")).unwrap();
        let headers = reader.headers().unwrap().clone();
        let key_column = headers.iter().position(|h| h == "peptide_key").unwrap();
        let charge_column = headers.iter().position(|h| h == "charge").unwrap();
        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        std::fs::remove_dir_all(&dir).unwrap();

        let charges: Vec<_> = records.iter().map(|r| &r[charge_column]).collect();
        assert_eq!(charges, ["2", "3"]);
        // Both charge states share the batch key shown in the Venn tables.
        assert_eq!(&records[0][key_column], "0");
        assert_eq!(&records[1][key_column], "0");
    }

    #[test]
    fn diff_labels_stay_inside_the_folder() {
        assert!(is_file_stem("run_1"));
        assert!(!is_file_stem("../up"));
        assert!(!is_file_stem("a/b"));
        assert!(!is_file_stem("a\\b"));
        assert!(!is_file_stem(".."));
        assert!(!is_file_stem(""));

        let mut state = two_files();
        state.experiments[0].label = "../escape".into();
        state.set_page(Page::Diff);
        state.run();
        let dir = std::env::temp_dir().join(format!("paser_diff_labels_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let err = state.save_diff(&dir).unwrap_err();
        assert_eq!(err.to_string(), "Label `../escape` cannot be used as a file name");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mismatched_export_is_a_no_op() {
        let state = two_files();
        let path = std::env::temp_dir().join("paser_never_written.csv");
        state.export(Export::StatsCsv, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn editing_the_batch_clears_results() {
        let mut state = two_files();
        state.run();
        assert!(matches!(state.results, Some(PageResults::Venn { .. })));
        state.remove(0);
        assert!(state.results.is_none());
    }
}
