use std::iter::{Enumerate, Peekable};
use std::path::Path;
use std::str::{FromStr, Lines};

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::{FilterFile, PeptideLine, ProteinLine, ResultGroup};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a DTASelect-filter file from disk.
pub fn load_file(path: &Path) -> Result<FilterFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let file = read_filter_file(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::debug!(
        "{}: {} groups, {} proteins, {} peptides",
        path.display(),
        file.group_count(),
        file.protein_count(),
        file.peptide_count()
    );
    Ok(file)
}

/// Parse the complete text of a DTASelect-filter file.
pub fn read_filter_file(input: &str) -> Result<FilterFile, ParseError> {
    Parser::new(input).parse()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error that may occur while parsing a DTASelect-filter file. Line numbers
/// are 1-based.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("file is empty")]
    Empty,
    #[error("no `{0}` column header line found")]
    MissingHeader(&'static str),
    #[error("line {line}: column header has no `{column}` column")]
    MissingColumn { line: usize, column: &'static str },
    #[error("line {line}: no value for column `{column}`")]
    MissingField { line: usize, column: &'static str },
    #[error("line {line}: cannot convert `{value}` in column `{column}`")]
    Conversion {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: cannot read a charge from file name `{file_name}`")]
    Charge { line: usize, file_name: String },
    #[error("line {line}: peptide line appears before any protein line")]
    OrphanPeptide { line: usize },
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

const LOCUS: &str = "Locus";
const UNIQUE: &str = "Unique";

/// Column positions of the protein table, resolved from its header line.
#[derive(Debug)]
struct ProteinColumns {
    locus: usize,
    sequence_count: usize,
    spectrum_count: usize,
    sequence_coverage: usize,
    length: Option<usize>,
    molecular_weight: Option<usize>,
    pi: Option<usize>,
    validation_status: Option<usize>,
    nsaf: Option<usize>,
    empai: Option<usize>,
    description: Option<usize>,
}

/// Column positions of the peptide table.
#[derive(Debug)]
struct PeptideColumns {
    unique: usize,
    file_name: usize,
    x_corr: usize,
    delta_cn: usize,
    conf: usize,
    total_intensity: Option<usize>,
    redundancy: Option<usize>,
    sequence: usize,
}

fn position(fields: &[&str], name: &str) -> Option<usize> {
    fields.iter().position(|f| f.trim() == name)
}

fn required(fields: &[&str], name: &'static str, line: usize) -> Result<usize, ParseError> {
    position(fields, name).ok_or(ParseError::MissingColumn { line, column: name })
}

impl ProteinColumns {
    fn resolve(header: &str, line: usize) -> Result<Self, ParseError> {
        let fields: Vec<&str> = header.split('\t').collect();
        Ok(ProteinColumns {
            locus: required(&fields, LOCUS, line)?,
            sequence_count: required(&fields, "Sequence Count", line)?,
            spectrum_count: required(&fields, "Spectrum Count", line)?,
            sequence_coverage: required(&fields, "Sequence Coverage", line)?,
            length: position(&fields, "Length"),
            molecular_weight: position(&fields, "MolWt"),
            pi: position(&fields, "pI"),
            validation_status: position(&fields, "Validation Status"),
            nsaf: position(&fields, "NSAF"),
            empai: position(&fields, "EMPAI"),
            description: position(&fields, "Descriptive Name"),
        })
    }
}

impl PeptideColumns {
    fn resolve(header: &str, line: usize) -> Result<Self, ParseError> {
        let fields: Vec<&str> = header.split('\t').collect();
        Ok(PeptideColumns {
            unique: required(&fields, UNIQUE, line)?,
            file_name: required(&fields, "FileName", line)?,
            x_corr: required(&fields, "XCorr", line)?,
            delta_cn: required(&fields, "DeltCN", line)?,
            conf: required(&fields, "Conf%", line)?,
            total_intensity: position(&fields, "TotalIntensity"),
            redundancy: position(&fields, "Redundancy"),
            sequence: required(&fields, "Sequence", line)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Record fields
// ---------------------------------------------------------------------------

/// Tab-separated fields of one body line, with its line number for errors.
struct Record<'s> {
    fields: Vec<&'s str>,
    line: usize,
}

impl<'s> Record<'s> {
    fn new(text: &'s str, line: usize) -> Self {
        Record {
            fields: text.split('\t').collect(),
            line,
        }
    }

    fn text(&self, idx: usize, column: &'static str) -> Result<&'s str, ParseError> {
        self.fields
            .get(idx)
            .map(|f| f.trim())
            .ok_or(ParseError::MissingField {
                line: self.line,
                column,
            })
    }

    fn optional_text(&self, idx: Option<usize>) -> String {
        idx.and_then(|i| self.fields.get(i))
            .map(|f| f.trim().to_string())
            .unwrap_or_default()
    }

    fn number<T: FromStr>(&self, idx: usize, column: &'static str) -> Result<T, ParseError> {
        let value = self.text(idx, column)?;
        value.parse::<T>().map_err(|_| ParseError::Conversion {
            line: self.line,
            column,
            value: value.to_string(),
        })
    }

    /// Absent column or empty cell yields the default value.
    fn optional_number<T: FromStr + Default>(
        &self,
        idx: Option<usize>,
        column: &'static str,
    ) -> Result<T, ParseError> {
        match idx {
            Some(i) if self.fields.get(i).is_some_and(|f| !f.trim().is_empty()) => {
                self.number(i, column)
            }
            _ => Ok(T::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'s> {
    iter: Peekable<Enumerate<Lines<'s>>>,
}

impl<'s> Parser<'s> {
    fn new(input: &'s str) -> Self {
        Parser {
            iter: input.lines().enumerate().peekable(),
        }
    }

    /// Next line with its 1-based line number.
    fn next(&mut self) -> Option<(usize, &'s str)> {
        self.iter.next().map(|(i, line)| (i + 1, line))
    }

    fn peek(&mut self) -> Option<&'s str> {
        self.iter.peek().map(|(_, line)| *line)
    }

    fn parse(mut self) -> Result<FilterFile, ParseError> {
        let (_, version_line) = self
            .next()
            .filter(|(_, line)| !line.trim().is_empty())
            .ok_or(ParseError::Empty)?;

        let (header_lines, protein_columns, peptide_columns) = self.parse_headers()?;
        let results = self.parse_results(&protein_columns, &peptide_columns)?;
        let footer_lines = self.iter.by_ref().map(|(_, l)| l.to_string()).collect();

        Ok(FilterFile {
            version_line: version_line.to_string(),
            header_lines,
            results,
            footer_lines,
        })
    }

    fn parse_headers(&mut self) -> Result<(Vec<String>, ProteinColumns, PeptideColumns), ParseError> {
        let mut header_lines = Vec::new();
        let mut protein_columns = None;

        while let Some((line_no, line)) = self.next() {
            header_lines.push(line.to_string());
            match line.split('\t').next().map(str::trim) {
                Some(LOCUS) => {
                    protein_columns = Some(ProteinColumns::resolve(line, line_no)?);
                }
                Some(UNIQUE) => {
                    let proteins = protein_columns.ok_or(ParseError::MissingHeader(LOCUS))?;
                    let peptides = PeptideColumns::resolve(line, line_no)?;
                    return Ok((header_lines, proteins, peptides));
                }
                _ => {}
            }
        }

        Err(ParseError::MissingHeader(match protein_columns {
            Some(_) => UNIQUE,
            None => LOCUS,
        }))
    }

    fn parse_results(
        &mut self,
        proteins: &ProteinColumns,
        peptides: &PeptideColumns,
    ) -> Result<Vec<ResultGroup>, ParseError> {
        let mut results = Vec::new();
        let mut current = ResultGroup::default();

        while let Some(line) = self.peek() {
            if is_footer_start(line) {
                break;
            }
            let (line_no, line) = match self.next() {
                Some(next) => next,
                None => break,
            };
            if line.trim().is_empty() {
                continue;
            }

            let record = Record::new(line, line_no);
            let is_protein = record
                .fields
                .get(proteins.sequence_coverage)
                .is_some_and(|f| f.trim().ends_with('%'));

            if is_protein {
                // A protein line after peptides opens the next group.
                if !current.peptides.is_empty() {
                    results.push(std::mem::take(&mut current));
                }
                current.proteins.push(parse_protein(&record, line, proteins)?);
            } else {
                if current.proteins.is_empty() {
                    return Err(ParseError::OrphanPeptide { line: line_no });
                }
                current.peptides.push(parse_peptide(&record, line, peptides)?);
            }
        }

        if !current.proteins.is_empty() {
            results.push(current);
        }
        Ok(results)
    }
}

/// The summary table starts with an empty cell followed by `Proteins`.
fn is_footer_start(line: &str) -> bool {
    line.split('\t').map(str::trim).find(|f| !f.is_empty()) == Some("Proteins")
}

fn parse_protein(record: &Record, raw: &str, cols: &ProteinColumns) -> Result<ProteinLine, ParseError> {
    let coverage = record.text(cols.sequence_coverage, "Sequence Coverage")?;
    let sequence_coverage = coverage
        .trim_end_matches('%')
        .parse::<f64>()
        .map_err(|_| ParseError::Conversion {
            line: record.line,
            column: "Sequence Coverage",
            value: coverage.to_string(),
        })?;

    Ok(ProteinLine {
        locus_name: record.text(cols.locus, LOCUS)?.to_string(),
        sequence_count: record.number(cols.sequence_count, "Sequence Count")?,
        spectrum_count: record.number(cols.spectrum_count, "Spectrum Count")?,
        sequence_coverage,
        length: record.optional_number(cols.length, "Length")?,
        molecular_weight: record.optional_number(cols.molecular_weight, "MolWt")?,
        pi: record.optional_number(cols.pi, "pI")?,
        validation_status: record.optional_text(cols.validation_status),
        nsaf: record.optional_number(cols.nsaf, "NSAF")?,
        empai: record.optional_number(cols.empai, "EMPAI")?,
        description: record.optional_text(cols.description),
        raw: raw.to_string(),
    })
}

fn parse_peptide(record: &Record, raw: &str, cols: &PeptideColumns) -> Result<PeptideLine, ParseError> {
    let file_name = record.text(cols.file_name, "FileName")?;
    let charge = charge_from_file_name(file_name).ok_or_else(|| ParseError::Charge {
        line: record.line,
        file_name: file_name.to_string(),
    })?;

    Ok(PeptideLine {
        unique: record.text(cols.unique, UNIQUE)?.to_string(),
        file_name: file_name.to_string(),
        charge,
        x_corr: record.number(cols.x_corr, "XCorr")?,
        delta_cn: record.number(cols.delta_cn, "DeltCN")?,
        conf: record.number(cols.conf, "Conf%")?,
        total_intensity: record.optional_number(cols.total_intensity, "TotalIntensity")?,
        redundancy: record.optional_number(cols.redundancy, "Redundancy")?,
        sequence: record.text(cols.sequence, "Sequence")?.to_string(),
        raw: raw.to_string(),
    })
}

/// `run.1234.1234.2` carries the charge in its last component.
fn charge_from_file_name(file_name: &str) -> Option<u8> {
    file_name.rsplit('.').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata::{self, PEPTIDE_HEADER, PROTEIN_HEADER};

    #[test]
    fn parses_groups_headers_and_footer() {
        let text = testdata::build_file(&[
            (&["sp|P1|A", "sp|P2|B"], &[("K.PEPTIDE.R", 2), ("R.PEPT(15.2)IDE.K", 3)]),
            (&["sp|P3|C"], &[("K.AAAK.R", 2)]),
        ]);
        let file = read_filter_file(&text).unwrap();

        assert_eq!(file.version(), "v2.1.12");
        assert_eq!(file.header_lines.last().map(String::as_str), Some(PEPTIDE_HEADER));
        assert_eq!(file.group_count(), 2);
        assert_eq!(file.protein_count(), 3);
        assert_eq!(file.peptide_count(), 3);
        assert_eq!(file.footer_lines.len(), 3);

        let first = &file.results[0];
        assert_eq!(first.group_id(), "sp|P1|A;sp|P2|B");
        assert_eq!(first.peptides[1].sequence, "R.PEPT(15.2)IDE.K");
        assert_eq!(first.peptides[1].charge, 3);
        assert_eq!(first.proteins[0].sequence_coverage, 25.0);
        assert_eq!(first.proteins[0].spectrum_count, 10);
    }

    #[test]
    fn columns_resolve_by_name() {
        let text = "DTASelect v2.0\n\
                    Locus\tSequence Coverage\tSpectrum Count\tSequence Count\n\
                    Unique\tFileName\tXCorr\tDeltCN\tConf%\tSequence\n\
                    P9\t12.5%\t4\t2\n\
                    *\ta.1.1.4\t3.1\t0.2\t99.0\tK.MK.R\n";
        let file = read_filter_file(text).unwrap();
        let group = &file.results[0];
        assert_eq!(group.proteins[0].locus_name, "P9");
        assert_eq!(group.proteins[0].sequence_count, 2);
        assert_eq!(group.proteins[0].spectrum_count, 4);
        assert_eq!(group.peptides[0].charge, 4);
        assert_eq!(group.peptides[0].x_corr, 3.1);
        assert_eq!(group.peptides[0].total_intensity, 0.0);
        assert!(file.footer_lines.is_empty());
    }

    #[test]
    fn empty_file_is_rejected() {
        assert_eq!(read_filter_file(""), Err(ParseError::Empty));
    }

    #[test]
    fn missing_headers_are_reported() {
        assert_eq!(
            read_filter_file("DTASelect v2\nsomething"),
            Err(ParseError::MissingHeader("Locus"))
        );
        let text = format!("DTASelect v2\n{PROTEIN_HEADER}\n");
        assert_eq!(read_filter_file(&text), Err(ParseError::MissingHeader("Unique")));
    }

    #[test]
    fn peptide_without_protein_is_rejected() {
        let text = format!(
            "DTASelect v2\n{PROTEIN_HEADER}\n{PEPTIDE_HEADER}\n{}\n",
            testdata::peptide_line("K.PEPTIDE.R", 2, 1)
        );
        assert_eq!(
            read_filter_file(&text),
            Err(ParseError::OrphanPeptide { line: 4 })
        );
    }

    #[test]
    fn bad_numbers_carry_line_and_column() {
        let text = format!(
            "DTASelect v2\n{PROTEIN_HEADER}\n{PEPTIDE_HEADER}\n\
             P1\tmany\t10\t25.0%\t300\t33000\t6.1\tU\t0.01\t1.2\tdesc\n"
        );
        assert_eq!(
            read_filter_file(&text),
            Err(ParseError::Conversion {
                line: 4,
                column: "Sequence Count",
                value: "many".into()
            })
        );
    }

    #[test]
    fn charge_comes_from_file_name() {
        assert_eq!(charge_from_file_name("run_01.2001.2001.3"), Some(3));
        assert_eq!(charge_from_file_name("run_01.2001.2001"), None);
        assert_eq!(charge_from_file_name("noext"), None);
    }
}
