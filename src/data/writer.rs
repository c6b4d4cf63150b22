use std::fmt::Write;

use super::model::FilterFile;

/// Serialize a [`FilterFile`] back into DTASelect-filter text.
///
/// Records are written from their raw lines, so a parsed file is reproduced
/// exactly and a subset keeps the formatting of its source file.
pub fn write_filter_file(file: &FilterFile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", file.version_line);
    for line in &file.header_lines {
        let _ = writeln!(out, "{line}");
    }
    for group in &file.results {
        for protein in &group.proteins {
            let _ = writeln!(out, "{}", protein.raw);
        }
        for peptide in &group.peptides {
            let _ = writeln!(out, "{}", peptide.raw);
        }
    }
    for line in &file.footer_lines {
        let _ = writeln!(out, "{line}");
    }
    out
}
