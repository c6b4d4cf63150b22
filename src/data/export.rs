use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray, UInt32Array, UInt64Array, UInt8Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::model::FilterFile;
use super::table::{PeptideRow, ProteinRow};
use super::writer::write_filter_file;

// ---------------------------------------------------------------------------
// CSV / JSON
// ---------------------------------------------------------------------------

/// Serialize `rows` as CSV with a header row taken from the field names.
pub fn to_csv_string<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("serializing CSV row")?;
    }
    let bytes = writer.into_inner().context("flushing CSV")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("serializing CSV row")?;
    }
    writer.flush().with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, rows).context("serializing JSON")?;
    log::info!("Wrote {} records to {}", rows.len(), path.display());
    Ok(())
}

/// Write a DTASelect-filter file.
pub fn write_filter_text(path: &Path, file: &FilterFile) -> Result<()> {
    std::fs::write(path, write_filter_file(file))
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Wrote {} groups, {} peptides to {}",
        file.group_count(),
        file.peptide_count(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn strings<T>(rows: &[T], f: impl Fn(&T) -> &str) -> StringArray {
    StringArray::from(rows.iter().map(f).collect::<Vec<_>>())
}

fn floats<T>(rows: &[T], f: impl Fn(&T) -> f64) -> Float64Array {
    Float64Array::from(rows.iter().map(f).collect::<Vec<_>>())
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating Parquet writer")?;
    writer.write(batch).context("writing record batch")?;
    writer.close().context("closing Parquet writer")?;
    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

/// Arrow record batch of the combined peptide table.
pub fn peptide_batch(rows: &[PeptideRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("experiment", DataType::UInt64, false),
        Field::new("label", DataType::Utf8, false),
        Field::new("protein_group", DataType::Utf8, false),
        Field::new("sequence", DataType::Utf8, false),
        Field::new("clean_sequence", DataType::Utf8, false),
        Field::new("unmod_sequence", DataType::Utf8, false),
        Field::new("charge", DataType::UInt8, false),
        Field::new("file_name", DataType::Utf8, false),
        Field::new("x_corr", DataType::Float64, false),
        Field::new("delta_cn", DataType::Float64, false),
        Field::new("conf", DataType::Float64, false),
        Field::new("total_intensity", DataType::Float64, false),
        Field::new("peptide_key", DataType::UInt64, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(UInt64Array::from(
                rows.iter().map(|r| r.experiment as u64).collect::<Vec<_>>(),
            )),
            Arc::new(strings(rows, |r| &r.label)),
            Arc::new(strings(rows, |r| &r.protein_group)),
            Arc::new(strings(rows, |r| &r.sequence)),
            Arc::new(strings(rows, |r| &r.clean_sequence)),
            Arc::new(strings(rows, |r| &r.unmod_sequence)),
            Arc::new(UInt8Array::from(rows.iter().map(|r| r.charge).collect::<Vec<_>>())),
            Arc::new(strings(rows, |r| &r.file_name)),
            Arc::new(floats(rows, |r| r.x_corr)),
            Arc::new(floats(rows, |r| r.delta_cn)),
            Arc::new(floats(rows, |r| r.conf)),
            Arc::new(floats(rows, |r| r.total_intensity)),
            Arc::new(UInt64Array::from(
                rows.iter().map(|r| r.peptide_key as u64).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building peptide record batch")
}

/// Arrow record batch of the combined protein table.
pub fn protein_batch(rows: &[ProteinRow]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("experiment", DataType::UInt64, false),
        Field::new("label", DataType::Utf8, false),
        Field::new("locus_name", DataType::Utf8, false),
        Field::new("protein_group", DataType::Utf8, false),
        Field::new("sequence_count", DataType::UInt32, false),
        Field::new("spectrum_count", DataType::UInt32, false),
        Field::new("sequence_coverage", DataType::Float64, false),
        Field::new("nsaf", DataType::Float64, false),
        Field::new("empai", DataType::Float64, false),
        Field::new("description", DataType::Utf8, false),
        Field::new("protein_key", DataType::UInt64, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(UInt64Array::from(
                rows.iter().map(|r| r.experiment as u64).collect::<Vec<_>>(),
            )),
            Arc::new(strings(rows, |r| &r.label)),
            Arc::new(strings(rows, |r| &r.locus_name)),
            Arc::new(strings(rows, |r| &r.protein_group)),
            Arc::new(UInt32Array::from(
                rows.iter().map(|r| r.sequence_count).collect::<Vec<_>>(),
            )),
            Arc::new(UInt32Array::from(
                rows.iter().map(|r| r.spectrum_count).collect::<Vec<_>>(),
            )),
            Arc::new(floats(rows, |r| r.sequence_coverage)),
            Arc::new(floats(rows, |r| r.nsaf)),
            Arc::new(floats(rows, |r| r.empai)),
            Arc::new(strings(rows, |r| &r.description)),
            Arc::new(UInt64Array::from(
                rows.iter().map(|r| r.protein_key as u64).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building protein record batch")
}

pub fn write_peptides_parquet(path: &Path, rows: &[PeptideRow]) -> Result<()> {
    write_batch(path, &peptide_batch(rows)?)
}

pub fn write_proteins_parquet(path: &Path, rows: &[ProteinRow]) -> Result<()> {
    write_batch(path, &protein_batch(rows)?)
}

// ---------------------------------------------------------------------------
// Screenshots
// ---------------------------------------------------------------------------

/// Encode an RGBA8 buffer of `width` x `height` pixels as PNG.
pub fn save_png(path: &Path, width: u32, height: u32, rgba: Vec<u8>) -> Result<()> {
    let buffer = image::RgbaImage::from_raw(width, height, rgba)
        .context("pixel buffer does not match the image size")?;
    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("saving {}", path.display()))?;
    log::info!("Saved {width}x{height} screenshot to {}", path.display());
    Ok(())
}
