// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local activity dataset (Parquet primary, CSV mirror).
//!
//! The dataset is rewritten in full on every merge. Each file is written to
//! a temporary path and renamed into place, but the two files are not
//! updated atomically together.

use crate::error::{Result, SyncError};
use crate::models::ActivitySummary;
use arrow::array::{Array, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::{ArrowWriter, ProjectionMask};
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Column holding the full remote record, the source of truth on reload.
const RAW_JSON_COLUMN: &str = "raw_json";

/// Merge a new batch ahead of the existing rows, deduplicating by id.
///
/// The first occurrence of an id wins, so a row from `new` replaces any
/// existing row with the same id.
pub fn merge_activities(
    new: Vec<ActivitySummary>,
    existing: Vec<ActivitySummary>,
) -> Vec<ActivitySummary> {
    let mut seen = HashSet::with_capacity(new.len() + existing.len());
    new.into_iter()
        .chain(existing)
        .filter(|activity| seen.insert(activity.id))
        .collect()
}

/// File-backed activity dataset.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    parquet_path: PathBuf,
    csv_path: PathBuf,
}

impl DatasetStore {
    pub fn new(parquet_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            parquet_path: parquet_path.into(),
            csv_path: csv_path.into(),
        }
    }

    /// Load all stored activities (empty if the dataset does not exist yet).
    pub fn load(&self) -> Result<Vec<ActivitySummary>> {
        if !self.parquet_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.parquet_path).map_err(load_error)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(load_error)?
            .build()
            .map_err(load_error)?;

        let mut activities = Vec::new();
        for batch in reader {
            let batch = batch.map_err(load_error)?;
            let raw = string_column(&batch, RAW_JSON_COLUMN)?;
            for row in raw.iter() {
                let json = row.ok_or_else(|| {
                    SyncError::DatasetLoad(format!("null {} value", RAW_JSON_COLUMN))
                })?;
                activities.push(serde_json::from_str(json)?);
            }
        }
        Ok(activities)
    }

    /// Ids of all stored activities, reading only the id column.
    pub fn known_ids(&self) -> Result<HashSet<u64>> {
        if !self.parquet_path.exists() {
            return Ok(HashSet::new());
        }

        let file = File::open(&self.parquet_path).map_err(load_error)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(load_error)?;
        let id_index = builder.schema().index_of("id").map_err(load_error)?;
        let mask = ProjectionMask::leaves(builder.parquet_schema(), [id_index]);
        let reader = builder.with_projection(mask).build().map_err(load_error)?;

        let mut ids = HashSet::new();
        for batch in reader {
            let batch = batch.map_err(load_error)?;
            let column = batch
                .column(0)
                .as_any()
                .downcast_ref::<UInt64Array>()
                .ok_or_else(|| SyncError::DatasetLoad("id column is not UInt64".to_string()))?;
            ids.extend(column.iter().flatten());
        }
        Ok(ids)
    }

    /// Merge `new` into the stored dataset and rewrite both files.
    ///
    /// Returns the number of rows in the resulting dataset.
    pub fn merge_and_persist(&self, new: &[ActivitySummary]) -> Result<usize> {
        let existing = self.load()?;
        let merged = merge_activities(new.to_vec(), existing);
        self.write(&merged)?;

        tracing::info!(
            new = new.len(),
            rows = merged.len(),
            path = %self.parquet_path.display(),
            "Local dataset updated"
        );
        Ok(merged.len())
    }

    /// Overwrite both representations with `activities`.
    pub fn write(&self, activities: &[ActivitySummary]) -> Result<()> {
        let batch = activities_to_batch(activities)?;
        write_parquet(&self.parquet_path, &batch)?;

        let raw_index = batch.schema().index_of(RAW_JSON_COLUMN).map_err(persist_error)?;
        let mirror_columns: Vec<usize> = (0..batch.num_columns())
            .filter(|&i| i != raw_index)
            .collect();
        let mirror = batch.project(&mirror_columns).map_err(persist_error)?;
        write_csv(&self.csv_path, &mirror)
    }
}

fn dataset_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::UInt64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("sport_type", DataType::Utf8, true),
        Field::new("type", DataType::Utf8, true),
        Field::new("start_date", DataType::Utf8, false),
        Field::new("distance", DataType::Float64, false),
        Field::new("moving_time", DataType::UInt64, false),
        Field::new("elapsed_time", DataType::UInt64, true),
        Field::new("total_elevation_gain", DataType::Float64, true),
        Field::new("average_heartrate", DataType::Float64, true),
        Field::new("max_heartrate", DataType::Float64, true),
        Field::new("average_cadence", DataType::Float64, true),
        Field::new("device_name", DataType::Utf8, true),
        Field::new("gear_id", DataType::Utf8, true),
        Field::new("start_lat", DataType::Float64, true),
        Field::new("start_lon", DataType::Float64, true),
        Field::new("end_lat", DataType::Float64, true),
        Field::new("end_lon", DataType::Float64, true),
        Field::new(RAW_JSON_COLUMN, DataType::Utf8, false),
    ])
}

fn activities_to_batch(activities: &[ActivitySummary]) -> Result<RecordBatch> {
    let raw_json = activities
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let id: UInt64Array = activities.iter().map(|a| a.id).collect();
    let name: StringArray = activities.iter().map(|a| Some(a.name.as_str())).collect();
    let sport_type: StringArray = activities.iter().map(|a| a.sport_type.as_deref()).collect();
    let activity_type: StringArray = activities
        .iter()
        .map(|a| a.activity_type.as_deref())
        .collect();
    let start_date: StringArray = activities
        .iter()
        .map(|a| Some(a.start_date.as_str()))
        .collect();
    let distance: Float64Array = activities.iter().map(|a| a.distance).collect();
    let moving_time: UInt64Array = activities.iter().map(|a| a.moving_time).collect();
    let elapsed_time: UInt64Array = activities.iter().map(|a| a.elapsed_time).collect();
    let elevation_gain: Float64Array = activities
        .iter()
        .map(|a| a.total_elevation_gain)
        .collect();
    let avg_hr: Float64Array = activities.iter().map(|a| a.average_heartrate).collect();
    let max_hr: Float64Array = activities.iter().map(|a| a.max_heartrate).collect();
    let avg_cadence: Float64Array = activities.iter().map(|a| a.average_cadence).collect();
    let device_name: StringArray = activities.iter().map(|a| a.device_name.as_deref()).collect();
    let gear_id: StringArray = activities.iter().map(|a| a.gear_id.as_deref()).collect();
    let start_lat: Float64Array = activities.iter().map(|a| a.start_point().map(|p| p.0)).collect();
    let start_lon: Float64Array = activities.iter().map(|a| a.start_point().map(|p| p.1)).collect();
    let end_lat: Float64Array = activities.iter().map(|a| a.end_point().map(|p| p.0)).collect();
    let end_lon: Float64Array = activities.iter().map(|a| a.end_point().map(|p| p.1)).collect();
    let raw_json: StringArray = raw_json.iter().map(|s| Some(s.as_str())).collect();

    RecordBatch::try_new(
        Arc::new(dataset_schema()),
        vec![
            Arc::new(id),
            Arc::new(name),
            Arc::new(sport_type),
            Arc::new(activity_type),
            Arc::new(start_date),
            Arc::new(distance),
            Arc::new(moving_time),
            Arc::new(elapsed_time),
            Arc::new(elevation_gain),
            Arc::new(avg_hr),
            Arc::new(max_hr),
            Arc::new(avg_cadence),
            Arc::new(device_name),
            Arc::new(gear_id),
            Arc::new(start_lat),
            Arc::new(start_lon),
            Arc::new(end_lat),
            Arc::new(end_lon),
            Arc::new(raw_json),
        ],
    )
    .map_err(|e| SyncError::DatasetPersist(format!("Failed to create record batch: {}", e)))
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| SyncError::DatasetLoad(format!("missing {} column", name)))
}

/// Write a parquet file through a temp file and rename.
fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let temp_path = path.with_extension("parquet.tmp");
    ensure_parent(path)?;

    let file = File::create(&temp_path).map_err(persist_error)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(Default::default()))
        .build();

    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props)).map_err(persist_error)?;
    writer.write(batch).map_err(persist_error)?;
    writer.close().map_err(persist_error)?;

    fs::rename(&temp_path, path).map_err(persist_error)?;
    Ok(())
}

/// Write the plain-text mirror through a temp file and rename.
fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let temp_path = path.with_extension("csv.tmp");
    ensure_parent(path)?;

    let file = File::create(&temp_path).map_err(persist_error)?;
    let mut writer = arrow::csv::Writer::new(file);
    writer.write(batch).map_err(persist_error)?;
    drop(writer);

    fs::rename(&temp_path, path).map_err(persist_error)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(persist_error)?;
    }
    Ok(())
}

fn persist_error(e: impl std::fmt::Display) -> SyncError {
    SyncError::DatasetPersist(e.to_string())
}

fn load_error(e: impl std::fmt::Display) -> SyncError {
    SyncError::DatasetLoad(e.to_string())
}
