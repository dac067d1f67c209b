use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::{DataError, Result};
use super::model::{
    RawTable, ResaleRecord, FLAT_TYPE, MONTH, REMAINING_LEASE, REQUIRED_COLUMNS, RESALE_PRICE,
    STOREY_RANGE, TOWN,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a resale table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one transaction per line (the data.gov.sg export)
/// * `.parquet` – same columns, string or numeric typed
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };
    log::info!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// Load the historical and recent tables and stack them, historical first.
pub fn load_combined(historical: &Path, recent: &Path) -> Result<RawTable> {
    Ok(load_file(historical)?.concat(load_file(recent)?))
}

// ---------------------------------------------------------------------------
// Row assembly shared by both formats
// ---------------------------------------------------------------------------

/// Positions of the required columns within a source header.
struct ColumnIndex {
    month: usize,
    town: usize,
    flat_type: usize,
    storey_range: usize,
    remaining_lease: usize,
    resale_price: usize,
}

impl ColumnIndex {
    fn locate(headers: &[String], source_name: &str) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn {
                    column: name.to_string(),
                    source_name: source_name.to_string(),
                })
        };
        Ok(ColumnIndex {
            month: find(MONTH)?,
            town: find(TOWN)?,
            flat_type: find(FLAT_TYPE)?,
            storey_range: find(STOREY_RANGE)?,
            remaining_lease: find(REMAINING_LEASE)?,
            resale_price: find(RESALE_PRICE)?,
        })
    }
}

/// Build a record from one row of cell texts (`None` = null / empty cell).
fn assemble_record(headers: &[String], idx: &ColumnIndex, cells: Vec<Option<String>>) -> ResaleRecord {
    let text = |i: usize| cells.get(i).cloned().flatten();

    let mut extra = BTreeMap::new();
    for (col_idx, name) in headers.iter().enumerate() {
        if REQUIRED_COLUMNS.contains(&name.as_str()) {
            continue;
        }
        if let Some(value) = text(col_idx) {
            extra.insert(name.clone(), value);
        }
    }

    let price_text = text(idx.resale_price);
    let resale_price = price_text
        .as_deref()
        .and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite());

    ResaleRecord {
        month: text(idx.month).unwrap_or_default(),
        town: text(idx.town).unwrap_or_default(),
        flat_type: text(idx.flat_type).unwrap_or_default(),
        storey_range: text(idx.storey_range),
        remaining_lease: text(idx.remaining_lease),
        resale_price,
        resale_price_text: price_text,
        extra,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, required columns in any
/// position. Other columns are carried through as text.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let idx = ColumnIndex::locate(&headers, &path.display().to_string())?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let cells = row.iter().map(non_empty).collect();
        records.push(assemble_record(&headers, &idx, cells));
    }

    Ok(RawTable {
        columns: headers,
        records,
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same column set as the CSV export.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); numeric columns are rendered as text
/// and re-parsed where a number is expected.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let idx = ColumnIndex::locate(&headers, &path.display().to_string())?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| cell_text(col, row))
                .collect();
            records.push(assemble_record(&headers, &idx, cells));
        }
    }

    Ok(RawTable {
        columns: headers,
        records,
    })
}

// -- Arrow helpers --

/// Render a single Arrow cell as text. Nulls and unsupported types are `None`.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => non_empty(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => non_empty(col.as_string::<i64>().value(row)),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| a.value(row).to_string()),
        other => {
            log::warn!("Unsupported parquet column type {other:?}, treating as null");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::data::aggregate::{count_by_town, mean_price_by_month, price_distribution_by_flat_type};
    use crate::data::enrich::enrich_all;

    const HEADER: &str =
        "month,town,flat_type,block,street_name,storey_range,floor_area_sqm,flat_model,lease_commence_date,remaining_lease,resale_price";

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = csv_file(&[
            HEADER,
            "2024-01,ANG MO KIO,3 ROOM,406,ANG MO KIO AVE 10,01 TO 03,68,New Generation,1979,58 years 02 months,300000",
            "2024-02,BEDOK,4 ROOM,101,BEDOK NTH AVE 4,,92,Model A,1999,,n/a",
        ]);

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns.len(), 11);
        assert_eq!(table.columns[3], "block");

        let first = &table.records[0];
        assert_eq!(first.town, "ANG MO KIO");
        assert_eq!(first.storey_range.as_deref(), Some("01 TO 03"));
        assert_eq!(first.resale_price, Some(300_000.0));
        assert_eq!(first.extra["flat_model"], "New Generation");

        let second = &table.records[1];
        assert_eq!(second.storey_range, None);
        assert_eq!(second.remaining_lease, None);
        assert_eq!(second.resale_price, None);
    }

    #[test]
    fn test_non_finite_price_loads_as_absent() {
        let file = csv_file(&[
            "month,town,flat_type,storey_range,remaining_lease,resale_price",
            "2024-01,BEDOK,3 ROOM,01 TO 03,60 years,400000",
            "2024-01,BEDOK,3 ROOM,01 TO 03,60 years,NaN",
            "2024-01,BEDOK,3 ROOM,01 TO 03,60 years,nan",
            "2024-01,BEDOK,3 ROOM,01 TO 03,60 years,inf",
            "2024-01,BEDOK,3 ROOM,01 TO 03,60 years,-infinity",
        ]);

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.records[0].resale_price, Some(400_000.0));
        for record in &table.records[1..] {
            assert_eq!(record.resale_price, None);
        }
        assert_eq!(table.records[4].resale_price_text.as_deref(), Some("-infinity"));

        let enriched = enrich_all(table.records);
        assert_eq!(
            mean_price_by_month(&enriched),
            Some(vec![("2024-01".to_string(), 400_000.0)])
        );
        let dists = price_distribution_by_flat_type(&enriched).unwrap();
        assert_eq!(dists[0].count, 1);
        assert_eq!(dists[0].max, 400_000.0);
        assert_eq!(dists[0].upper_whisker, 400_000.0);
        assert_eq!(count_by_town(&enriched), Some(vec![("BEDOK".to_string(), 5)]));
    }

    #[test]
    fn test_price_text_is_kept_verbatim() {
        let file = csv_file(&[
            "month,town,flat_type,storey_range,remaining_lease,resale_price",
            "2024-01,BEDOK,3 ROOM,01 TO 03,60 years,300000.0",
            "2024-01,BEDOK,3 ROOM,01 TO 03,60 years,n/a",
        ]);

        let table = load_file(file.path()).unwrap();
        let first = &table.records[0];
        assert_eq!(first.resale_price, Some(300_000.0));
        assert_eq!(first.raw_cell(RESALE_PRICE).as_deref(), Some("300000.0"));
        assert_eq!(table.records[1].raw_cell(RESALE_PRICE).as_deref(), Some("n/a"));
        assert!(!first.extra.contains_key(RESALE_PRICE));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let file = csv_file(&["month,town,flat_type,storey_range,resale_price", "2024-01,BEDOK,3 ROOM,01 TO 03,1"]);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn { ref column, .. } if column == "remaining_lease"
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        assert!(matches!(
            load_file(file.path()),
            Err(DataError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");
        assert!(load_file(&missing).is_err());
    }

    #[test]
    fn test_load_combined_stacks_historical_first() {
        let historical = csv_file(&[
            HEADER,
            "2017-01,YISHUN,3 ROOM,1,ST,04 TO 06,67,Improved,1985,67 years,250000",
        ]);
        let recent = csv_file(&[
            "month,town,flat_type,storey_range,remaining_lease,resale_price",
            "2025-01,BEDOK,5 ROOM,10 TO 12,90 years,700000",
        ]);

        let table = load_combined(historical.path(), recent.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].town, "YISHUN");
        assert_eq!(table.records[1].town, "BEDOK");
        assert_eq!(table.columns.len(), 11);
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("month", DataType::Utf8, false),
            Field::new("town", DataType::Utf8, false),
            Field::new("flat_type", DataType::Utf8, false),
            Field::new("storey_range", DataType::Utf8, true),
            Field::new("remaining_lease", DataType::Utf8, true),
            Field::new("resale_price", DataType::Float64, true),
            Field::new("lease_commence_date", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2025-01", "2025-02"])),
                Arc::new(StringArray::from(vec!["BEDOK", "PUNGGOL"])),
                Arc::new(StringArray::from(vec!["4 ROOM", "5 ROOM"])),
                Arc::new(StringArray::from(vec![Some("07 TO 09"), None])),
                Arc::new(StringArray::from(vec![Some("70 years"), Some("95 years")])),
                Arc::new(Float64Array::from(vec![Some(520_000.0), None])),
                Arc::new(Int64Array::from(vec![Some(1984), Some(2020)])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].resale_price, Some(520_000.0));
        assert_eq!(table.records[0].extra["lease_commence_date"], "1984");
        assert_eq!(table.records[1].storey_range, None);
        assert_eq!(table.records[1].resale_price, None);
        assert_eq!(table.records[1].town, "PUNGGOL");
    }
}
