//! CSV export of a filtered view.

use std::io::Write;

use super::filter::select;
use super::model::ResaleDataset;
use super::Result;

/// Write the records behind `indices` as UTF-8 CSV: a header row with the
/// enriched column order, then one row per record. Absent values are empty.
pub fn write_csv<W: Write>(writer: W, dataset: &ResaleDataset, indices: &[usize]) -> Result<()> {
    let columns = dataset.column_names();
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&columns)?;
    for record in select(dataset, indices) {
        wtr.write_record(columns.iter().map(|c| record.cell(c)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// [`write_csv`] into an in-memory buffer.
pub fn to_csv_bytes(dataset: &ResaleDataset, indices: &[usize]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, dataset, indices)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RawTable, ResaleRecord};
    use std::collections::BTreeMap;

    fn dataset() -> ResaleDataset {
        let mut extra = BTreeMap::new();
        extra.insert("block".to_string(), "123A".to_string());
        ResaleDataset::from_raw(RawTable {
            columns: ["month", "town", "flat_type", "block", "storey_range", "remaining_lease", "resale_price"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            records: vec![
                ResaleRecord {
                    month: "2024-01".into(),
                    town: "ANG MO KIO".into(),
                    flat_type: "3 ROOM".into(),
                    storey_range: Some("01 TO 03".into()),
                    remaining_lease: Some("58 years 02 months".into()),
                    resale_price: Some(300_000.0),
                    resale_price_text: None,
                    extra,
                },
                ResaleRecord {
                    month: "2024-02".into(),
                    town: "BEDOK".into(),
                    flat_type: "4 ROOM".into(),
                    storey_range: None,
                    remaining_lease: Some("n/a".into()),
                    resale_price: Some(450_500.5),
                    resale_price_text: Some("450500.50".into()),
                    extra: BTreeMap::new(),
                },
            ],
        })
    }

    #[test]
    fn test_export_header_and_rows() {
        let ds = dataset();
        let bytes = to_csv_bytes(&ds, &[0, 1]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "month,town,flat_type,block,storey_range,remaining_lease,resale_price,\
             floor_level_category,lease_years,lease_category,year"
        );
        assert_eq!(
            lines[1],
            "2024-01,ANG MO KIO,3 ROOM,123A,01 TO 03,58 years 02 months,300000,\
             Low floor (01-05),58,<60 years,2024"
        );
        assert_eq!(
            lines[2],
            "2024-02,BEDOK,4 ROOM,,,n/a,450500.50,Unknown,,Unknown,2024"
        );
    }

    #[test]
    fn test_export_subset_only() {
        let ds = dataset();
        let text = String::from_utf8(to_csv_bytes(&ds, &[1]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("BEDOK"));
        assert!(!text.contains("ANG MO KIO"));
    }

    #[test]
    fn test_export_empty_view_writes_header() {
        let ds = dataset();
        let text = String::from_utf8(to_csv_bytes(&ds, &[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
