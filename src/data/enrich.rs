//! Derivation of categorical fields from raw record strings.
//!
//! Every function here is total: malformed input maps to
//! [`FloorLevel::Unknown`], [`LeaseCategory::Unknown`] or `None`.

use super::model::{EnrichedRecord, FloorLevel, LeaseCategory, ResaleRecord};

/// Bucket a `"<start> TO <end>"` storey range by its midpoint floor.
pub fn categorize_storey_range(storey_range: Option<&str>) -> FloorLevel {
    let Some((start, end)) = storey_range.and_then(parse_storey_bounds) else {
        return FloorLevel::Unknown;
    };
    let avg = (start as f64 + end as f64) / 2.0;
    if avg <= 5.0 {
        FloorLevel::Low
    } else if avg <= 11.0 {
        FloorLevel::Mid
    } else {
        FloorLevel::High
    }
}

fn parse_storey_bounds(s: &str) -> Option<(u32, u32)> {
    let (start, end) = s.split_once(" TO ")?;
    Some((parse_digits(start)?, parse_digits(end)?))
}

/// Parse a non-empty run of ASCII digits. Signs and inner spaces are rejected.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Leading year count of a remaining-lease string such as `"61 years 04 months"`.
pub fn extract_lease_years(remaining_lease: Option<&str>) -> Option<u32> {
    let (prefix, _) = remaining_lease?.split_once("year")?;
    parse_digits(prefix.trim())
}

/// Bucket a lease length. Lower bounds are inclusive: 60 is `60-69 years`.
pub fn categorize_remaining_lease(years: Option<u32>) -> LeaseCategory {
    match years {
        None => LeaseCategory::Unknown,
        Some(y) if y < 60 => LeaseCategory::Under60,
        Some(y) if y < 70 => LeaseCategory::From60To69,
        Some(y) if y < 80 => LeaseCategory::From70To79,
        Some(y) if y < 90 => LeaseCategory::From80To89,
        Some(_) => LeaseCategory::Over90,
    }
}

/// Calendar year of a `YYYY-MM` month key. The month part must be `01..=12`.
pub fn extract_year(month: &str) -> Option<i32> {
    let (year, mm) = month.split_once('-')?;
    if year.len() != 4 || mm.len() != 2 {
        return None;
    }
    let mm = parse_digits(mm)?;
    if !(1..=12).contains(&mm) {
        return None;
    }
    parse_digits(year).map(|y| y as i32)
}

/// Derive all enrichment fields for one record.
pub fn enrich(record: ResaleRecord) -> EnrichedRecord {
    let lease_years = extract_lease_years(record.remaining_lease.as_deref());
    EnrichedRecord {
        floor_level_category: categorize_storey_range(record.storey_range.as_deref()),
        lease_years,
        lease_category: categorize_remaining_lease(lease_years),
        year: extract_year(&record.month),
        raw: record,
    }
}

/// Enrich a batch. Records are independent; order is preserved.
pub fn enrich_all(records: Vec<ResaleRecord>) -> Vec<EnrichedRecord> {
    records.into_iter().map(enrich).collect()
}
