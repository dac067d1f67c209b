use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const MONTH: &str = "month";
pub const TOWN: &str = "town";
pub const FLAT_TYPE: &str = "flat_type";
pub const STOREY_RANGE: &str = "storey_range";
pub const REMAINING_LEASE: &str = "remaining_lease";
pub const RESALE_PRICE: &str = "resale_price";

pub const FLOOR_LEVEL_CATEGORY: &str = "floor_level_category";
pub const LEASE_YEARS: &str = "lease_years";
pub const LEASE_CATEGORY: &str = "lease_category";
pub const YEAR: &str = "year";

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    MONTH,
    TOWN,
    FLAT_TYPE,
    STOREY_RANGE,
    REMAINING_LEASE,
    RESALE_PRICE,
];

/// Columns appended by enrichment, in export order.
pub const DERIVED_COLUMNS: [&str; 4] = [FLOOR_LEVEL_CATEGORY, LEASE_YEARS, LEASE_CATEGORY, YEAR];

// ---------------------------------------------------------------------------
// FloorLevel – bucket derived from storey_range
// ---------------------------------------------------------------------------

/// Floor bucket of a flat. Variant order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloorLevel {
    Low,
    Mid,
    High,
    Unknown,
}

impl FloorLevel {
    pub const ALL: [FloorLevel; 4] = [
        FloorLevel::Low,
        FloorLevel::Mid,
        FloorLevel::High,
        FloorLevel::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FloorLevel::Low => "Low floor (01-05)",
            FloorLevel::Mid => "Mid floor (06-11)",
            FloorLevel::High => "High floor (12+)",
            FloorLevel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FloorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LeaseCategory – bucket derived from lease_years
// ---------------------------------------------------------------------------

/// Remaining-lease bucket. Variant order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LeaseCategory {
    Under60,
    From60To69,
    From70To79,
    From80To89,
    Over90,
    Unknown,
}

impl LeaseCategory {
    pub const ALL: [LeaseCategory; 6] = [
        LeaseCategory::Under60,
        LeaseCategory::From60To69,
        LeaseCategory::From70To79,
        LeaseCategory::From80To89,
        LeaseCategory::Over90,
        LeaseCategory::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LeaseCategory::Under60 => "<60 years",
            LeaseCategory::From60To69 => "60-69 years",
            LeaseCategory::From70To79 => "70-79 years",
            LeaseCategory::From80To89 => "80-89 years",
            LeaseCategory::Over90 => "90+ years",
            LeaseCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for LeaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ResaleRecord – one row of a source table
// ---------------------------------------------------------------------------

/// A single resale transaction as read from a source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResaleRecord {
    /// `YYYY-MM` time bucket.
    pub month: String,
    pub town: String,
    pub flat_type: String,
    /// `"<start> TO <end>"`, absent when the cell is empty.
    pub storey_range: Option<String>,
    /// e.g. `"61 years 04 months"`, absent when the cell is empty.
    pub remaining_lease: Option<String>,
    /// Absent when the cell is empty or not a finite number.
    pub resale_price: Option<f64>,
    /// The price cell as it appeared in the source, written back on export.
    pub resale_price_text: Option<String>,
    /// Every other source column, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl ResaleRecord {
    /// Text of a raw column, or `None` if this record has no such value.
    pub fn raw_cell(&self, column: &str) -> Option<String> {
        match column {
            MONTH => Some(self.month.clone()),
            TOWN => Some(self.town.clone()),
            FLAT_TYPE => Some(self.flat_type.clone()),
            STOREY_RANGE => self.storey_range.clone(),
            REMAINING_LEASE => self.remaining_lease.clone(),
            RESALE_PRICE => self
                .resale_price_text
                .clone()
                .or_else(|| self.resale_price.map(|p| p.to_string())),
            other => self.extra.get(other).cloned(),
        }
    }
}

// ---------------------------------------------------------------------------
// EnrichedRecord – raw record plus derived buckets
// ---------------------------------------------------------------------------

/// A record together with the fields derived from it. The raw part is
/// never touched by enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub raw: ResaleRecord,
    pub floor_level_category: FloorLevel,
    pub lease_years: Option<u32>,
    pub lease_category: LeaseCategory,
    pub year: Option<i32>,
}

impl EnrichedRecord {
    /// Display text of any raw or derived column; empty when absent.
    pub fn cell(&self, column: &str) -> String {
        match column {
            FLOOR_LEVEL_CATEGORY => self.floor_level_category.label().to_string(),
            LEASE_YEARS => self.lease_years.map(|y| y.to_string()).unwrap_or_default(),
            LEASE_CATEGORY => self.lease_category.label().to_string(),
            YEAR => self.year.map(|y| y.to_string()).unwrap_or_default(),
            other => self.raw.raw_cell(other).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – loader output
// ---------------------------------------------------------------------------

/// Parsed source table before enrichment.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Source column names in file order.
    pub columns: Vec<String>,
    pub records: Vec<ResaleRecord>,
}

impl RawTable {
    /// Append `other` below `self`. Columns are the union in first-seen order.
    pub fn concat(mut self, other: RawTable) -> RawTable {
        for col in other.columns {
            if !self.columns.contains(&col) {
                self.columns.push(col);
            }
        }
        self.records.extend(other.records);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ResaleDataset – the enriched, immutable snapshot
// ---------------------------------------------------------------------------

/// An enriched dataset as handed to the filter engine and the UI.
#[derive(Debug, Clone, Default)]
pub struct ResaleDataset {
    /// Source column names in file order (derived columns excluded).
    pub source_columns: Vec<String>,
    pub records: Vec<EnrichedRecord>,
}

impl ResaleDataset {
    /// Enrich every record of a loaded table.
    pub fn from_raw(table: RawTable) -> Self {
        ResaleDataset {
            source_columns: table.columns,
            records: super::enrich::enrich_all(table.records),
        }
    }

    /// Full enriched schema: source columns, then derived columns.
    pub fn column_names(&self) -> Vec<String> {
        self.source_columns
            .iter()
            .cloned()
            .chain(
                DERIVED_COLUMNS
                    .iter()
                    .filter(|d| !self.source_columns.iter().any(|c| c == *d))
                    .map(|d| d.to_string()),
            )
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
