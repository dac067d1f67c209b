use std::collections::BTreeSet;

use super::model::{EnrichedRecord, FloorLevel, LeaseCategory, ResaleDataset};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Label of the town entry meaning "no restriction".
pub const ALL_TOWNS: &str = "All";

/// Single-choice town filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TownSelection {
    #[default]
    All,
    Town(String),
}

impl TownSelection {
    pub fn label(&self) -> &str {
        match self {
            TownSelection::All => ALL_TOWNS,
            TownSelection::Town(t) => t,
        }
    }
}

/// Per-dimension selection state.
///
/// For each multi-value dimension:
/// * `None` → dimension not filtered, every record passes
/// * `Some(empty)` → nothing selected, every record fails
/// * `Some(set)` → the record's value must be in `set`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub town: TownSelection,
    pub flat_types: Option<BTreeSet<String>>,
    pub floor_levels: Option<BTreeSet<FloorLevel>>,
    pub lease_categories: Option<BTreeSet<LeaseCategory>>,
    pub years: Option<BTreeSet<i32>>,
    pub months: Option<BTreeSet<String>>,
}

type Predicate<'a> = Box<dyn Fn(&EnrichedRecord) -> bool + 'a>;

impl FilterState {
    /// Every multi-value dimension fully selected and town set to `All`:
    /// the state a freshly loaded section starts in.
    pub fn all_selected(options: &FilterOptions) -> Self {
        FilterState {
            town: TownSelection::All,
            flat_types: Some(options.flat_types.clone()),
            floor_levels: Some(options.floor_levels.clone()),
            lease_categories: Some(options.lease_categories.clone()),
            years: Some(options.years.clone()),
            months: Some(options.months.clone()),
        }
    }

    /// One predicate per active dimension. Inactive dimensions contribute none.
    fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut preds: Vec<Predicate<'_>> = Vec::new();
        if let TownSelection::Town(town) = &self.town {
            preds.push(Box::new(move |r: &EnrichedRecord| r.raw.town == *town));
        }
        if let Some(set) = &self.flat_types {
            preds.push(Box::new(move |r: &EnrichedRecord| set.contains(&r.raw.flat_type)));
        }
        if let Some(set) = &self.floor_levels {
            preds.push(Box::new(move |r: &EnrichedRecord| set.contains(&r.floor_level_category)));
        }
        if let Some(set) = &self.lease_categories {
            preds.push(Box::new(move |r: &EnrichedRecord| set.contains(&r.lease_category)));
        }
        if let Some(set) = &self.years {
            preds.push(Box::new(move |r: &EnrichedRecord| r.year.is_some_and(|y| set.contains(&y))));
        }
        if let Some(set) = &self.months {
            preds.push(Box::new(move |r: &EnrichedRecord| set.contains(&r.raw.month)));
        }
        preds
    }

    /// Whether a single record passes every active dimension.
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        self.predicates().iter().all(|p| p(record))
    }
}

/// Return indices of records that pass all active filters, in source order.
///
/// Each active dimension narrows the survivors of the previous one; since
/// the predicates are independent membership tests the order is irrelevant.
pub fn filtered_indices(dataset: &ResaleDataset, filters: &FilterState) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..dataset.len()).collect();
    for predicate in filters.predicates() {
        if indices.is_empty() {
            break;
        }
        indices.retain(|&i| predicate(&dataset.records[i]));
    }
    indices
}

/// Borrow the records behind a list of indices.
pub fn select<'a>(
    dataset: &'a ResaleDataset,
    indices: &'a [usize],
) -> impl Iterator<Item = &'a EnrichedRecord> + Clone + 'a {
    indices.iter().map(move |&i| &dataset.records[i])
}

// ---------------------------------------------------------------------------
// Available values per dimension
// ---------------------------------------------------------------------------

/// Sorted unique values of each filter dimension in a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub towns: BTreeSet<String>,
    pub flat_types: BTreeSet<String>,
    pub floor_levels: BTreeSet<FloorLevel>,
    pub lease_categories: BTreeSet<LeaseCategory>,
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<String>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &ResaleDataset) -> Self {
        let mut opts = FilterOptions::default();
        for r in &dataset.records {
            opts.towns.insert(r.raw.town.clone());
            opts.flat_types.insert(r.raw.flat_type.clone());
            opts.floor_levels.insert(r.floor_level_category);
            opts.lease_categories.insert(r.lease_category);
            if let Some(y) = r.year {
                opts.years.insert(y);
            }
            opts.months.insert(r.raw.month.clone());
        }
        opts
    }
}

// ---------------------------------------------------------------------------
// Selection edits used by the side panel
// ---------------------------------------------------------------------------

/// Whether `value` currently passes `selection`.
pub fn is_selected<T: Ord>(selection: &Option<BTreeSet<T>>, value: &T) -> bool {
    selection.as_ref().is_none_or(|set| set.contains(value))
}

/// Flip one value. An untouched dimension starts from everything `available`.
pub fn toggle<T: Ord + Clone>(
    selection: &mut Option<BTreeSet<T>>,
    value: &T,
    available: &BTreeSet<T>,
) {
    let set = selection.get_or_insert_with(|| available.clone());
    if !set.remove(value) {
        set.insert(value.clone());
    }
}

pub fn select_all<T: Ord + Clone>(selection: &mut Option<BTreeSet<T>>, available: &BTreeSet<T>) {
    *selection = Some(available.clone());
}

pub fn select_none<T: Ord>(selection: &mut Option<BTreeSet<T>>) {
    *selection = Some(BTreeSet::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RawTable, ResaleRecord};
    use proptest::prelude::*;

    fn record(town: &str, flat_type: &str, storey: &str, lease: &str, month: &str) -> ResaleRecord {
        ResaleRecord {
            month: month.to_string(),
            town: town.to_string(),
            flat_type: flat_type.to_string(),
            storey_range: Some(storey.to_string()),
            remaining_lease: Some(lease.to_string()),
            resale_price: Some(400_000.0),
            ..Default::default()
        }
    }

    fn dataset(records: Vec<ResaleRecord>) -> ResaleDataset {
        ResaleDataset::from_raw(RawTable {
            columns: vec!["month".into(), "town".into()],
            records,
        })
    }

    fn sample() -> ResaleDataset {
        dataset(vec![
            record("ANG MO KIO", "3 ROOM", "01 TO 03", "58 years 02 months", "2024-01"),
            record("BEDOK", "4 ROOM", "10 TO 12", "75 years 00 months", "2024-02"),
            record("BEDOK", "5 ROOM", "16 TO 18", "92 years", "2025-01"),
            record("YISHUN", "3 ROOM", "bad", "unknown", "2025-02"),
        ])
    }

    #[test]
    fn test_pass_through_returns_everything_in_order() {
        let ds = sample();
        assert_eq!(filtered_indices(&ds, &FilterState::default()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_all_selected_keeps_every_record() {
        let ds = sample();
        let state = FilterState::all_selected(&FilterOptions::from_dataset(&ds));
        assert_eq!(filtered_indices(&ds, &state), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_town_filter() {
        let ds = sample();
        let state = FilterState {
            town: TownSelection::Town("BEDOK".into()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &state), vec![1, 2]);
    }

    #[test]
    fn test_empty_selection_selects_nothing() {
        let ds = sample();
        let mut state = FilterState::default();
        select_none(&mut state.floor_levels);
        assert!(filtered_indices(&ds, &state).is_empty());

        let state = FilterState {
            months: Some(BTreeSet::new()),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &state).is_empty());
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let ds = sample();
        let state = FilterState {
            flat_types: Some(["3 ROOM".to_string(), "5 ROOM".to_string()].into()),
            years: Some([2025].into()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &state), vec![2, 3]);

        let state = FilterState {
            lease_categories: Some([LeaseCategory::Unknown, LeaseCategory::Under60].into()),
            floor_levels: Some([FloorLevel::Low].into()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &state), vec![0]);
    }

    #[test]
    fn test_filter_on_empty_dataset() {
        let ds = dataset(Vec::new());
        let state = FilterState {
            town: TownSelection::Town("BEDOK".into()),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &state).is_empty());
        assert_eq!(FilterOptions::from_dataset(&ds), FilterOptions::default());
    }

    #[test]
    fn test_toggle_from_untouched_dimension() {
        let available: BTreeSet<i32> = [2024, 2025].into();
        let mut sel: Option<BTreeSet<i32>> = None;
        assert!(is_selected(&sel, &2024));

        toggle(&mut sel, &2024, &available);
        assert_eq!(sel, Some([2025].into()));
        toggle(&mut sel, &2024, &available);
        assert_eq!(sel, Some(available.clone()));

        select_none(&mut sel);
        assert!(!is_selected(&sel, &2025));
        select_all(&mut sel, &available);
        assert!(is_selected(&sel, &2025));
    }

    fn arb_record() -> impl Strategy<Value = ResaleRecord> {
        (
            prop::sample::select(vec!["BEDOK", "YISHUN", "TAMPINES"]),
            prop::sample::select(vec!["3 ROOM", "4 ROOM", "EXECUTIVE"]),
            prop::sample::select(vec!["01 TO 03", "07 TO 09", "13 TO 15", "?"]),
            prop::sample::select(vec!["55 years", "65 years", "95 years", ""]),
            prop::sample::select(vec!["2024-06", "2025-01", "bad"]),
        )
            .prop_map(|(t, f, s, l, m)| record(t, f, s, l, m))
    }

    fn arb_state() -> impl Strategy<Value = FilterState> {
        (
            prop::option::of(prop::sample::select(vec!["BEDOK", "YISHUN"])),
            prop::option::of(prop::collection::btree_set(
                prop::sample::select(vec!["3 ROOM".to_string(), "4 ROOM".to_string()]),
                0..3,
            )),
            prop::option::of(prop::collection::btree_set(
                prop::sample::select(FloorLevel::ALL.to_vec()),
                0..4,
            )),
            prop::option::of(prop::collection::btree_set(
                prop::sample::select(LeaseCategory::ALL.to_vec()),
                0..6,
            )),
            prop::option::of(prop::collection::btree_set(2024..2026i32, 0..3)),
            prop::option::of(prop::collection::btree_set(
                prop::sample::select(vec![
                    "2024-06".to_string(),
                    "2025-01".to_string(),
                    "bad".to_string(),
                ]),
                0..4,
            )),
        )
            .prop_map(
                |(town, flat_types, floor_levels, lease_categories, years, months)| FilterState {
                    town: town.map_or(TownSelection::All, |t| TownSelection::Town(t.into())),
                    flat_types,
                    floor_levels,
                    lease_categories,
                    years,
                    months,
                },
            )
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(
            records in prop::collection::vec(arb_record(), 0..40),
            state in arb_state(),
        ) {
            let ds = dataset(records);
            let first = filtered_indices(&ds, &state);
            let narrowed = ResaleDataset {
                source_columns: ds.source_columns.clone(),
                records: select(&ds, &first).cloned().collect(),
            };
            let second = filtered_indices(&narrowed, &state);
            prop_assert_eq!(second, (0..first.len()).collect::<Vec<_>>());
        }

        #[test]
        fn prop_filter_equals_per_record_conjunction(
            records in prop::collection::vec(arb_record(), 0..40),
            state in arb_state(),
        ) {
            let ds = dataset(records);
            let expected: Vec<usize> = ds
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| {
                    let town = match &state.town {
                        TownSelection::All => true,
                        TownSelection::Town(t) => r.raw.town == *t,
                    };
                    town
                        && state.flat_types.as_ref().is_none_or(|s| s.contains(&r.raw.flat_type))
                        && state.floor_levels.as_ref().is_none_or(|s| s.contains(&r.floor_level_category))
                        && state.lease_categories.as_ref().is_none_or(|s| s.contains(&r.lease_category))
                        && state.years.as_ref().is_none_or(|s| r.year.is_some_and(|y| s.contains(&y)))
                        && state.months.as_ref().is_none_or(|s| s.contains(&r.raw.month))
                })
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(filtered_indices(&ds, &state), expected.clone());
            let matched: Vec<usize> = (0..ds.len()).filter(|&i| state.matches(&ds.records[i])).collect();
            prop_assert_eq!(matched, expected);
        }
    }
}
