//! Summary views drawn by the dashboard charts.
//!
//! Each function returns `None` when there is nothing to draw, so the
//! caller can show a "no data" note instead of an empty chart.

use std::collections::BTreeMap;

use super::model::EnrichedRecord;

/// Mean resale price per month, ascending by month.
pub fn mean_price_by_month<'a>(
    records: impl IntoIterator<Item = &'a EnrichedRecord>,
) -> Option<Vec<(String, f64)>> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        if let Some(price) = r.raw.resale_price {
            let entry = sums.entry(r.raw.month.as_str()).or_default();
            entry.0 += price;
            entry.1 += 1;
        }
    }
    if sums.is_empty() {
        return None;
    }
    Some(
        sums.into_iter()
            .map(|(month, (sum, n))| (month.to_string(), sum / n as f64))
            .collect(),
    )
}

/// Number of transactions per town, most active town first.
/// Ties are broken by town name.
pub fn count_by_town<'a>(
    records: impl IntoIterator<Item = &'a EnrichedRecord>,
) -> Option<Vec<(String, usize)>> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.raw.town.as_str()).or_default() += 1;
    }
    if counts.is_empty() {
        return None;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(town, n)| (town.to_string(), n))
        .collect();
    // Stable sort keeps the alphabetical order among equal counts.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    Some(out)
}

// ---------------------------------------------------------------------------
// Box-plot statistics
// ---------------------------------------------------------------------------

/// Five-number summary plus Tukey whiskers (1.5 × IQR) for one flat type.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDistribution {
    pub flat_type: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl PriceDistribution {
    /// `None` for an empty sample.
    fn from_prices(flat_type: String, mut prices: Vec<f64>) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        prices.sort_by(f64::total_cmp);

        let q1 = percentile(&prices, 0.25);
        let median = percentile(&prices, 0.5);
        let q3 = percentile(&prices, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let lower_whisker = prices
            .iter()
            .copied()
            .find(|&p| p >= lo_fence)
            .unwrap_or(q1);
        let upper_whisker = prices
            .iter()
            .rev()
            .copied()
            .find(|&p| p <= hi_fence)
            .unwrap_or(q3);
        let outliers = prices
            .iter()
            .copied()
            .filter(|&p| p < lo_fence || p > hi_fence)
            .collect();

        Some(PriceDistribution {
            flat_type,
            count: prices.len(),
            min: prices[0],
            q1,
            median,
            q3,
            max: prices[prices.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linearly interpolated percentile of a sorted, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Price distribution per flat type, ordered by flat type.
/// Records without a price are skipped.
pub fn price_distribution_by_flat_type<'a>(
    records: impl IntoIterator<Item = &'a EnrichedRecord>,
) -> Option<Vec<PriceDistribution>> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        if let Some(price) = r.raw.resale_price {
            groups.entry(r.raw.flat_type.as_str()).or_default().push(price);
        }
    }
    let out: Vec<PriceDistribution> = groups
        .into_iter()
        .filter_map(|(ft, prices)| PriceDistribution::from_prices(ft.to_string(), prices))
        .collect();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
