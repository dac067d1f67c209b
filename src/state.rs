use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use hdb_resale_dashboard::config::DashboardConfig;
use hdb_resale_dashboard::data::cache::DatasetCache;
use hdb_resale_dashboard::data::export::write_csv;
use hdb_resale_dashboard::data::aggregate::{
    count_by_town, mean_price_by_month, price_distribution_by_flat_type, PriceDistribution,
};
use hdb_resale_dashboard::data::filter::{filtered_indices, select, FilterOptions, FilterState};
use hdb_resale_dashboard::data::model::ResaleDataset;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The two views offered in the top bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Recent,
    Full,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Recent, Section::Full];

    pub fn label(self) -> &'static str {
        match self {
            Section::Recent => "2025 Latest Resale Records",
            Section::Full => "View Full Dataset",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Section::Recent => "2025+ Resale Transactions",
            Section::Full => "Full Resale Dataset (2017 onwards)",
        }
    }

    /// Short prefix used in chart titles.
    pub fn prefix(self) -> &'static str {
        match self {
            Section::Recent => "2025+",
            Section::Full => "Full",
        }
    }
}

/// A loaded section: its snapshot, the values it offers and the user's picks.
pub struct SectionView {
    pub dataset: Arc<ResaleDataset>,
    pub options: FilterOptions,
    pub filters: FilterState,
    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,
    /// Chart data over `visible_indices`; `None` means no data.
    pub price_trend: Option<Vec<(String, f64)>>,
    pub town_counts: Option<Vec<(String, usize)>>,
    pub price_distribution: Option<Vec<PriceDistribution>>,
}

impl SectionView {
    fn new(dataset: Arc<ResaleDataset>) -> Self {
        let options = FilterOptions::from_dataset(&dataset);
        let filters = FilterState::all_selected(&options);
        let mut view = SectionView {
            dataset,
            options,
            filters,
            visible_indices: Vec::new(),
            price_trend: None,
            town_counts: None,
            price_distribution: None,
        };
        view.refilter();
        view
    }

    /// Recompute `visible_indices` and the chart data after filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
        let visible = select(&self.dataset, &self.visible_indices);
        self.price_trend = mean_price_by_month(visible.clone());
        self.town_counts = count_by_town(visible.clone());
        self.price_distribution = price_distribution_by_flat_type(visible);
    }
}

enum Slot {
    NotLoaded,
    Ready(SectionView),
    Failed,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    cache: DatasetCache,
    pub section: Section,
    recent: Slot,
    full: Slot,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(&config.historical_path, &config.recent_path);
        Self {
            config,
            cache,
            section: Section::Recent,
            recent: Slot::NotLoaded,
            full: Slot::NotLoaded,
            status_message: None,
        }
    }

    fn slot(&self, section: Section) -> &Slot {
        match section {
            Section::Recent => &self.recent,
            Section::Full => &self.full,
        }
    }

    fn slot_mut(&mut self, section: Section) -> &mut Slot {
        match section {
            Section::Recent => &mut self.recent,
            Section::Full => &mut self.full,
        }
    }

    /// Load the current section's snapshot if it has not been tried yet.
    /// A failed load is not retried until [`AppState::reload`].
    pub fn ensure_loaded(&mut self) {
        let section = self.section;
        if !matches!(self.slot(section), Slot::NotLoaded) {
            return;
        }
        let loaded = match section {
            Section::Recent => self.cache.recent(),
            Section::Full => self.cache.full(),
        };
        let slot = match loaded {
            Ok(dataset) => {
                self.status_message = None;
                Slot::Ready(SectionView::new(dataset))
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", section.label());
                self.status_message = Some(format!("Error: {e}"));
                Slot::Failed
            }
        };
        *self.slot_mut(section) = slot;
    }

    /// The current section, if loaded.
    pub fn view(&self) -> Option<&SectionView> {
        match self.slot(self.section) {
            Slot::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut SectionView> {
        match self.slot_mut(self.section) {
            Slot::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
        self.ensure_loaded();
    }

    /// Forget every snapshot and filter; reload the current section.
    pub fn reload(&mut self) {
        log::info!("Reloading datasets");
        self.cache.invalidate();
        self.recent = Slot::NotLoaded;
        self.full = Slot::NotLoaded;
        self.ensure_loaded();
    }

    pub fn set_historical_path(&mut self, path: PathBuf) {
        self.cache.set_historical_path(&path);
        self.config.historical_path = path;
        self.full = Slot::NotLoaded;
        self.ensure_loaded();
    }

    pub fn set_recent_path(&mut self, path: PathBuf) {
        self.cache.set_recent_path(&path);
        self.config.recent_path = path;
        self.recent = Slot::NotLoaded;
        self.full = Slot::NotLoaded;
        self.ensure_loaded();
    }

    /// Write the current section's filtered records to `path` as CSV.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let view = self.view().context("no dataset loaded")?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(BufWriter::new(file), &view.dataset, &view.visible_indices)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!(
            "Exported {} records to {}",
            view.visible_indices.len(),
            path.display()
        );
        Ok(view.visible_indices.len())
    }
}
