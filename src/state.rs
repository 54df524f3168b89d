use std::collections::BTreeSet;

use eframe::egui::Color32;

use crate::agg::AreaAggregator;
use crate::config::AppConfig;
use crate::data::catalog::ClassCatalog;
use crate::data::model::AreaRecord;
use crate::data::region::RegionBoundary;
use crate::data::selection::Selection;
use crate::service::RasterService;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One raster layer handed to the map surface: the masked pixels of a single
/// class in a single year.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub name: String,
    pub color: Color32,
    pub year: i32,
    pub code: u16,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: ClassCatalog,
    pub region: RegionBoundary,
    aggregator: AreaAggregator,

    /// Current class/year selection.
    pub selection: Selection,

    /// Per-class aggregation of the current selection.
    pub records: Vec<AreaRecord>,

    /// Whether the all-classes histogram path is active.
    pub show_all_classes: bool,

    /// Histogram aggregation of the current selection (all classes).
    pub all_class_records: Vec<AreaRecord>,

    /// Classes included in the stacked bar chart.
    pub bar_classes: BTreeSet<u16>,

    /// Status / warning message shown in the top bar.
    pub status_message: Option<String>,

    /// Selection changed since the last refresh.
    dirty: bool,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        catalog: ClassCatalog,
        region: RegionBoundary,
        service: Box<dyn RasterService>,
    ) -> Self {
        let mut selection = Selection::default();
        // Same starting point as the hosted dashboard: the urban class in the
        // most recent year.
        if catalog.contains(24) {
            selection.toggle_class(24);
        } else if let Some(code) = catalog.codes().next() {
            selection.toggle_class(code);
        }
        selection.toggle_year(config.last_year);

        let bar_classes = catalog.codes().collect();

        Self {
            config,
            catalog,
            region,
            aggregator: AreaAggregator::new(service),
            selection,
            records: Vec::new(),
            show_all_classes: false,
            all_class_records: Vec::new(),
            bar_classes,
            status_message: None,
            dirty: true,
        }
    }

    // ---- selection mutators ----

    pub fn toggle_class(&mut self, code: u16) {
        self.selection.toggle_class(code);
        self.dirty = true;
    }

    pub fn toggle_year(&mut self, year: i32) {
        self.selection.toggle_year(year);
        self.dirty = true;
    }

    pub fn select_no_classes(&mut self) {
        self.selection.classes.clear();
        self.dirty = true;
    }

    pub fn select_all_classes(&mut self) {
        self.selection.classes = self.catalog.codes().collect();
        self.dirty = true;
    }

    pub fn set_show_all_classes(&mut self, show: bool) {
        if self.show_all_classes != show {
            self.show_all_classes = show;
            self.dirty = true;
        }
    }

    pub fn toggle_bar_class(&mut self, code: u16) {
        if !self.bar_classes.remove(&code) {
            self.bar_classes.insert(code);
        }
    }

    /// Swap in a new region boundary; every memoized reduction is stale.
    pub fn set_region(&mut self, region: RegionBoundary) {
        log::info!("region boundary changed to '{}'", region.name());
        self.region = region;
        self.aggregator.clear_cache();
        self.dirty = true;
    }

    // ---- aggregation ----

    /// Recompute aggregations when the selection changed.
    pub fn refresh_if_dirty(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.refresh();
        }
    }

    /// Validate the selection, then run the remote aggregation paths.
    ///
    /// A failed validation performs no remote call and renders no partial
    /// result.
    pub fn refresh(&mut self) {
        self.status_message = None;

        if let Err(error) = self.selection.validate() {
            log::warn!("selection rejected: {error}");
            self.status_message = Some(error.to_string());
            self.records.clear();
            self.all_class_records.clear();
            return;
        }

        let years = self.selection.years();
        let codes = self.selection.known_classes(&self.catalog);

        match self
            .aggregator
            .area_by_class(&years, &codes, &self.catalog, &self.region)
        {
            Ok(records) => self.records = records,
            Err(error) => {
                log::error!("per-class aggregation failed: {error}");
                self.status_message = Some(format!("Service error: {error}"));
                return;
            }
        }

        if self.show_all_classes {
            match self
                .aggregator
                .area_all_classes(&years, &self.catalog, &self.region)
            {
                Ok(records) => self.all_class_records = records,
                Err(error) => {
                    log::error!("histogram aggregation failed: {error}");
                    self.status_message = Some(format!("Service error: {error}"));
                }
            }
        }
    }

    // ---- derived views ----

    /// Layers the map surface should draw for the current selection, one per
    /// (year, class) pair. Empty while the selection is invalid.
    pub fn layers(&self) -> Vec<MapLayer> {
        if self.selection.validate().is_err() {
            return Vec::new();
        }
        let mut layers = Vec::new();
        for year in self.selection.years() {
            for code in self.selection.known_classes(&self.catalog) {
                layers.push(MapLayer {
                    name: format!("{} {year}", self.catalog.name_or_unknown(code)),
                    color: self.catalog.color_of(code),
                    year,
                    code,
                });
            }
        }
        layers
    }

    /// Histogram records passing the bar-chart class filter.
    pub fn bar_records(&self) -> Vec<&AreaRecord> {
        self.all_class_records
            .iter()
            .filter(|r| self.bar_classes.contains(&r.code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::service::testing::MockRaster;

    fn state_with(mock: Rc<MockRaster>) -> AppState {
        AppState::new(
            AppConfig::default(),
            ClassCatalog::builtin(),
            RegionBoundary::builtin(),
            Box::new(mock),
        )
    }

    #[test]
    fn six_selected_years_warn_and_skip_aggregation() {
        let mock = Rc::new(MockRaster::new());
        let mut state = state_with(mock.clone());
        for year in 2018..=2022 {
            state.toggle_year(year);
        }
        assert_eq!(state.selection.years.len(), 6); // 2023 from the default

        state.refresh_if_dirty();

        assert_eq!(mock.total_calls(), 0);
        assert!(state.status_message.as_deref().unwrap_or("").contains("at most 5"));
        assert!(state.records.is_empty());
        assert!(state.layers().is_empty());
    }

    #[test]
    fn default_selection_aggregates_once() {
        let mock = Rc::new(MockRaster::new().with_band(
            "classification_2023",
            &[(24, 1_500.0)],
        ));
        let mut state = state_with(mock.clone());

        state.refresh_if_dirty();
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].code, 24);
        assert!((state.records[0].area_km2 - 1.35).abs() < 1e-9);
        assert!(state.status_message.is_none());

        // nothing changed: no further remote calls
        state.refresh_if_dirty();
        assert_eq!(mock.total_calls(), 1);
    }

    #[test]
    fn layers_are_named_class_then_year() {
        let mut state = state_with(Rc::new(MockRaster::new()));
        state.toggle_class(3);

        let layers = state.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].name, "Forest Formation 2023");
        assert_eq!(layers[1].name, "Urban Area 2023");
    }

    #[test]
    fn service_errors_surface_in_the_status_bar() {
        let mut state = state_with(Rc::new(MockRaster::failing()));
        state.refresh_if_dirty();
        assert!(state
            .status_message
            .as_deref()
            .unwrap_or("")
            .starts_with("Service error"));
    }

    #[test]
    fn bar_filter_restricts_histogram_records() {
        let mock = Rc::new(MockRaster::new().with_band(
            "classification_2023",
            &[(24, 1_000.0), (3, 2_000.0), (7, 10.0)],
        ));
        let mut state = state_with(mock);
        state.set_show_all_classes(true);
        state.refresh_if_dirty();

        // unknown code 7 is listed in the table records…
        assert_eq!(state.all_class_records.len(), 3);
        // …but the bar filter only carries cataloged classes by default
        assert_eq!(state.bar_records().len(), 2);

        state.toggle_bar_class(3);
        assert_eq!(state.bar_records().len(), 1);
    }
}
