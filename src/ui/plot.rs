use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::data::model::series_by_class;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Area evolution (line chart)
// ---------------------------------------------------------------------------

/// One line per selected class: x = year, y = area in km².
pub fn area_evolution_plot(ui: &mut Ui, state: &AppState) {
    if state.records.is_empty() {
        ui.label("No aggregated areas yet – pick classes and years on the left.");
        return;
    }

    let series = series_by_class(&state.records);

    Plot::new("area_evolution")
        .height(300.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Area (km²)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (code, records) in &series {
                let color = state.catalog.color_of(*code);
                let name = state.catalog.name_or_unknown(*code);

                let points: PlotPoints = records
                    .iter()
                    .map(|r| [r.year as f64, r.area_km2])
                    .collect();
                plot_ui.line(Line::new(points).name(&name).color(color).width(2.0));

                let markers: PlotPoints = records
                    .iter()
                    .map(|r| [r.year as f64, r.area_km2])
                    .collect();
                plot_ui.points(Points::new(markers).name(&name).color(color).radius(3.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Class distribution (stacked bar chart)
// ---------------------------------------------------------------------------

/// Stacked bars: one column per year, one segment per class.
///
/// egui_plot has no stacking mode, so segments carry cumulative base offsets
/// computed per year.
pub fn class_distribution_bars(ui: &mut Ui, state: &AppState) {
    let records = state.bar_records();
    if records.is_empty() {
        ui.label("No histogram data for the current selection.");
        return;
    }

    let mut offsets: BTreeMap<i32, f64> = BTreeMap::new();
    let mut bars_by_class: BTreeMap<u16, Vec<Bar>> = BTreeMap::new();

    for record in &records {
        let base = offsets.entry(record.year).or_insert(0.0);
        let bar = Bar::new(record.year as f64, record.area_km2)
            .base_offset(*base)
            .width(0.8)
            .fill(state.catalog.color_of(record.code));
        *base += record.area_km2;
        bars_by_class.entry(record.code).or_default().push(bar);
    }

    Plot::new("class_distribution")
        .height(300.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Area (km²)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (code, bars) in bars_by_class {
                let chart = BarChart::new(bars)
                    .name(state.catalog.name_or_unknown(code))
                    .color(state.catalog.color_of(code));
                plot_ui.bar_chart(chart);
            }
        });
}
