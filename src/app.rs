use eframe::egui::{self, ScrollArea};

use crate::data::model::total_for_year;
use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LandLensApp {
    pub state: AppState,
}

impl LandLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LandLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Blocking recompute when the selection changed last frame. Every
        // remote call is memoized, so unchanged pairs cost nothing.
        self.state.refresh_if_dirty();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map, charts, tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    map::region_map(ui, &self.state);
                    map::layer_list(ui, &self.state);

                    ui.separator();
                    ui.heading("Area evolution of the selected classes");
                    plot::area_evolution_plot(ui, &self.state);
                    table::area_table(ui, &self.state.records);

                    if self.state.show_all_classes {
                        ui.separator();
                        ui.heading("Area distribution across all classes");
                        plot::class_distribution_bars(ui, &self.state);
                        table::histogram_table(ui, &self.state.all_class_records);

                        if !self.state.all_class_records.is_empty() {
                            for year in self.state.selection.years() {
                                let total =
                                    total_for_year(&self.state.all_class_records, year);
                                ui.label(format!("{year}: {total:.2} km² in total"));
                            }
                        }
                    }
                });
        });
    }
}
