use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::region::RegionBoundary;
use crate::data::selection::MAX_YEARS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – class and year filters
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Snapshot the legend so we can mutate state inside the loops.
    let classes: Vec<(u16, String, Color32)> = state
        .catalog
        .codes()
        .map(|code| {
            (
                code,
                state.catalog.name_or_unknown(code),
                state.catalog.color_of(code),
            )
        })
        .collect();
    let years = state.config.years();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Class filter ----
            let header = format!(
                "Classes  ({}/{})",
                state.selection.classes.len(),
                classes.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("class_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_classes();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_classes();
                        }
                    });

                    for (code, name, color) in &classes {
                        let mut checked = state.selection.classes.contains(code);
                        let label = RichText::new(name).color(*color);
                        if ui.checkbox(&mut checked, label).changed() {
                            state.toggle_class(*code);
                        }
                    }
                });

            // ---- Year filter ----
            let header = format!("Years  ({}/{})", state.selection.years.len(), years.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("year_filter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!("Select up to {MAX_YEARS} years."));
                    for year in &years {
                        let mut checked = state.selection.years.contains(year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(*year);
                        }
                    }
                });

            ui.separator();

            // ---- All-classes histogram path ----
            let mut show_all = state.show_all_classes;
            if ui
                .checkbox(&mut show_all, "Show all classes (stacked bars)")
                .changed()
            {
                state.set_show_all_classes(show_all);
            }

            if state.show_all_classes {
                egui::CollapsingHeader::new(RichText::new("Bar chart classes").strong())
                    .id_salt("bar_filter")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for (code, name, color) in &classes {
                            let mut checked = state.bar_classes.contains(code);
                            let label = RichText::new(name).color(*color);
                            if ui.checkbox(&mut checked, label).changed() {
                                state.toggle_bar_class(*code);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open region…").clicked() {
                open_region_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.region.name().to_string());

        ui.separator();
        ui.label(format!(
            "{} classes · {} years · {} records",
            state.selection.classes.len(),
            state.selection.years.len(),
            state.records.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Region file dialog
// ---------------------------------------------------------------------------

pub fn open_region_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open region boundary")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        match RegionBoundary::from_path(&path) {
            Ok(region) => {
                log::info!(
                    "loaded region '{}' with {} rings",
                    region.name(),
                    region.rings().len()
                );
                state.set_region(region);
            }
            Err(e) => {
                log::error!("failed to load region: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
