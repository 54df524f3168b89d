use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::AreaRecord;

// ---------------------------------------------------------------------------
// Tabular dumps of the aggregated records
// ---------------------------------------------------------------------------

const HEADER_HEIGHT: f32 = 20.0;
const ROW_HEIGHT: f32 = 18.0;

/// Year / Class / Area table for the per-class records.
pub fn area_table(ui: &mut Ui, records: &[AreaRecord]) {
    if records.is_empty() {
        return;
    }
    ui.push_id("area_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(60.0))
            .column(Column::remainder())
            .column(Column::auto().at_least(100.0))
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("Year");
                });
                header.col(|ui| {
                    ui.strong("Class");
                });
                header.col(|ui| {
                    ui.strong("Area (km²)");
                });
            })
            .body(|mut body| {
                for record in records {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(record.year.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&record.class_name);
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.2}", record.area_km2));
                        });
                    });
                }
            });
    });
}

/// Year / Code / Class / Area table for the all-classes histogram dump.
pub fn histogram_table(ui: &mut Ui, records: &[AreaRecord]) {
    if records.is_empty() {
        return;
    }
    ui.push_id("histogram_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(50.0))
            .column(Column::remainder())
            .column(Column::auto().at_least(100.0))
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("Year");
                });
                header.col(|ui| {
                    ui.strong("Code");
                });
                header.col(|ui| {
                    ui.strong("Class");
                });
                header.col(|ui| {
                    ui.strong("Area (km²)");
                });
            })
            .body(|mut body| {
                for record in records {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(record.year.to_string());
                        });
                        row.col(|ui| {
                            ui.label(record.code.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&record.class_name);
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.2}", record.area_km2));
                        });
                    });
                }
            });
    });
}
