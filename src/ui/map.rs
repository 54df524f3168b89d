use eframe::egui::{vec2, Align2, CornerRadius, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Map panel – region outline plus the active layer list
// ---------------------------------------------------------------------------

const MAP_HEIGHT: f32 = 260.0;
const MAP_PADDING: f32 = 12.0;

/// Draw the region boundary scaled into the available rect.
pub fn region_map(ui: &mut Ui, state: &AppState) {
    let desired = vec2(ui.available_width(), MAP_HEIGHT);
    let (response, painter) = ui.allocate_painter(desired, Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, CornerRadius::same(4), ui.visuals().extreme_bg_color);

    let (min_lon, min_lat, max_lon, max_lat) = state.region.bbox();
    let lon_span = max_lon - min_lon;
    let lat_span = max_lat - min_lat;
    if !(lon_span > 0.0 && lat_span > 0.0) {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "degenerate region boundary",
            FontId::proportional(13.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    // Uniform scale, latitude flipped (north is up, screen y grows down).
    let inner_w = (rect.width() - 2.0 * MAP_PADDING) as f64;
    let inner_h = (rect.height() - 2.0 * MAP_PADDING) as f64;
    let scale = (inner_w / lon_span).min(inner_h / lat_span);
    let offset_x = rect.left() as f64 + MAP_PADDING as f64 + (inner_w - lon_span * scale) / 2.0;
    let offset_y = rect.top() as f64 + MAP_PADDING as f64 + (inner_h - lat_span * scale) / 2.0;

    let project = |lon: f64, lat: f64| -> Pos2 {
        Pos2 {
            x: (offset_x + (lon - min_lon) * scale) as f32,
            y: (offset_y + (max_lat - lat) * scale) as f32,
        }
    };

    let stroke = Stroke::new(2.0, ui.visuals().strong_text_color());
    for ring in state.region.rings() {
        if ring.len() < 3 {
            continue;
        }
        let points: Vec<Pos2> = ring.iter().map(|&[lon, lat]| project(lon, lat)).collect();
        painter.add(Shape::closed_line(points, stroke));
    }

    painter.text(
        rect.left_top() + vec2(8.0, 8.0),
        Align2::LEFT_TOP,
        state.region.name(),
        FontId::proportional(13.0),
        ui.visuals().text_color(),
    );
}

/// List the named layers the map surface would draw, one per (class, year).
pub fn layer_list(ui: &mut Ui, state: &AppState) {
    let layers = state.layers();
    if layers.is_empty() {
        return;
    }
    ui.label(format!("{} layers:", layers.len()));
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for layer in &layers {
            ui.label(RichText::new(format!("■ {}", layer.name)).color(layer.color))
                .on_hover_text(format!("class {} masked in band {}", layer.code, layer.year));
        }
    });
}
