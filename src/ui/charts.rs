use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};

use crate::color::{contrast_text, RD_YL_GN};
use crate::present::{
    format_count, format_usd, BarSpec, ChoroplethSpec, HistogramSpec, Panel, PieSpec,
};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn no_data(ui: &mut Ui, message: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(format!("⚠ {message}")).color(Color32::from_rgb(200, 140, 0)));
    ui.add_space(8.0);
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0));
}

// ---------------------------------------------------------------------------
// Top job titles (horizontal bars)
// ---------------------------------------------------------------------------

pub fn top_titles(ui: &mut Ui, panel: &Panel<BarSpec>) {
    let spec = match panel {
        Panel::Ready(spec) => spec,
        Panel::NoData(msg) => return no_data(ui, msg),
    };
    chart_title(ui, &spec.title);

    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.value)
                .width(0.7)
                .fill(b.color)
                .stroke(Stroke::new(0.5, Color32::BLACK))
                .name(&b.label)
        })
        .collect();
    let labels: Vec<String> = spec.bars.iter().map(|b| b.label.clone()).collect();
    let height = (30.0 * spec.bars.len() as f32).max(400.0);

    Plot::new("top_titles_plot")
        .height(height)
        .include_x(0.0)
        .include_x(spec.x_limit)
        .y_axis_min_width(160.0)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .x_axis_formatter(|mark, _range| format_count(mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (i, b) in spec.bars.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(b.value, i as f64), format!(" {}", b.text))
                        .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Salary distribution
// ---------------------------------------------------------------------------

pub fn salary_histogram(ui: &mut Ui, panel: &Panel<HistogramSpec>) {
    let spec = match panel {
        Panel::Ready(spec) => spec,
        Panel::NoData(msg) => return no_data(ui, msg),
    };
    chart_title(ui, spec.title);

    let bars: Vec<Bar> = spec
        .bins
        .iter()
        .map(|bin| {
            Bar::new(bin.center, bin.count as f64)
                .width(bin.width * 0.98)
                .fill(bin.color)
                .stroke(Stroke::new(0.3, Color32::BLACK))
                .name(format!("Faixa: {}", format_usd(bin.center)))
        })
        .collect();

    Plot::new("salary_histogram_plot")
        .height(420.0)
        .x_axis_label(spec.x_title)
        .y_axis_label(spec.y_title)
        .x_axis_formatter(|mark, _range| format_usd(mark.value))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Remote-work mix (donut)
// ---------------------------------------------------------------------------

/// Convex quads approximating the ring between `inner` and `outer` radii from
/// angle `a0` to `a1` (radians, clockwise from 12 o'clock).
pub fn ring_segment(a0: f64, a1: f64, inner: f64, outer: f64) -> Vec<[[f64; 2]; 4]> {
    let steps = (((a1 - a0).abs() / TAU) * 120.0).ceil().max(1.0) as usize;
    let point = |angle: f64, r: f64| {
        let theta = FRAC_PI_2 - angle;
        [r * theta.cos(), r * theta.sin()]
    };
    (0..steps)
        .map(|s| {
            let t0 = a0 + (a1 - a0) * s as f64 / steps as f64;
            let t1 = a0 + (a1 - a0) * (s + 1) as f64 / steps as f64;
            [point(t0, outer), point(t1, outer), point(t1, inner), point(t0, inner)]
        })
        .collect()
}

pub fn remote_mix(ui: &mut Ui, panel: &Panel<PieSpec>) {
    let spec = match panel {
        Panel::Ready(spec) => spec,
        Panel::NoData(msg) => return no_data(ui, msg),
    };
    chart_title(ui, spec.title);

    Plot::new("remote_mix_plot")
        .height(380.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let label_radius = (1.0 + spec.hole) / 2.0;
            let mut start = 0.0;
            for slice in &spec.slices {
                let end = start + slice.share * TAU;
                // Ring segments are concave, so they are filled quad by quad.
                for quad in ring_segment(start, end, spec.hole, 1.0) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(quad.to_vec()))
                            .fill_color(slice.color)
                            .stroke(Stroke::NONE)
                            .name(&slice.label),
                    );
                }

                let theta = FRAC_PI_2 - (start + end) / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(label_radius * theta.cos(), label_radius * theta.sin()),
                        RichText::new(format!("{}\n{:.1}%", slice.label, slice.share * 100.0))
                            .color(contrast_text(slice.color)),
                    )
                    .anchor(Align2::CENTER_CENTER),
                );
                start = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Mean salary per country (choropleth tiles)
// ---------------------------------------------------------------------------

const TILE: egui::Vec2 = egui::vec2(58.0, 36.0);

pub fn country_map(ui: &mut Ui, panel: &Panel<ChoroplethSpec>) {
    let spec = match panel {
        Panel::Ready(spec) => spec,
        Panel::NoData(msg) => return no_data(ui, msg),
    };
    chart_title(ui, &spec.title);

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for region in &spec.regions {
            let (rect, resp) = ui.allocate_exact_size(TILE, Sense::hover());
            let painter = ui.painter();
            painter.rect_filled(rect, 3.0, region.color);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                &region.iso3,
                FontId::proportional(12.0),
                contrast_text(region.color),
            );
            resp.on_hover_text(format!(
                "País: {}\n{}: {}",
                region.iso3,
                spec.value_label,
                format_usd(region.mean)
            ));
        }
    });

    ui.add_space(6.0);
    color_legend(ui, spec);
}

/// Horizontal gradient strip labelled with the scale's min and max.
fn color_legend(ui: &mut Ui, spec: &ChoroplethSpec) {
    const STEPS: usize = 40;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format_usd(spec.min));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(200.0, 12.0), Sense::hover());
        let step_w = rect.width() / STEPS as f32;
        for i in 0..STEPS {
            let x0 = rect.left() + step_w * i as f32;
            let cell = egui::Rect::from_min_size(
                egui::pos2(x0, rect.top()),
                egui::vec2(step_w + 0.5, rect.height()),
            );
            ui.painter()
                .rect_filled(cell, 0.0, RD_YL_GN.sample(i as f64 / (STEPS - 1) as f64));
        }
        ui.label(format_usd(spec.max));
        ui.label(RichText::new(spec.value_label).weak());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_segment_stays_between_radii() {
        let quads = ring_segment(0.0, TAU / 4.0, 0.5, 1.0);
        assert!(quads.len() >= 30);
        for quad in &quads {
            for [x, y] in quad {
                let r = (x * x + y * y).sqrt();
                assert!((0.5 - 1e-9..=1.0 + 1e-9).contains(&r));
                // First quarter, clockwise from 12 o'clock.
                assert!(*x >= -1e-9 && *y >= -1e-9);
            }
        }
    }

    #[test]
    fn ring_segment_starts_at_twelve_o_clock() {
        let quads = ring_segment(0.0, 0.1, 0.5, 1.0);
        let [x, y] = quads[0][0];
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
    }
}
