use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};

use crate::color::{heat_color, ColorMap};
use crate::data::model::{AGE_COL, BONUS_COL, GEO_LAT_COL, GEO_LON_COL, WAGE_COL, YEAR_COL};
use crate::data::views::{BubbleTable, HeatmapRow, IndustryBars, TrendRow};

// ---------------------------------------------------------------------------
// Fixed display parameters
// ---------------------------------------------------------------------------

/// Initial viewpoint of the heatmap: Tokyo, as (lon, lat).
const MAP_CENTER: (f64, f64) = (139.691648, 35.689185);
/// Half-spans of the initial viewpoint; wide enough for Naha and Sapporo.
const MAP_HALF_SPAN: (f64, f64) = (12.5, 9.5);
const HEAT_OPACITY: f32 = 0.4;
/// Weights below this fade toward invisibility instead of dropping out.
const HEAT_THRESHOLD: f64 = 0.3;

const BUBBLE_X_RANGE: (f64, f64) = (150.0, 700.0);
const BUBBLE_Y_RANGE: (f64, f64) = (0.0, 150.0);
/// Display-only cap on the bubble diameter; no data meaning.
const BUBBLE_SIZE_MAX: f32 = 38.0;

const BAR_CANVAS: (f32, f32) = (800.0, 500.0);

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Wage intensity over a lon/lat scatter. `recenter` snaps the view back to
/// the initial viewpoint once and is cleared; pan and zoom stay free
/// otherwise.
pub fn heatmap(ui: &mut Ui, rows: &[HeatmapRow], recenter: &mut bool) {
    Plot::new("heatmap")
        .height(460.0)
        .x_axis_label(GEO_LON_COL)
        .y_axis_label(GEO_LAT_COL)
        .show(ui, |plot_ui| {
            if *recenter {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [MAP_CENTER.0 - MAP_HALF_SPAN.0, MAP_CENTER.1 - MAP_HALF_SPAN.1],
                    [MAP_CENTER.0 + MAP_HALF_SPAN.0, MAP_CENTER.1 + MAP_HALF_SPAN.1],
                ));
                *recenter = false;
            }
            for row in rows {
                let fade = (row.relative_wage / HEAT_THRESHOLD).min(1.0);
                let radius = 4.0 + 16.0 * (row.relative_wage * fade) as f32;
                let c = heat_color(row.relative_wage);
                let color = Color32::from_rgba_unmultiplied(
                    c.r(),
                    c.g(),
                    c.b(),
                    (HEAT_OPACITY * 255.0) as u8,
                );
                plot_ui.points(
                    Points::new(vec![[row.lon, row.lat]])
                        .radius(radius)
                        .color(color)
                        .name(&row.prefecture),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Trend lines
// ---------------------------------------------------------------------------

/// National vs. selected prefecture per-capita wage, by year.
pub fn trend(ui: &mut Ui, rows: &[TrendRow], prefecture: &str) {
    let national: PlotPoints = rows.iter().map(|r| [r.year as f64, r.national]).collect();
    let local: PlotPoints = rows.iter().map(|r| [r.year as f64, r.prefecture]).collect();

    Plot::new("trend")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label(YEAR_COL)
        .y_axis_label(WAGE_COL)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(national).name("全国").width(2.0));
            plot_ui.line(Line::new(local).name(prefecture).width(2.0));
        });
}

// ---------------------------------------------------------------------------
// Bubble chart
// ---------------------------------------------------------------------------

/// One animation frame of the age-bracket bubbles: x wage, y bonus, size
/// base salary, colour bracket. Axis ranges are fixed so the bubbles move
/// against a stable background while the years play.
pub fn bubble(ui: &mut Ui, table: &BubbleTable, frame: usize, colors: &ColorMap) {
    let Some(&year) = table.years.get(frame) else {
        return;
    };
    let size_basis = table.max_base_pay();

    ui.label(RichText::new(format!("{YEAR_COL}: {year}")).strong());
    Plot::new("bubble")
        .height(460.0)
        .legend(Legend::default())
        .x_axis_label(WAGE_COL)
        .y_axis_label(BONUS_COL)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [BUBBLE_X_RANGE.0, BUBBLE_Y_RANGE.0],
                [BUBBLE_X_RANGE.1, BUBBLE_Y_RANGE.1],
            ));
            for row in table.rows_for_year(year) {
                plot_ui.points(
                    Points::new(vec![[row.wage, row.bonus]])
                        .radius(bubble_radius(row.base_pay, size_basis))
                        .color(colors.color_for(&row.age))
                        .name(&row.age),
                );
            }
        });
}

/// Area scaling against the largest base salary of any frame, so a
/// bracket's bubble is comparable between years.
fn bubble_radius(base_pay: f64, basis: f64) -> f32 {
    if basis <= 0.0 {
        return BUBBLE_SIZE_MAX / 2.0;
    }
    (BUBBLE_SIZE_MAX / 2.0) * ((base_pay.max(0.0) / basis).sqrt() as f32)
}

// ---------------------------------------------------------------------------
// Industry bar chart
// ---------------------------------------------------------------------------

/// One age frame of the horizontal industry bars on a fixed 800x500 canvas.
/// Bar positions and colours are keyed to the industry list, so an industry
/// holds its row and colour across frames.
pub fn industry_bars(ui: &mut Ui, bars: &IndustryBars, frame: usize, colors: &ColorMap) {
    let Some(age) = bars.ages.get(frame) else {
        return;
    };
    ui.label(RichText::new(format!("{AGE_COL}: {age}")).strong());

    let industry_count = bars.industries.len();
    let mut chart_bars = Vec::with_capacity(industry_count);
    let mut labels = Vec::with_capacity(industry_count);
    for row in bars.rows_for_age(age) {
        let Some(idx) = bars.industries.iter().position(|name| name == &row.industry) else {
            continue;
        };
        // First industry at the top.
        let y = (industry_count - 1 - idx) as f64;
        chart_bars.push(
            Bar::new(y, row.metric(bars.metric))
                .width(0.6)
                .fill(colors.color_for(&row.industry))
                .name(&row.industry),
        );
        labels.push((y, row.industry.clone()));
    }

    Plot::new("industry_bars")
        .width(BAR_CANVAS.0)
        .height(BAR_CANVAS.1)
        .x_axis_label(bars.metric.label())
        .show_axes([true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [0.0, -0.6],
                [bars.x_max, industry_count as f64 - 0.4],
            ));
            plot_ui.bar_chart(BarChart::new(chart_bars).horizontal());
            for (y, name) in labels {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(bars.x_max * 0.01, y),
                        RichText::new(name).size(11.0),
                    )
                    .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}
