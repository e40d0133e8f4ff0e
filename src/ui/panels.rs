use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::data::model::{
    WageMetric, GEO_LAT_COL, GEO_LON_COL, PREF_COL, RELATIVE_WAGE_COL, WAGE_COL,
};
use crate::data::views::{HeatmapRow, ViewError, HEATMAP_YEAR};
use crate::state::{AnimState, AppState};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_data_folder(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} national / {} industry / {} prefecture rows, {} geo points",
                ds.national.len(),
                ds.industry.len(),
                ds.prefecture.len(),
                ds.geo.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn open_data_folder(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Open data folder")
        .pick_folder();

    if let Some(dir) = dir {
        state.load_from(&dir);
    }
}

// ---------------------------------------------------------------------------
// Left side panel – selections and playback
// ---------------------------------------------------------------------------

/// Render the control panel. Selection clicks re-run the whole pipeline;
/// the playback widgets only touch display state.
pub fn control_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone the small selection lists so the click handlers below are free
    // to borrow state mutably.
    let prefectures = state
        .dataset
        .as_ref()
        .map(|ds| ds.prefecture_names.clone())
        .unwrap_or_default();
    let years = state
        .dataset
        .as_ref()
        .map(|ds| ds.industry_years.clone())
        .unwrap_or_default();
    let bubble_years: Vec<u16> = state
        .views
        .as_ref()
        .and_then(|v| v.bubble.as_ref().ok())
        .map(|b| b.years.clone())
        .unwrap_or_default();
    let bar_ages: Vec<String> = state
        .views
        .as_ref()
        .and_then(|v| v.industry.as_ref().ok())
        .map(|b| b.ages.clone())
        .unwrap_or_default();

    let mut pick_pref: Option<String> = None;
    let mut pick_year: Option<u16> = None;
    let mut pick_metric: Option<WageMetric> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Pipeline selections ----
            ui.strong("都道府県");
            egui::ComboBox::from_id_salt("prefecture")
                .selected_text(state.selection.prefecture.clone())
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &prefectures {
                        if ui
                            .selectable_label(state.selection.prefecture == *name, name)
                            .clicked()
                        {
                            pick_pref = Some(name.clone());
                        }
                    }
                });
            ui.add_space(8.0);

            ui.strong("集計年");
            egui::ComboBox::from_id_salt("year")
                .selected_text(state.selection.year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for &year in &years {
                        if ui
                            .selectable_label(state.selection.year == year, year.to_string())
                            .clicked()
                        {
                            pick_year = Some(year);
                        }
                    }
                });
            ui.add_space(8.0);

            ui.strong("賃金の種類");
            egui::ComboBox::from_id_salt("metric")
                .selected_text(state.selection.metric.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for metric in WageMetric::ALL {
                        if ui
                            .selectable_label(state.selection.metric == metric, metric.label())
                            .clicked()
                        {
                            pick_metric = Some(metric);
                        }
                    }
                });
            ui.add_space(8.0);
            ui.separator();

            // ---- Display toggles ----
            ui.checkbox(&mut state.show_heatmap_table, "Show DataFrame");
            if ui.button("Recenter map").clicked() {
                state.recenter_heatmap = true;
            }
            ui.separator();

            // ---- Playback ----
            ui.strong("Animation");
            ui.add_space(4.0);
            ui.label("年齢階級別バブル（集計年）");
            anim_controls(ui, &mut state.bubble_anim, bubble_years.len(), |i| {
                bubble_years[i].to_string()
            });
            ui.add_space(4.0);
            ui.label("産業別バー（年齢）");
            anim_controls(ui, &mut state.bar_anim, bar_ages.len(), |i| {
                bar_ages[i].clone()
            });
        });

    if let Some(name) = pick_pref {
        state.set_prefecture(name);
    }
    if let Some(year) = pick_year {
        state.set_year(year);
    }
    if let Some(metric) = pick_metric {
        state.set_metric(metric);
    }
}

/// Play/pause button, frame slider, and current-frame label for one chart.
fn anim_controls(ui: &mut Ui, anim: &mut AnimState, frames: usize, label: impl Fn(usize) -> String) {
    if frames == 0 {
        ui.weak("—");
        return;
    }
    if anim.frame >= frames {
        anim.frame = 0;
    }
    ui.horizontal(|ui: &mut Ui| {
        let icon = if anim.playing { "⏸" } else { "▶" };
        if ui.button(icon).clicked() {
            anim.toggle();
        }
        ui.add_enabled(
            frames > 1,
            egui::Slider::new(&mut anim.frame, 0..=frames - 1).show_value(false),
        );
        ui.label(label(anim.frame));
    });
}

// ---------------------------------------------------------------------------
// Central panel – the dashboard sections
// ---------------------------------------------------------------------------

/// Render the four chart sections top to bottom. Each section shows either
/// its chart or its own diagnostic, so one failing view never blanks the
/// page.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new("日本の賃金データのダッシュボード").size(24.0).strong());
            ui.add_space(8.0);

            let Some(views) = &state.views else {
                ui.label("データが読み込まれていません（File → Open data folder…）");
                return;
            };
            // Bracket colours come from the dataset-wide list so a bracket
            // keeps its colour across animation frames.
            let age_colors = state
                .dataset
                .as_ref()
                .map(|ds| ColorMap::new(&ds.age_brackets))
                .unwrap_or_else(|| ColorMap::new(&[]));

            ui.heading(format!("■{HEATMAP_YEAR}年：一人当たり平均賃金のヒートマップ"));
            match &views.heatmap {
                Ok(rows) => {
                    plot::heatmap(ui, rows, &mut state.recenter_heatmap);
                    if state.show_heatmap_table {
                        heatmap_table(ui, rows);
                    }
                }
                Err(e) => view_error(ui, e),
            }
            section_gap(ui);

            ui.heading("■集計年別の一人当たり賃金（万円）の推移");
            match &views.trend {
                Ok(rows) => plot::trend(ui, rows, &state.selection.prefecture),
                Err(e) => view_error(ui, e),
            }
            section_gap(ui);

            ui.heading("■年齢階級別の全国一人当たり賃金（万円）");
            match &views.bubble {
                Ok(table) => plot::bubble(ui, table, state.bubble_anim.frame, &age_colors),
                Err(e) => view_error(ui, e),
            }
            section_gap(ui);

            ui.heading("■産業別の賃金推移");
            match &views.industry {
                Ok(bars) => {
                    let industry_colors = ColorMap::new(&bars.industries);
                    plot::industry_bars(ui, bars, state.bar_anim.frame, &industry_colors);
                }
                Err(e) => view_error(ui, e),
            }

            ui.add_space(16.0);
            ui.weak("出典：RESAS（地域経済分析システム）");
            ui.weak("本結果はRESAS（地域経済分析システム）を加工して作成");
        });
}

fn section_gap(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);
}

fn view_error(ui: &mut Ui, err: &ViewError) {
    ui.label(RichText::new(err.to_string()).color(Color32::RED));
}

/// The joined heatmap relation as a table, normalized column included.
fn heatmap_table(ui: &mut Ui, rows: &[HeatmapRow]) {
    ui.add_space(4.0);
    ui.push_id("heatmap_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(70.0))
            .column(Column::auto().at_least(70.0))
            .column(Column::auto().at_least(150.0))
            .column(Column::remainder())
            .max_scroll_height(240.0)
            .header(20.0, |mut header| {
                for title in [PREF_COL, GEO_LAT_COL, GEO_LON_COL, WAGE_COL, RELATIVE_WAGE_COL] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(18.0, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(&row.prefecture);
                        });
                        table_row.col(|ui| {
                            ui.label(format!("{:.5}", row.lat));
                        });
                        table_row.col(|ui| {
                            ui.label(format!("{:.5}", row.lon));
                        });
                        table_row.col(|ui| {
                            ui.label(format!("{:.1}", row.wage));
                        });
                        table_row.col(|ui| {
                            ui.label(format!("{:.3}", row.relative_wage));
                        });
                    });
                }
            });
    });
}
