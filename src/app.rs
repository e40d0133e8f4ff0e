use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WageDashApp {
    pub state: AppState,
}

impl Default for WageDashApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl WageDashApp {
    /// Create the app and try the fixed relative data layout right away, so
    /// launching from the data directory needs no interaction at all.
    pub fn startup() -> Self {
        let mut app = Self::default();
        app.state.load_from(Path::new("."));
        app
    }
}

impl eframe::App for WageDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let animating = self.state.tick_animations(Instant::now());

        // ---- Top panel: menu bar and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selections and playback ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::control_panel(ui, &mut self.state);
            });

        // ---- Central panel: the four chart sections ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &mut self.state);
        });

        if animating {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// The default egui fonts carry no CJK glyphs, so the Japanese headings and
/// column names would render as boxes. Append the first system font that
/// covers them.
pub fn install_japanese_font(ctx: &egui::Context) {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/ipafont-gothic/ipag.ttf",
        "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
        "C:\\Windows\\Fonts\\meiryo.ttc",
        "C:\\Windows\\Fonts\\msgothic.ttc",
    ];

    for path in CANDIDATES {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("japanese".to_owned(), egui::FontData::from_owned(bytes).into());
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts
                .families
                .entry(family)
                .or_default()
                .push("japanese".to_owned());
        }
        ctx.set_fonts(fonts);
        log::info!("Japanese glyphs provided by {path}");
        return;
    }
    log::warn!("no Japanese system font found; CJK labels will render as boxes");
}
