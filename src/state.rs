use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::data::loader;
use crate::data::model::{WageDataset, WageMetric};
use crate::data::views::{DashboardViews, Selection};

/// Cadence of the bubble and bar chart animations.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(600);

// ---------------------------------------------------------------------------
// Animation playback
// ---------------------------------------------------------------------------

/// Playback state of one animated chart. Display state only: advancing a
/// frame never rebuilds the pipeline.
#[derive(Debug, Clone, Default)]
pub struct AnimState {
    /// Index into the chart's frame list.
    pub frame: usize,
    pub playing: bool,
    last_advance: Option<Instant>,
}

impl AnimState {
    /// Flip play/pause. The next tick re-arms the cadence so resuming does
    /// not jump a frame immediately.
    pub fn toggle(&mut self) {
        self.playing = !self.playing;
        self.last_advance = None;
    }

    /// Advance to the next frame when one is due, wrapping at the end.
    /// Returns true when the frame moved.
    pub fn tick(&mut self, frames: usize, now: Instant) -> bool {
        if self.frame >= frames {
            self.frame = 0;
        }
        if !self.playing || frames < 2 {
            self.last_advance = None;
            return false;
        }
        match self.last_advance {
            None => {
                self.last_advance = Some(now);
                false
            }
            Some(prev) if now.duration_since(prev) >= FRAME_INTERVAL => {
                self.frame = (self.frame + 1) % frames;
                self.last_advance = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Selection changes re-run
/// the whole view pipeline; everything else is display state.
pub struct AppState {
    /// Directory holding `csv_data/` and the geo lookup.
    pub data_dir: PathBuf,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<WageDataset>,

    /// Current pipeline parameters.
    pub selection: Selection,

    /// Result of the last full pipeline run, one slot per chart.
    pub views: Option<DashboardViews>,

    /// "Show DataFrame": reveal the joined heatmap table.
    pub show_heatmap_table: bool,

    /// One-shot request to snap the heatmap back to its initial viewpoint.
    pub recenter_heatmap: bool,

    pub bubble_anim: AnimState,
    pub bar_anim: AnimState,

    /// Load error shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            dataset: None,
            selection: Selection::default(),
            views: None,
            show_heatmap_table: false,
            recenter_heatmap: true,
            bubble_anim: AnimState::default(),
            bar_anim: AnimState::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load the four relations from `dir` and rebuild every view. On failure
    /// the previous dataset stays usable and the error lands in the status
    /// line.
    pub fn load_from(&mut self, dir: &Path) {
        self.data_dir = dir.to_path_buf();
        match loader::load_dataset(dir) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                let e = anyhow::Error::new(e)
                    .context(format!("failed to load wage data from {}", dir.display()));
                log::error!("{e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-read the current data directory.
    pub fn reload(&mut self) {
        let dir = self.data_dir.clone();
        self.load_from(&dir);
    }

    /// Ingest a loaded dataset: reset the selection to its defaults, rewind
    /// the animations, and run the pipeline once.
    pub fn set_dataset(&mut self, dataset: WageDataset) {
        self.selection = Selection::defaults(&dataset);
        self.dataset = Some(dataset);
        self.bubble_anim = AnimState::default();
        self.bar_anim = AnimState::default();
        self.recenter_heatmap = true;
        self.status_message = None;
        self.rebuild_views();
    }

    /// Re-run the whole pipeline against the current selection.
    pub fn rebuild_views(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.views = Some(DashboardViews::build(dataset, &self.selection));
        }
    }

    /// Select the trend view's prefecture.
    pub fn set_prefecture(&mut self, name: String) {
        if self.selection.prefecture != name {
            self.selection.prefecture = name;
            self.rebuild_views();
        }
    }

    /// Select the industry bar view's year. The frame list changes with the
    /// year, so the bar animation rewinds.
    pub fn set_year(&mut self, year: u16) {
        if self.selection.year != year {
            self.selection.year = year;
            self.bar_anim.frame = 0;
            self.rebuild_views();
        }
    }

    /// Select the industry bar view's wage column.
    pub fn set_metric(&mut self, metric: WageMetric) {
        if self.selection.metric != metric {
            self.selection.metric = metric;
            self.rebuild_views();
        }
    }

    /// Bubble animation frame count (one per year).
    pub fn bubble_frames(&self) -> usize {
        self.views
            .as_ref()
            .and_then(|v| v.bubble.as_ref().ok())
            .map_or(0, |b| b.years.len())
    }

    /// Bar animation frame count (one per age label of the selected year).
    pub fn bar_frames(&self) -> usize {
        self.views
            .as_ref()
            .and_then(|v| v.industry.as_ref().ok())
            .map_or(0, |b| b.ages.len())
    }

    /// Advance both animations. Returns true while either is actively
    /// playing, so the app knows to keep repainting.
    pub fn tick_animations(&mut self, now: Instant) -> bool {
        let bubble_frames = self.bubble_frames();
        let bar_frames = self.bar_frames();
        self.bubble_anim.tick(bubble_frames, now);
        self.bar_anim.tick(bar_frames, now);
        (self.bubble_anim.playing && bubble_frames > 1)
            || (self.bar_anim.playing && bar_frames > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{IndustryWage, NationalWage, PrefPoint, PrefectureWage, AGE_TOTAL};

    fn national(year: u16, age: &str, wage: f64) -> NationalWage {
        NationalWage {
            year,
            age: age.to_string(),
            wage,
            base_pay: wage * 0.7,
            bonus: wage * 0.2,
        }
    }

    fn pref(year: u16, name: &str, age: &str, wage: f64) -> PrefectureWage {
        PrefectureWage {
            year,
            prefecture: name.to_string(),
            age: age.to_string(),
            wage,
            base_pay: wage * 0.7,
            bonus: wage * 0.2,
        }
    }

    fn industry(year: u16, name: &str, age: &str, wage: f64) -> IndustryWage {
        IndustryWage {
            year,
            industry: name.to_string(),
            age: age.to_string(),
            wage,
            base_pay: wage * 0.7,
            bonus: wage * 0.2,
        }
    }

    fn dataset() -> WageDataset {
        WageDataset::from_tables(
            vec![
                national(2019, AGE_TOTAL, 300.0),
                national(2019, "20～24歳", 250.0),
                national(2020, AGE_TOTAL, 310.0),
                national(2020, "20～24歳", 260.0),
            ],
            vec![
                industry(2019, "建設業", AGE_TOTAL, 400.0),
                industry(2020, "建設業", AGE_TOTAL, 410.0),
            ],
            vec![
                pref(2019, "東京都", AGE_TOTAL, 620.0),
                pref(2019, "青森県", AGE_TOTAL, 320.0),
            ],
            vec![
                PrefPoint {
                    prefecture: "東京都".to_string(),
                    lat: 35.689185,
                    lon: 139.691648,
                },
                PrefPoint {
                    prefecture: "青森県".to_string(),
                    lat: 40.824444,
                    lon: 140.740000,
                },
            ],
        )
    }

    #[test]
    fn set_dataset_applies_defaults_and_builds_views() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.selection.prefecture, "東京都");
        assert_eq!(state.selection.year, 2019);
        let views = state.views.as_ref().unwrap();
        assert!(views.heatmap.is_ok());
        assert!(views.trend.is_ok());
    }

    #[test]
    fn changing_the_prefecture_rebuilds_the_trend() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.set_prefecture("青森県".to_string());
        let trend = state.views.as_ref().unwrap().trend.as_ref().unwrap();
        assert_eq!(trend[0].prefecture, 320.0);
    }

    #[test]
    fn changing_the_year_rewinds_the_bar_animation() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.bar_anim.frame = 1;

        state.set_year(2020);
        assert_eq!(state.bar_anim.frame, 0);
        let bars = state.views.as_ref().unwrap().industry.as_ref().unwrap();
        assert_eq!(bars.rows[0].year, 2020);
    }

    #[test]
    fn load_failure_reports_and_keeps_no_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.load_from(dir.path());
        assert!(state.dataset.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("failed to load wage data"), "got {msg}");
    }

    #[test]
    fn tick_advances_only_after_the_interval() {
        let mut anim = AnimState::default();
        anim.toggle();
        let t0 = Instant::now();

        // First tick arms the cadence, the frame holds.
        assert!(!anim.tick(5, t0));
        assert_eq!(anim.frame, 0);
        assert!(!anim.tick(5, t0 + FRAME_INTERVAL / 2));
        assert!(anim.tick(5, t0 + FRAME_INTERVAL));
        assert_eq!(anim.frame, 1);
    }

    #[test]
    fn tick_wraps_to_the_first_frame() {
        let mut anim = AnimState::default();
        anim.toggle();
        anim.frame = 4;
        let t0 = Instant::now();
        anim.tick(5, t0);
        assert!(anim.tick(5, t0 + FRAME_INTERVAL));
        assert_eq!(anim.frame, 0);
    }

    #[test]
    fn tick_idles_when_paused_or_single_frame() {
        let t0 = Instant::now();

        let mut paused = AnimState::default();
        assert!(!paused.tick(5, t0));
        assert!(!paused.tick(5, t0 + FRAME_INTERVAL * 2));
        assert_eq!(paused.frame, 0);

        let mut single = AnimState::default();
        single.toggle();
        single.tick(1, t0);
        assert!(!single.tick(1, t0 + FRAME_INTERVAL * 2));
        assert_eq!(single.frame, 0);
    }

    #[test]
    fn tick_clamps_a_stale_frame_index() {
        let mut anim = AnimState {
            frame: 9,
            ..AnimState::default()
        };
        anim.tick(3, Instant::now());
        assert_eq!(anim.frame, 0);
    }
}
