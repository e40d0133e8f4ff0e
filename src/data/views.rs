//! View builders: the filter / join / normalize pipeline that turns the
//! loaded relations into chart-ready tables.
//!
//! Every builder is a pure function over immutable slices: it never mutates
//! the dataset, and a failing view cannot corrupt a sibling. The UI re-runs
//! [`DashboardViews::build`] on every selection change.

use std::collections::{BTreeMap, BTreeSet};

use super::model::{
    distinct_in_order, IndustryWage, NationalWage, PrefPoint, PrefectureWage, WageDataset,
    WageMetric, AGE_COL, AGE_TOTAL, PREF_COL, YEAR_COL,
};

/// The heatmap is pinned to this aggregation year.
pub const HEATMAP_YEAR: u16 = 2019;

/// Cosmetic headroom added above the largest bar so the longest bar does not
/// touch the plot edge.
pub const BAR_AXIS_MARGIN: f64 = 50.0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A view builder failure. Fatal for the affected view only; the dashboard
/// shows the diagnostic in place of the chart instead of rendering an empty
/// one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// A join matched no rows at all, which points at a key-format mismatch
    /// between the input files rather than at the current selection.
    #[error("{view}: join on '{key}' matched no rows")]
    JoinMismatch { view: &'static str, key: String },

    /// A filter left zero rows for the current selection.
    #[error("{view}: no rows where {filter}")]
    EmptySelection { view: &'static str, filter: String },

    /// Min-max scaling over fewer than two distinct values.
    #[error("min-max range is degenerate (all values equal)")]
    DegenerateRange,
}

// ---------------------------------------------------------------------------
// Min-max scaling
// ---------------------------------------------------------------------------

/// Rescale `values` linearly so the minimum maps to 0.0 and the maximum to
/// 1.0. Fewer than two distinct values leave no usable denominator and
/// return [`ViewError::DegenerateRange`]; the caller decides the fallback.
pub fn min_max_scale(values: &[f64]) -> Result<Vec<f64>, ViewError> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    // The negated comparison also rejects the empty slice and NaN input.
    if !(range > f64::EPSILON) {
        return Err(ViewError::DegenerateRange);
    }
    Ok(values.iter().map(|v| (v - min) / range).collect())
}

// ---------------------------------------------------------------------------
// Heatmap view
// ---------------------------------------------------------------------------

/// One prefecture of the heatmap table: coordinates plus raw and normalized
/// wage for the pinned year.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRow {
    pub prefecture: String,
    pub lat: f64,
    pub lon: f64,
    pub wage: f64,
    /// `wage` min-max scaled over the filtered subset; the heatmap weight.
    pub relative_wage: f64,
}

/// Filter the prefecture relation to (aggregate age, `year`), join the geo
/// lookup on the prefecture name, and normalize the wage column.
///
/// Wage rows without coordinates are dropped with a warning: the lookup
/// table is authoritative, but a silent drop would be indistinguishable from
/// missing source data. A degenerate wage range falls back to 0.0 weights.
pub fn build_heatmap(
    prefecture: &[PrefectureWage],
    geo: &[PrefPoint],
    year: u16,
) -> Result<Vec<HeatmapRow>, ViewError> {
    let coords: BTreeMap<&str, (f64, f64)> = geo
        .iter()
        .map(|p| (p.prefecture.as_str(), (p.lat, p.lon)))
        .collect();

    let filtered: Vec<&PrefectureWage> = prefecture
        .iter()
        .filter(|r| r.age == AGE_TOTAL && r.year == year)
        .collect();
    if filtered.is_empty() {
        return Err(ViewError::EmptySelection {
            view: "heatmap",
            filter: format!("{AGE_COL} == {AGE_TOTAL} && {YEAR_COL} == {year}"),
        });
    }

    let mut rows = Vec::with_capacity(filtered.len());
    for r in filtered {
        match coords.get(r.prefecture.as_str()) {
            Some(&(lat, lon)) => rows.push(HeatmapRow {
                prefecture: r.prefecture.clone(),
                lat,
                lon,
                wage: r.wage,
                relative_wage: 0.0,
            }),
            None => log::warn!("heatmap: no coordinates for {}, row dropped", r.prefecture),
        }
    }
    if rows.is_empty() {
        return Err(ViewError::JoinMismatch {
            view: "heatmap",
            key: PREF_COL.to_string(),
        });
    }

    let wages: Vec<f64> = rows.iter().map(|r| r.wage).collect();
    match min_max_scale(&wages) {
        Ok(scaled) => {
            for (row, weight) in rows.iter_mut().zip(scaled) {
                row.relative_wage = weight;
            }
        }
        Err(ViewError::DegenerateRange) => {
            log::warn!("heatmap: all wages equal, relative weights set to 0");
        }
        Err(e) => return Err(e),
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Trend view
// ---------------------------------------------------------------------------

/// One year of the national vs. selected-prefecture comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub year: u16,
    /// National per-capita wage (the disambiguated `全国_…` column).
    pub national: f64,
    /// Per-capita wage of the selected prefecture.
    pub prefecture: f64,
}

/// Join the cached national totals with the selected prefecture's aggregate
/// rows on the year, sorted ascending.
///
/// `national_totals` must already be filtered to the aggregate age rows;
/// [`WageDataset`] derives that slice once at load time because it does not
/// depend on the selection.
pub fn build_trend(
    national_totals: &[NationalWage],
    prefecture: &[PrefectureWage],
    selected: &str,
) -> Result<Vec<TrendRow>, ViewError> {
    let national_by_year: BTreeMap<u16, f64> =
        national_totals.iter().map(|r| (r.year, r.wage)).collect();

    let local: Vec<&PrefectureWage> = prefecture
        .iter()
        .filter(|r| r.age == AGE_TOTAL && r.prefecture == selected)
        .collect();
    if local.is_empty() {
        return Err(ViewError::EmptySelection {
            view: "trend",
            filter: format!("{PREF_COL} == {selected}"),
        });
    }

    let mut rows: Vec<TrendRow> = local
        .iter()
        .filter_map(|r| {
            national_by_year.get(&r.year).map(|&national| TrendRow {
                year: r.year,
                national,
                prefecture: r.wage,
            })
        })
        .collect();
    if rows.is_empty() {
        return Err(ViewError::JoinMismatch {
            view: "trend",
            key: YEAR_COL.to_string(),
        });
    }
    rows.sort_by_key(|r| r.year);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Bubble view
// ---------------------------------------------------------------------------

/// Per-age-bracket national rows plus the animation frames (years).
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleTable {
    pub rows: Vec<NationalWage>,
    /// Distinct aggregation years, ascending. One animation frame per year.
    pub years: Vec<u16>,
}

impl BubbleTable {
    /// Rows of one animation frame.
    pub fn rows_for_year(&self, year: u16) -> impl Iterator<Item = &NationalWage> + '_ {
        self.rows.iter().filter(move |r| r.year == year)
    }

    /// Largest base salary across all frames. Bubble sizes are scaled
    /// against this so a bracket's size is comparable between years.
    pub fn max_base_pay(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.base_pay)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Keep exactly the per-age-bracket national rows, excluding the aggregate.
pub fn build_bubble(national: &[NationalWage]) -> Result<BubbleTable, ViewError> {
    let rows: Vec<NationalWage> = national
        .iter()
        .filter(|r| r.age != AGE_TOTAL)
        .cloned()
        .collect();
    if rows.is_empty() {
        return Err(ViewError::EmptySelection {
            view: "bubble",
            filter: format!("{AGE_COL} != {AGE_TOTAL}"),
        });
    }
    let years: Vec<u16> = rows
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<u16>>()
        .into_iter()
        .collect();
    Ok(BubbleTable { rows, years })
}

// ---------------------------------------------------------------------------
// Industry bar view
// ---------------------------------------------------------------------------

/// Industry rows of the selected year with the frame and axis metadata the
/// bar chart needs.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryBars {
    pub rows: Vec<IndustryWage>,
    /// Distinct age labels of the filtered rows in source order, aggregate
    /// included. One animation frame per label.
    pub ages: Vec<String>,
    /// Distinct industry names in source order; fixes bar positions and
    /// colors across frames.
    pub industries: Vec<String>,
    pub metric: WageMetric,
    /// Upper bound of the value axis, stable across all age frames.
    pub x_max: f64,
}

impl IndustryBars {
    /// Rows of one animation frame.
    pub fn rows_for_age<'a>(&'a self, age: &'a str) -> impl Iterator<Item = &'a IndustryWage> + 'a {
        self.rows.iter().filter(move |r| r.age == age)
    }
}

/// Filter the industry relation to the selected year and derive the value
/// axis bound for the selected metric.
pub fn build_industry_bars(
    industry: &[IndustryWage],
    year: u16,
    metric: WageMetric,
) -> Result<IndustryBars, ViewError> {
    let rows: Vec<IndustryWage> = industry.iter().filter(|r| r.year == year).cloned().collect();
    if rows.is_empty() {
        return Err(ViewError::EmptySelection {
            view: "industry bars",
            filter: format!("{YEAR_COL} == {year}"),
        });
    }

    let max = rows
        .iter()
        .map(|r| r.metric(metric))
        .fold(f64::NEG_INFINITY, f64::max);
    let ages = distinct_in_order(rows.iter().map(|r| r.age.as_str()));
    let industries = distinct_in_order(rows.iter().map(|r| r.industry.as_str()));

    Ok(IndustryBars {
        rows,
        ages,
        industries,
        metric,
        x_max: max + BAR_AXIS_MARGIN,
    })
}

// ---------------------------------------------------------------------------
// Selection state and the full rebuild
// ---------------------------------------------------------------------------

/// The user-facing pipeline parameters. Everything else a view builder
/// consumes comes from the loaded dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    /// Prefecture of the trend view.
    pub prefecture: String,
    /// Aggregation year of the industry bar view.
    pub year: u16,
    /// Wage column of the industry bar view.
    pub metric: WageMetric,
}

impl Selection {
    /// First entry of each selection list, the state right after a load.
    pub fn defaults(dataset: &WageDataset) -> Self {
        Selection {
            prefecture: dataset.prefecture_names.first().cloned().unwrap_or_default(),
            year: dataset
                .industry_years
                .first()
                .copied()
                .unwrap_or(HEATMAP_YEAR),
            metric: WageMetric::default(),
        }
    }
}

/// The four chart-ready tables of one pipeline run. Each slot carries its
/// own result so one failing view leaves the siblings intact.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub heatmap: Result<Vec<HeatmapRow>, ViewError>,
    pub trend: Result<Vec<TrendRow>, ViewError>,
    pub bubble: Result<BubbleTable, ViewError>,
    pub industry: Result<IndustryBars, ViewError>,
}

impl DashboardViews {
    /// Run the whole pipeline against the loaded relations and the current
    /// selection. Pure: the dataset is only read.
    pub fn build(dataset: &WageDataset, selection: &Selection) -> Self {
        DashboardViews {
            heatmap: build_heatmap(&dataset.prefecture, &dataset.geo, HEATMAP_YEAR),
            trend: build_trend(
                &dataset.national_totals,
                &dataset.prefecture,
                &selection.prefecture,
            ),
            bubble: build_bubble(&dataset.national),
            industry: build_industry_bars(&dataset.industry, selection.year, selection.metric),
        }
    }
}
