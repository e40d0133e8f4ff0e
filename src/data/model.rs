use serde::Deserialize;

// ---------------------------------------------------------------------------
// Source column headers
// ---------------------------------------------------------------------------

// The ministry extracts are joined and filtered by exact header match, so the
// Japanese column names are part of the schema.
pub const YEAR_COL: &str = "集計年";
pub const AGE_COL: &str = "年齢";
pub const WAGE_COL: &str = "一人当たり賃金（万円）";
pub const BASE_PAY_COL: &str = "所定内給与額（万円）";
pub const BONUS_COL: &str = "年間賞与その他特別給与額（万円）";
pub const INDUSTRY_COL: &str = "産業大分類名";
pub const PREF_COL: &str = "都道府県名";

pub const GEO_PREF_COL: &str = "pref_name";
pub const GEO_LAT_COL: &str = "lat";
pub const GEO_LON_COL: &str = "lon";

/// `年齢` value marking the pre-aggregated total across all age brackets.
/// Aggregate views keep exactly this value; per-bracket views exclude it.
pub const AGE_TOTAL: &str = "年齢計";

/// Header of the derived min-max normalized wage column (heatmap table).
pub const RELATIVE_WAGE_COL: &str = "一人当たり賃金（相対値）";

// ---------------------------------------------------------------------------
// Row types – one struct per input relation
// ---------------------------------------------------------------------------

/// One national all-industry row: (year × age bracket).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NationalWage {
    #[serde(rename = "集計年")]
    pub year: u16,
    #[serde(rename = "年齢")]
    pub age: String,
    #[serde(rename = "一人当たり賃金（万円）")]
    pub wage: f64,
    #[serde(rename = "所定内給与額（万円）")]
    pub base_pay: f64,
    #[serde(rename = "年間賞与その他特別給与額（万円）")]
    pub bonus: f64,
}

/// One national per-industry row: (year × industry major category × age bracket).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndustryWage {
    #[serde(rename = "集計年")]
    pub year: u16,
    #[serde(rename = "産業大分類名")]
    pub industry: String,
    #[serde(rename = "年齢")]
    pub age: String,
    #[serde(rename = "一人当たり賃金（万円）")]
    pub wage: f64,
    #[serde(rename = "所定内給与額（万円）")]
    pub base_pay: f64,
    #[serde(rename = "年間賞与その他特別給与額（万円）")]
    pub bonus: f64,
}

/// One prefecture row: (year × prefecture × age bracket).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrefectureWage {
    #[serde(rename = "集計年")]
    pub year: u16,
    #[serde(rename = "都道府県名")]
    pub prefecture: String,
    #[serde(rename = "年齢")]
    pub age: String,
    #[serde(rename = "一人当たり賃金（万円）")]
    pub wage: f64,
    #[serde(rename = "所定内給与額（万円）")]
    pub base_pay: f64,
    #[serde(rename = "年間賞与その他特別給与額（万円）")]
    pub bonus: f64,
}

/// Prefectural capital coordinates. The `pref_name` header binds to
/// `prefecture` so the geo join key carries the same name as the wage
/// relations' `都道府県名` column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrefPoint {
    #[serde(rename = "pref_name")]
    pub prefecture: String,
    pub lat: f64,
    pub lon: f64,
}

impl NationalWage {
    pub const COLUMNS: [&'static str; 5] = [YEAR_COL, AGE_COL, WAGE_COL, BASE_PAY_COL, BONUS_COL];
}

impl IndustryWage {
    pub const COLUMNS: [&'static str; 6] = [
        YEAR_COL,
        INDUSTRY_COL,
        AGE_COL,
        WAGE_COL,
        BASE_PAY_COL,
        BONUS_COL,
    ];

    /// Value of the selected wage metric for this row.
    pub fn metric(&self, metric: WageMetric) -> f64 {
        match metric {
            WageMetric::PerCapita => self.wage,
            WageMetric::BasePay => self.base_pay,
            WageMetric::Bonus => self.bonus,
        }
    }
}

impl PrefectureWage {
    pub const COLUMNS: [&'static str; 6] = [
        YEAR_COL,
        PREF_COL,
        AGE_COL,
        WAGE_COL,
        BASE_PAY_COL,
        BONUS_COL,
    ];
}

impl PrefPoint {
    pub const COLUMNS: [&'static str; 3] = [GEO_PREF_COL, GEO_LAT_COL, GEO_LON_COL];
}

// ---------------------------------------------------------------------------
// WageMetric – the selectable wage column of the industry bar chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WageMetric {
    #[default]
    PerCapita,
    BasePay,
    Bonus,
}

impl WageMetric {
    pub const ALL: [WageMetric; 3] =
        [WageMetric::PerCapita, WageMetric::BasePay, WageMetric::Bonus];

    /// The source column header this metric reads.
    pub fn label(self) -> &'static str {
        match self {
            WageMetric::PerCapita => WAGE_COL,
            WageMetric::BasePay => BASE_PAY_COL,
            WageMetric::Bonus => BONUS_COL,
        }
    }
}

// ---------------------------------------------------------------------------
// WageDataset – the four loaded relations plus derived indices
// ---------------------------------------------------------------------------

/// The full loaded dataset. Immutable after construction; the view builders
/// take slices of it and return fresh relations.
#[derive(Debug, Clone)]
pub struct WageDataset {
    pub national: Vec<NationalWage>,
    pub industry: Vec<IndustryWage>,
    pub prefecture: Vec<PrefectureWage>,
    pub geo: Vec<PrefPoint>,

    /// National rows with `age == AGE_TOTAL`. The trend view joins against
    /// this slice on every selection change, so it is derived once here.
    pub national_totals: Vec<NationalWage>,
    /// Distinct prefecture names in first-appearance order (the selection
    /// list; the default selection is the first entry).
    pub prefecture_names: Vec<String>,
    /// Distinct aggregation years of the industry relation, ascending.
    pub industry_years: Vec<u16>,
    /// Distinct non-sentinel age brackets in first-appearance order.
    pub age_brackets: Vec<String>,
}

impl WageDataset {
    /// Bundle the loaded relations and derive the lookup indices.
    pub fn from_tables(
        national: Vec<NationalWage>,
        industry: Vec<IndustryWage>,
        prefecture: Vec<PrefectureWage>,
        geo: Vec<PrefPoint>,
    ) -> Self {
        let national_totals: Vec<NationalWage> = national
            .iter()
            .filter(|r| r.age == AGE_TOTAL)
            .cloned()
            .collect();

        let prefecture_names = distinct_in_order(prefecture.iter().map(|r| r.prefecture.as_str()));

        let industry_years: Vec<u16> = industry
            .iter()
            .map(|r| r.year)
            .collect::<std::collections::BTreeSet<u16>>()
            .into_iter()
            .collect();

        let age_brackets = distinct_in_order(
            national
                .iter()
                .filter(|r| r.age != AGE_TOTAL)
                .map(|r| r.age.as_str()),
        );

        WageDataset {
            national,
            industry,
            prefecture,
            geo,
            national_totals,
            prefecture_names,
            industry_years,
            age_brackets,
        }
    }
}

/// Distinct values in first-appearance order. Age-bracket labels do not sort
/// lexicographically (`19歳以下` would land between the `～歳` ranges), so
/// source order is authoritative for every label column.
pub(crate) fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn national_row(year: u16, age: &str, wage: f64) -> NationalWage {
        NationalWage {
            year,
            age: age.to_string(),
            wage,
            base_pay: wage * 0.7,
            bonus: wage * 0.2,
        }
    }

    fn prefecture_row(year: u16, pref: &str, age: &str, wage: f64) -> PrefectureWage {
        PrefectureWage {
            year,
            prefecture: pref.to_string(),
            age: age.to_string(),
            wage,
            base_pay: wage * 0.7,
            bonus: wage * 0.2,
        }
    }

    fn industry_row(year: u16, industry: &str, age: &str, wage: f64) -> IndustryWage {
        IndustryWage {
            year,
            industry: industry.to_string(),
            age: age.to_string(),
            wage,
            base_pay: wage * 0.7,
            bonus: wage * 0.2,
        }
    }

    #[test]
    fn national_totals_keep_only_the_sentinel() {
        let ds = WageDataset::from_tables(
            vec![
                national_row(2019, AGE_TOTAL, 300.0),
                national_row(2019, "20～24歳", 250.0),
                national_row(2020, AGE_TOTAL, 310.0),
            ],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(ds.national_totals.len(), 2);
        assert!(ds.national_totals.iter().all(|r| r.age == AGE_TOTAL));
    }

    #[test]
    fn prefecture_names_keep_file_order() {
        let ds = WageDataset::from_tables(
            vec![],
            vec![],
            vec![
                prefecture_row(2019, "北海道", AGE_TOTAL, 350.0),
                prefecture_row(2019, "青森県", AGE_TOTAL, 320.0),
                prefecture_row(2020, "北海道", AGE_TOTAL, 355.0),
                prefecture_row(2019, "東京都", AGE_TOTAL, 620.0),
            ],
            vec![],
        );
        assert_eq!(ds.prefecture_names, ["北海道", "青森県", "東京都"]);
    }

    #[test]
    fn industry_years_are_distinct_and_ascending() {
        let ds = WageDataset::from_tables(
            vec![],
            vec![
                industry_row(2020, "建設業", AGE_TOTAL, 400.0),
                industry_row(2015, "建設業", AGE_TOTAL, 380.0),
                industry_row(2020, "製造業", AGE_TOTAL, 420.0),
            ],
            vec![],
            vec![],
        );
        assert_eq!(ds.industry_years, [2015, 2020]);
    }

    #[test]
    fn age_brackets_exclude_the_sentinel() {
        let ds = WageDataset::from_tables(
            vec![
                national_row(2019, AGE_TOTAL, 300.0),
                national_row(2019, "19歳以下", 150.0),
                national_row(2019, "20～24歳", 250.0),
                national_row(2020, "19歳以下", 155.0),
            ],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(ds.age_brackets, ["19歳以下", "20～24歳"]);
    }

    #[test]
    fn metric_selects_the_right_column() {
        let row = industry_row(2019, "製造業", AGE_TOTAL, 400.0);
        assert_eq!(row.metric(WageMetric::PerCapita), 400.0);
        assert_eq!(row.metric(WageMetric::BasePay), 280.0);
        assert_eq!(row.metric(WageMetric::Bonus), 80.0);
    }

    #[test]
    fn metric_labels_are_the_source_headers() {
        assert_eq!(WageMetric::PerCapita.label(), WAGE_COL);
        assert_eq!(WageMetric::BasePay.label(), BASE_PAY_COL);
        assert_eq!(WageMetric::Bonus.label(), BONUS_COL);
    }
}
