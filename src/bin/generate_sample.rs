//! Writes a deterministic stand-in for the four dashboard inputs: the three
//! Shift_JIS wage extracts under `csv_data/` and the UTF-8 prefecture
//! coordinate lookup. The numbers are synthetic but shaped like the
//! published extracts (age hump, industry and prefecture offsets, yearly
//! drift), so the dashboard can run without the ministry download.

use std::fs;
use std::iter::once;
use std::path::Path;

use anyhow::Context;
use encoding_rs::SHIFT_JIS;

const FIRST_YEAR: u16 = 2013;
const LAST_YEAR: u16 = 2020;

/// National all-age average the other levels are scaled from, in 万円.
const NATIONAL_BASE: f64 = 370.0;

const AGE_TOTAL: &str = "年齢計";

/// Age brackets with their wage multiplier: the usual seniority hump,
/// falling off after mandatory retirement age.
const AGES: &[(&str, f64)] = &[
    ("19歳以下", 0.52),
    ("20～24歳", 0.68),
    ("25～29歳", 0.82),
    ("30～34歳", 0.93),
    ("35～39歳", 1.02),
    ("40～44歳", 1.08),
    ("45～49歳", 1.12),
    ("50～54歳", 1.15),
    ("55～59歳", 1.12),
    ("60～64歳", 0.85),
    ("65～69歳", 0.72),
    ("70歳以上", 0.65),
];

/// Major industry categories with their wage multiplier. Several names
/// carry embedded commas and exercise the CSV quoting path.
const INDUSTRIES: &[(&str, f64)] = &[
    ("建設業", 1.00),
    ("製造業", 0.98),
    ("電気・ガス・熱供給・水道業", 1.28),
    ("情報通信業", 1.22),
    ("運輸業,郵便業", 0.88),
    ("卸売業,小売業", 0.92),
    ("金融業,保険業", 1.25),
    ("不動産業,物品賃貸業", 1.06),
    ("学術研究,専門・技術サービス業", 1.18),
    ("宿泊業,飲食サービス業", 0.62),
    ("生活関連サービス業,娯楽業", 0.74),
    ("教育,学習支援業", 1.08),
    ("医療,福祉", 0.86),
    ("複合サービス事業", 0.90),
    ("サービス業（他に分類されないもの）", 0.78),
    ("鉱業,採石業,砂利採取業", 1.02),
];

/// All 47 prefectures: name, capital latitude, capital longitude, wage
/// multiplier.
const PREFECTURES: &[(&str, f64, f64, f64)] = &[
    ("北海道", 43.064170, 141.346940, 0.90),
    ("青森県", 40.824444, 140.740000, 0.80),
    ("岩手県", 39.703610, 141.152500, 0.82),
    ("宮城県", 38.268890, 140.871940, 0.95),
    ("秋田県", 39.718610, 140.102500, 0.80),
    ("山形県", 38.240560, 140.363330, 0.83),
    ("福島県", 37.750000, 140.467780, 0.88),
    ("茨城県", 36.341390, 140.446670, 1.00),
    ("栃木県", 36.565830, 139.883610, 0.98),
    ("群馬県", 36.391110, 139.060830, 0.96),
    ("埼玉県", 35.856940, 139.648890, 1.02),
    ("千葉県", 35.604720, 140.123330, 1.02),
    ("東京都", 35.689185, 139.691648, 1.38),
    ("神奈川県", 35.447780, 139.642500, 1.18),
    ("新潟県", 37.902220, 139.023610, 0.88),
    ("富山県", 36.695280, 137.211390, 0.94),
    ("石川県", 36.594440, 136.625560, 0.94),
    ("福井県", 36.065280, 136.221940, 0.93),
    ("山梨県", 35.663890, 138.568330, 0.95),
    ("長野県", 36.651390, 138.181110, 0.93),
    ("岐阜県", 35.391110, 136.722220, 0.93),
    ("静岡県", 34.976940, 138.383060, 0.98),
    ("愛知県", 35.180280, 136.906670, 1.12),
    ("三重県", 34.730280, 136.508610, 1.00),
    ("滋賀県", 35.004440, 135.868330, 1.02),
    ("京都府", 35.021390, 135.755560, 1.05),
    ("大阪府", 34.686390, 135.520000, 1.13),
    ("兵庫県", 34.691390, 135.183060, 1.04),
    ("奈良県", 34.685280, 135.832780, 1.00),
    ("和歌山県", 34.226110, 135.167500, 0.92),
    ("鳥取県", 35.503610, 134.238330, 0.80),
    ("島根県", 35.472220, 133.050560, 0.82),
    ("岡山県", 34.661670, 133.935000, 0.94),
    ("広島県", 34.396390, 132.459440, 0.98),
    ("山口県", 34.185830, 131.471390, 0.93),
    ("徳島県", 34.065830, 134.559440, 0.89),
    ("香川県", 34.340280, 134.043330, 0.92),
    ("愛媛県", 33.841670, 132.766110, 0.86),
    ("高知県", 33.559720, 133.531110, 0.83),
    ("福岡県", 33.606390, 130.418060, 0.97),
    ("佐賀県", 33.249440, 130.298890, 0.84),
    ("長崎県", 32.744720, 129.873610, 0.84),
    ("熊本県", 32.789720, 130.741670, 0.86),
    ("大分県", 33.238060, 131.612500, 0.87),
    ("宮崎県", 31.911110, 131.423890, 0.80),
    ("鹿児島県", 31.560280, 130.558060, 0.83),
    ("沖縄県", 26.212500, 127.681110, 0.78),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// (per-capita wage, base pay, bonus) for one row, in 万円 with one decimal.
fn wage_components(rng: &mut SimpleRng, level: f64, year: u16) -> (f64, f64, f64) {
    let drift = 1.0 + 0.008 * f64::from(year - FIRST_YEAR);
    let wage = level * drift * (1.0 + rng.gauss(0.0, 0.015));
    let base_pay = wage * (0.71 + rng.gauss(0.0, 0.010));
    let bonus = wage * (0.18 + rng.gauss(0.0, 0.012));
    (round1(wage), round1(base_pay), round1(bonus))
}

/// The aggregate row first, then the brackets, as in the source files.
fn ages_with_total() -> impl Iterator<Item = (&'static str, f64)> {
    once((AGE_TOTAL, 1.0)).chain(AGES.iter().copied())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> anyhow::Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finish csv buffer: {e}"))?;
    String::from_utf8(bytes).context("csv buffer is not UTF-8")
}

fn write_shift_jis(path: &Path, text: &str) -> anyhow::Result<()> {
    let (bytes, _, unmappable) = SHIFT_JIS.encode(text);
    anyhow::ensure!(
        !unmappable,
        "{} contains characters outside Shift_JIS",
        path.display()
    );
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let csv_dir = Path::new("csv_data");
    fs::create_dir_all(csv_dir).context("create csv_data/")?;

    // ---- National, all industries ----
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([
        "集計年",
        "年齢",
        "一人当たり賃金（万円）",
        "所定内給与額（万円）",
        "年間賞与その他特別給与額（万円）",
    ])?;
    for year in FIRST_YEAR..=LAST_YEAR {
        for (age, age_factor) in ages_with_total() {
            let (wage, base_pay, bonus) =
                wage_components(&mut rng, NATIONAL_BASE * age_factor, year);
            w.write_record([
                year.to_string(),
                age.to_string(),
                format!("{wage:.1}"),
                format!("{base_pay:.1}"),
                format!("{bonus:.1}"),
            ])?;
        }
    }
    write_shift_jis(
        &csv_dir.join("雇用_医療福祉_一人当たり賃金_全国_全産業.csv"),
        &finish(w)?,
    )?;

    // ---- National, by major industry category ----
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([
        "集計年",
        "産業大分類名",
        "年齢",
        "一人当たり賃金（万円）",
        "所定内給与額（万円）",
        "年間賞与その他特別給与額（万円）",
    ])?;
    for year in FIRST_YEAR..=LAST_YEAR {
        for &(industry, industry_factor) in INDUSTRIES {
            for (age, age_factor) in ages_with_total() {
                let (wage, base_pay, bonus) = wage_components(
                    &mut rng,
                    NATIONAL_BASE * industry_factor * age_factor,
                    year,
                );
                w.write_record([
                    year.to_string(),
                    industry.to_string(),
                    age.to_string(),
                    format!("{wage:.1}"),
                    format!("{base_pay:.1}"),
                    format!("{bonus:.1}"),
                ])?;
            }
        }
    }
    write_shift_jis(
        &csv_dir.join("雇用_医療福祉_一人当たり賃金_全国_大分類.csv"),
        &finish(w)?,
    )?;

    // ---- By prefecture, all industries ----
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([
        "集計年",
        "都道府県名",
        "年齢",
        "一人当たり賃金（万円）",
        "所定内給与額（万円）",
        "年間賞与その他特別給与額（万円）",
    ])?;
    for year in FIRST_YEAR..=LAST_YEAR {
        for &(prefecture, _, _, pref_factor) in PREFECTURES {
            for (age, age_factor) in ages_with_total() {
                let (wage, base_pay, bonus) =
                    wage_components(&mut rng, NATIONAL_BASE * pref_factor * age_factor, year);
                w.write_record([
                    year.to_string(),
                    prefecture.to_string(),
                    age.to_string(),
                    format!("{wage:.1}"),
                    format!("{base_pay:.1}"),
                    format!("{bonus:.1}"),
                ])?;
            }
        }
    }
    write_shift_jis(
        &csv_dir.join("雇用_医療福祉_一人当たり賃金_都道府県_全産業.csv"),
        &finish(w)?,
    )?;

    // ---- Prefecture coordinate lookup (UTF-8) ----
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["pref_name", "lat", "lon"])?;
    for &(prefecture, lat, lon, _) in PREFECTURES {
        w.write_record([prefecture.to_string(), lat.to_string(), lon.to_string()])?;
    }
    fs::write("pref_lat_lon.csv", finish(w)?).context("write pref_lat_lon.csv")?;

    let years = usize::from(LAST_YEAR - FIRST_YEAR) + 1;
    let rows_per_year = AGES.len() + 1;
    println!(
        "wrote {} national, {} industry and {} prefecture rows over {}..{}, plus {} coordinates",
        years * rows_per_year,
        years * INDUSTRIES.len() * rows_per_year,
        years * PREFECTURES.len() * rows_per_year,
        FIRST_YEAR,
        LAST_YEAR,
        PREFECTURES.len()
    );
    Ok(())
}
