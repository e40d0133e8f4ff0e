use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use serde::de::DeserializeOwned;

use super::model::{IndustryWage, NationalWage, PrefPoint, PrefectureWage, WageDataset};

// ---------------------------------------------------------------------------
// Input files
// ---------------------------------------------------------------------------

// Fixed relative layout of the ministry extracts, unchanged from the source
// download. The three wage files are Shift_JIS; the geo lookup is UTF-8.
pub const NATIONAL_CSV: &str = "csv_data/雇用_医療福祉_一人当たり賃金_全国_全産業.csv";
pub const INDUSTRY_CSV: &str = "csv_data/雇用_医療福祉_一人当たり賃金_全国_大分類.csv";
pub const PREFECTURE_CSV: &str = "csv_data/雇用_医療福祉_一人当たり賃金_都道府県_全産業.csv";
pub const GEO_CSV: &str = "pref_lat_lon.csv";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load-time failure. All variants are fatal: the dashboard never runs a
/// view builder against a partially loaded dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid {encoding} text", path.display())]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the four input relations from `dir` (the directory that holds
/// `csv_data/` and `pref_lat_lon.csv`). The first failure aborts the load.
pub fn load_dataset(dir: &Path) -> Result<WageDataset, DataError> {
    let national: Vec<NationalWage> =
        read_table(&dir.join(NATIONAL_CSV), SHIFT_JIS, &NationalWage::COLUMNS)?;
    let industry: Vec<IndustryWage> =
        read_table(&dir.join(INDUSTRY_CSV), SHIFT_JIS, &IndustryWage::COLUMNS)?;
    let prefecture: Vec<PrefectureWage> =
        read_table(&dir.join(PREFECTURE_CSV), SHIFT_JIS, &PrefectureWage::COLUMNS)?;
    let geo: Vec<PrefPoint> = read_table(&dir.join(GEO_CSV), UTF_8, &PrefPoint::COLUMNS)?;

    log::info!(
        "loaded {} national, {} industry, {} prefecture rows and {} geo points from {}",
        national.len(),
        industry.len(),
        prefecture.len(),
        geo.len(),
        dir.display()
    );

    Ok(WageDataset::from_tables(national, industry, prefecture, geo))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read one CSV table: decode the whole file under the declared encoding
/// (BOM-sniffing, malformed input is fatal), verify that every required
/// column is present, then deserialize each row by header name. Extra
/// columns in the source are ignored.
pub fn read_table<T: DeserializeOwned>(
    path: &Path,
    encoding: &'static Encoding,
    required: &[&'static str],
) -> Result<Vec<T>, DataError> {
    let bytes = fs::read(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(DataError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        });
    }

    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        // csv::Error carries the record/line position for the diagnostic.
        rows.push(record.map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AGE_TOTAL, BONUS_COL};

    fn write_shift_jis(path: &Path, content: &str) {
        let (bytes, _, _) = SHIFT_JIS.encode(content);
        fs::write(path, bytes).unwrap();
    }

    fn write_wage_files(dir: &Path) {
        fs::create_dir(dir.join("csv_data")).unwrap();
        write_shift_jis(
            &dir.join(NATIONAL_CSV),
            "集計年,年齢,一人当たり賃金（万円）,所定内給与額（万円）,年間賞与その他特別給与額（万円）\n\
             2019,年齢計,310.0,220.0,62.0\n\
             2019,20～24歳,250.0,190.0,40.0\n",
        );
        write_shift_jis(
            &dir.join(INDUSTRY_CSV),
            "集計年,産業大分類名,年齢,一人当たり賃金（万円）,所定内給与額（万円）,年間賞与その他特別給与額（万円）\n\
             2019,\"卸売業,小売業\",年齢計,330.0,240.0,55.0\n",
        );
        write_shift_jis(
            &dir.join(PREFECTURE_CSV),
            "集計年,都道府県名,年齢,一人当たり賃金（万円）,所定内給与額（万円）,年間賞与その他特別給与額（万円）\n\
             2019,東京都,年齢計,620.5,430.0,120.0\n",
        );
        fs::write(
            dir.join(GEO_CSV),
            "pref_name,lat,lon\n東京都,35.689185,139.691648\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_all_four_relations() {
        let dir = tempfile::tempdir().unwrap();
        write_wage_files(dir.path());

        let ds = load_dataset(dir.path()).unwrap();
        assert_eq!(ds.national.len(), 2);
        assert_eq!(ds.national[0].age, AGE_TOTAL);
        assert_eq!(ds.national[0].wage, 310.0);
        // Embedded comma in the quoted industry name survives parsing.
        assert_eq!(ds.industry[0].industry, "卸売業,小売業");
        assert_eq!(ds.prefecture[0].prefecture, "東京都");
        assert_eq!(ds.geo[0].lon, 139.691648);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Read { .. }), "got {err}");
    }

    #[test]
    fn absent_column_is_named_in_the_error() {
        let dir = tempfile::tempdir().unwrap();
        write_wage_files(dir.path());
        // Rewrite the national file without the bonus column.
        write_shift_jis(
            &dir.path().join(NATIONAL_CSV),
            "集計年,年齢,一人当たり賃金（万円）,所定内給与額（万円）\n2019,年齢計,310.0,220.0\n",
        );

        let err = load_dataset(dir.path()).unwrap_err();
        match err {
            DataError::MissingColumn { column, .. } => assert_eq!(column, BONUS_COL),
            other => panic!("expected MissingColumn, got {other}"),
        }
    }

    #[test]
    fn undecodable_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        write_wage_files(dir.path());
        // 0xFF is never a valid Shift_JIS byte.
        fs::write(dir.path().join(NATIONAL_CSV), [0xFF, 0xFF, 0xFF]).unwrap();

        let err = load_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Decode { .. }), "got {err}");
    }

    #[test]
    fn non_numeric_wage_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        write_wage_files(dir.path());
        write_shift_jis(
            &dir.path().join(NATIONAL_CSV),
            "集計年,年齢,一人当たり賃金（万円）,所定内給与額（万円）,年間賞与その他特別給与額（万円）\n\
             2019,年齢計,たくさん,220.0,62.0\n",
        );

        let err = load_dataset(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Csv { .. }), "got {err}");
    }

    #[test]
    fn column_order_is_irrelevant() {
        let dir = tempfile::tempdir().unwrap();
        write_wage_files(dir.path());
        write_shift_jis(
            &dir.path().join(NATIONAL_CSV),
            "年齢,年間賞与その他特別給与額（万円）,一人当たり賃金（万円）,所定内給与額（万円）,集計年\n\
             年齢計,62.0,310.0,220.0,2019\n",
        );

        let ds = load_dataset(dir.path()).unwrap();
        assert_eq!(ds.national[0].year, 2019);
        assert_eq!(ds.national[0].bonus, 62.0);
    }
}
