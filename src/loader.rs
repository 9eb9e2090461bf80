//! CSV loader for the e-SUS occupancy dataset.

use crate::aggregation::Record;
use crate::error::StartupError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Location of the processed dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "dados/processados/e-sus-ocupacao-estabelecimento.csv";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "dataNotificacao",
    "ocupacaoSuspeitoCli",
    "saidaConfirmadaObitos",
    "NO_FANTASIA",
    "NU_LATITUDE",
    "NU_LONGITUDE",
];

/// A row as it appears in the CSV, before the date is parsed.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "dataNotificacao")]
    notified_at: Option<String>,
    #[serde(rename = "ocupacaoSuspeitoCli")]
    suspected_occupancy: Option<f64>,
    #[serde(rename = "saidaConfirmadaObitos", deserialize_with = "integral")]
    confirmed_deaths: Option<i64>,
    #[serde(rename = "NO_FANTASIA")]
    facility_name: Option<String>,
    #[serde(rename = "NU_LATITUDE")]
    latitude: Option<f64>,
    #[serde(rename = "NU_LONGITUDE")]
    longitude: Option<f64>,
}

/// Accepts integers and integral floats such as `3.0`.
fn integral<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) if v.is_nan() => Ok(None),
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(Some(v as i64)),
        Some(v) => Err(serde::de::Error::custom(format!(
            "expected an integer death count, got {v}"
        ))),
    }
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a notification date. RFC 3339 values keep their wall-clock time.
pub fn parse_notification_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(value, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Loads every record from the CSV at `path`.
///
/// Paths ending in `.gz` are decompressed on the fly.
///
/// # Errors
///
/// Fails if the file is missing, a required column is absent, a cell has the
/// wrong type, or a notification date cannot be parsed.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, StartupError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StartupError::NotFound(path.display().to_string()));
    }

    let start = Instant::now();
    let file = File::open(path)?;
    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");

    let records = if gzipped {
        debug!("Reading gzip-compressed CSV");
        read_records(GzDecoder::new(file))?
    } else {
        read_records(file)?
    };

    info!(
        rows = records.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Dataset loaded"
    );
    Ok(records)
}

/// Reads records from any CSV source with a header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>, StartupError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(StartupError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for (idx, result) in rdr.deserialize().enumerate() {
        let raw: RawRecord = result?;
        // Header is line 1, so the first data row is line 2.
        records.push(into_record(raw, idx + 2)?);
    }

    Ok(records)
}

fn into_record(raw: RawRecord, row: usize) -> Result<Record, StartupError> {
    let notified_at = match raw.notified_at.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(parse_notification_date(value).ok_or_else(|| {
            StartupError::InvalidDate {
                row,
                value: value.to_string(),
            }
        })?),
    };

    Ok(Record {
        notified_at,
        suspected_occupancy: raw.suspected_occupancy,
        confirmed_deaths: raw.confirmed_deaths,
        facility_name: raw.facility_name.filter(|name| !name.is_empty()),
        latitude: raw.latitude,
        longitude: raw.longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const HEADER: &str = "id,dataNotificacao,ocupacaoSuspeitoCli,saidaConfirmadaObitos,NO_FANTASIA,NU_LATITUDE,NU_LONGITUDE\n";

    fn csv(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_read_typed_record() {
        let data = csv(&["1,2021-01-15T03:00:00.000Z,0.42,3,Hospital A,-15.78,-47.92"]);
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(
            r.notified_at,
            NaiveDate::from_ymd_opt(2021, 1, 15).unwrap().and_hms_opt(3, 0, 0)
        );
        assert_eq!(r.suspected_occupancy, Some(0.42));
        assert_eq!(r.confirmed_deaths, Some(3));
        assert_eq!(r.facility_name.as_deref(), Some("Hospital A"));
        assert_eq!(r.latitude, Some(-15.78));
        assert_eq!(r.longitude, Some(-47.92));
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let data = csv(&["1,,,,,,"]);
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records[0], Record::default());
    }

    #[test]
    fn test_integral_float_deaths_accepted() {
        let data = csv(&["1,2021-01-15,0.1,4.0,Hospital A,-15.78,-47.92"]);
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records[0].confirmed_deaths, Some(4));
    }

    #[test]
    fn test_fractional_deaths_rejected() {
        let data = csv(&["1,2021-01-15,0.1,4.5,Hospital A,-15.78,-47.92"]);
        let err = read_records(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StartupError::Csv(_)));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let data = "dataNotificacao,ocupacaoSuspeitoCli,NO_FANTASIA,NU_LATITUDE,NU_LONGITUDE\n";
        let err = read_records(data.as_bytes()).unwrap_err();
        match err {
            StartupError::MissingColumn(column) => assert_eq!(column, "saidaConfirmadaObitos"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_date_names_row() {
        let data = csv(&[
            "1,2021-01-15,0.1,1,Hospital A,-15.78,-47.92",
            "2,ontem,0.1,1,Hospital A,-15.78,-47.92",
        ]);
        let err = read_records(data.as_bytes()).unwrap_err();
        match err {
            StartupError::InvalidDate { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "ontem");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_notification_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 5, 2).unwrap();
        for value in [
            "2021-05-02",
            "2021/05/02",
            "2021-05-02 13:45:00",
            "2021-05-02T13:45:00.250",
            "2021-05-02T13:45:00-03:00",
        ] {
            let parsed = parse_notification_date(value).unwrap();
            assert_eq!(parsed.date(), expected, "{value}");
        }
        assert!(parse_notification_date("05/02/2021x").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_records("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, StartupError::NotFound(_)));
    }

    #[test]
    fn test_load_plain_and_gzip_agree() {
        let data = csv(&[
            "1,2021-01-15,0.4,2,Hospital A,-15.78,-47.92",
            "2,2021-02-15,0.6,3,Hospital A,-15.78,-47.92",
        ]);
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("ocupacao.csv");
        std::fs::write(&plain, &data).unwrap();

        let gz = dir.path().join("ocupacao.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data.as_bytes()).unwrap();
        std::fs::write(&gz, encoder.finish().unwrap()).unwrap();

        let from_plain = load_records(&plain).unwrap();
        let from_gz = load_records(&gz).unwrap();
        assert_eq!(from_plain.len(), 2);
        assert_eq!(from_plain, from_gz);
    }
}
