//! Dataset Writer
//!
//! Comma-separated solar position dataset, one row per daylight sample.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::engine::SolarSample;
use crate::error::DatasetError;
use crate::time::ClockTime;

/// Default output file name.
pub const DEFAULT_DATASET_PATH: &str = "solposdata.csv";

/// Column names, in row order. The leading space before `Hour` is part of
/// the established file format.
pub const HEADER: [&str; 12] = [
    "Time(hr)",
    "Time(min)",
    "Time(sec)",
    " Hour",
    "Minute",
    "Second",
    "Azim",
    "Elevetr",
    "Elevref",
    "Etrn",
    "Ampress",
    "Gndrn",
];

// ===================== RECORD =====================

/// One dataset row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputRecord {
    pub time_hr: f64,
    pub time_min: f64,
    pub time_sec: f64,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub azim: f64,
    pub elev_etr: f64,
    pub elev_ref: f64,
    pub etrn: f64,
    pub ampress: f64,
    pub gndrn: f64,
}

impl OutputRecord {
    pub fn new(at: ClockTime, sample: &SolarSample, gndrn: f64) -> Self {
        Self {
            time_hr: at.as_hours(),
            time_min: at.as_minutes(),
            time_sec: at.as_seconds(),
            hour: at.hour,
            minute: at.minute,
            second: at.second,
            azim: sample.azimuth,
            elev_etr: sample.elevation_unrefracted,
            elev_ref: sample.elevation_refracted,
            etrn: sample.etrn,
            ampress: sample.air_mass,
            gndrn,
        }
    }
}

// ===================== WRITER =====================

/// Create or truncate an output file, naming the path on failure.
pub fn create_file(path: &Path) -> Result<File, DatasetError> {
    File::create(path).map_err(|source| DatasetError::Open { path: path.to_path_buf(), source })
}

/// Writes the header on creation and one row per record.
///
/// Rows reach the destination only once [`DatasetWriter::finish`] succeeds.
pub struct DatasetWriter<W: Write> {
    csv: csv::Writer<W>,
    rows: usize,
}

impl DatasetWriter<File> {
    /// Create (or truncate) the file at `path` and write the header.
    pub fn create(path: &Path) -> Result<Self, DatasetError> {
        let file = create_file(path)?;
        info!("Writing dataset to {}", path.display());
        Self::from_writer(file)
    }
}

impl<W: Write> DatasetWriter<W> {
    pub fn from_writer(inner: W) -> Result<Self, DatasetError> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(inner);
        csv.write_record(HEADER)?;
        Ok(Self { csv, rows: 0 })
    }

    pub fn write_record(&mut self, record: &OutputRecord) -> Result<(), DatasetError> {
        self.csv.serialize(record)?;
        self.rows += 1;
        debug!("Wrote row for {:02}:{:02}:{:02}", record.hour, record.minute, record.second);
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, records: I) -> Result<(), DatasetError>
    where
        I: IntoIterator<Item = &'a OutputRecord>,
    {
        records.into_iter().try_for_each(|r| self.write_record(r))
    }

    /// Flush everything, close the destination and return the number of
    /// data rows written.
    pub fn finish(self) -> Result<usize, DatasetError> {
        let rows = self.rows;
        self.into_inner()?;
        Ok(rows)
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, DatasetError> {
        self.csv.into_inner().map_err(|e| DatasetError::Flush(e.into_error()))
    }
}

/// Write a complete dataset to `path`, returning the data row count.
pub fn write_dataset(path: &Path, records: &[OutputRecord]) -> Result<usize, DatasetError> {
    let mut writer = DatasetWriter::create(path)?;
    writer.write_all(records)?;
    let rows = writer.finish()?;
    info!("Wrote {} rows to {}", rows, path.display());
    Ok(rows)
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_record(minutes: f64) -> OutputRecord {
        let sample = SolarSample {
            azimuth: 101.5,
            elevation_unrefracted: 0.25,
            elevation_refracted: 0.75,
            etrn: 1379.0,
            air_mass: 27.5,
        };
        OutputRecord::new(ClockTime::from_minutes(minutes), &sample, 12.5)
    }

    fn render(records: &[OutputRecord]) -> String {
        let mut writer = DatasetWriter::from_writer(Vec::new()).unwrap();
        writer.write_all(records).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_header_is_exact() {
        let out = render(&[]);
        assert_eq!(
            out,
            "Time(hr),Time(min),Time(sec), Hour,Minute,Second,Azim,Elevetr,Elevref,Etrn,Ampress,Gndrn\n"
        );
    }

    #[test]
    fn test_row_layout() {
        // 06:30:15
        let out = render(&[sample_record(390.25)]);
        let row = out.lines().nth(1).unwrap();
        assert_eq!(row, "6.504166666666666,390.25,23415.0,6,30,15,101.5,0.25,0.75,1379.0,27.5,12.5");
        assert_eq!(row.split(',').count(), HEADER.len());
    }

    #[test]
    fn test_rows_keep_order() {
        let out = render(&[sample_record(400.0), sample_record(401.0), sample_record(402.0)]);
        let minutes: Vec<&str> =
            out.lines().skip(1).map(|l| l.split(',').nth(1).unwrap()).collect();
        assert_eq!(minutes, vec!["400.0", "401.0", "402.0"]);
    }

    #[test]
    fn test_write_dataset_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solposdata.csv");
        let rows = write_dataset(&path, &[sample_record(400.0), sample_record(401.0)]).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_unopenable_path_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("solposdata.csv");
        let err = write_dataset(&path, &[sample_record(400.0)]).unwrap_err();
        match err {
            DatasetError::Open { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected open error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_directory_as_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(DatasetWriter::create(dir.path()), Err(DatasetError::Open { .. })));
    }
}
