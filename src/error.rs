//! Error types for a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::time::ClockTime;

/// The location/date context cannot produce a sampling range.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("solar position engine rejected the location/date: {0}")]
    Fatal(Diagnostics),
    #[error("no daylight window on this date: {0}")]
    NoDaylight(Diagnostics),
    #[error("sunrise {sunrise:.2} min / sunset {sunset:.2} min fall outside the local day")]
    OutOfDay { sunrise: f64, sunset: f64 },
}

/// A daylight sample could not be computed.
#[derive(Debug, Error)]
#[error("solar position engine rejected sample at {at}: {diagnostics}")]
pub struct SampleError {
    pub at: ClockTime,
    pub diagnostics: Diagnostics,
}

/// The dataset could not be written.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot write row: {0}")]
    Write(#[from] csv::Error),
    #[error("cannot flush output: {0}")]
    Flush(#[source] io::Error),
}

/// Anything that aborts a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
