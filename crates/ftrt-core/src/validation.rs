//! Input validation shared by peak detection, window matching and correlation

use crate::errors::{CorrelationError, Series};
use crate::types::{FtrtRecord, SolarRecord};
use chrono::{DateTime, Utc};

/// Validate an FTRT series: non-empty, finite values, non-decreasing timestamps
pub fn validate_ftrt(records: &[FtrtRecord]) -> Result<(), CorrelationError> {
    validate_series(
        Series::Ftrt,
        records.iter().map(|r| (&r.timestamp, r.value)),
    )
}

/// Validate a solar series: non-empty, finite intensities, non-decreasing timestamps
pub fn validate_solar(records: &[SolarRecord]) -> Result<(), CorrelationError> {
    validate_series(
        Series::Solar,
        records.iter().map(|r| (&r.timestamp, r.intensity)),
    )
}

fn validate_series<'a>(
    series: Series,
    items: impl Iterator<Item = (&'a DateTime<Utc>, f64)>,
) -> Result<(), CorrelationError> {
    let mut prev: Option<&DateTime<Utc>> = None;
    let mut count = 0usize;

    for (index, (timestamp, value)) in items.enumerate() {
        if !value.is_finite() {
            return Err(CorrelationError::NonFiniteValue { series, index });
        }
        if let Some(p) = prev {
            if timestamp < p {
                return Err(CorrelationError::UnsortedRecords { series, index });
            }
        }
        prev = Some(timestamp);
        count += 1;
    }

    if count == 0 {
        return Err(CorrelationError::EmptyData { series });
    }

    Ok(())
}
