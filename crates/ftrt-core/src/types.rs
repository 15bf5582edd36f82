//! Type definitions for FTRT and solar activity series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single FTRT measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FtrtRecord {
    /// Measurement time (UTC)
    pub timestamp: DateTime<Utc>,

    /// FTRT value at `timestamp`
    pub value: f64,
}

impl FtrtRecord {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A single solar activity observation
///
/// Either a continuous index (sunspot number, radio flux) carried in
/// `intensity`, or a discrete flare event carried in `flare_class`, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarRecord {
    /// Observation time (UTC)
    pub timestamp: DateTime<Utc>,

    /// Activity intensity in source units
    #[serde(default)]
    pub intensity: f64,

    /// GOES flare class for flare events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flare_class: Option<FlareClass>,
}

impl SolarRecord {
    pub fn new(timestamp: DateTime<Utc>, intensity: f64) -> Self {
        Self {
            timestamp,
            intensity,
            flare_class: None,
        }
    }

    /// Create a flare event record with no separate intensity reading
    pub fn flare(timestamp: DateTime<Utc>, flare_class: FlareClass) -> Self {
        Self {
            timestamp,
            intensity: 0.0,
            flare_class: Some(flare_class),
        }
    }

    /// Intensity used for aggregation
    ///
    /// Falls back to the flare peak flux when no positive intensity is present.
    pub fn effective_intensity(&self) -> f64 {
        if self.intensity.is_finite() && self.intensity > 0.0 {
            self.intensity
        } else {
            self.flare_class
                .as_ref()
                .map(FlareClass::peak_flux)
                .unwrap_or(0.0)
        }
    }
}

/// GOES X-ray flare class letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlareLetter {
    A,
    B,
    C,
    M,
    X,
}

impl FlareLetter {
    /// Peak flux of a magnitude-1.0 flare in W/m²
    pub fn base_flux(self) -> f64 {
        match self {
            FlareLetter::A => 1e-8,
            FlareLetter::B => 1e-7,
            FlareLetter::C => 1e-6,
            FlareLetter::M => 1e-5,
            FlareLetter::X => 1e-4,
        }
    }
}

/// GOES flare classification, e.g. `M2.5`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlareClass {
    pub letter: FlareLetter,
    pub magnitude: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid flare class: '{0}'")]
pub struct FlareClassParseError(pub String);

impl FlareClass {
    pub fn new(letter: FlareLetter, magnitude: f64) -> Self {
        Self { letter, magnitude }
    }

    /// Peak X-ray flux in W/m²
    pub fn peak_flux(&self) -> f64 {
        self.letter.base_flux() * self.magnitude
    }
}

impl FromStr for FlareClass {
    type Err = FlareClassParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => FlareLetter::A,
            Some('B') => FlareLetter::B,
            Some('C') => FlareLetter::C,
            Some('M') => FlareLetter::M,
            Some('X') => FlareLetter::X,
            _ => return Err(FlareClassParseError(s.to_string())),
        };

        let rest = chars.as_str();
        let magnitude = if rest.is_empty() {
            1.0
        } else {
            rest.parse::<f64>()
                .map_err(|_| FlareClassParseError(s.to_string()))?
        };

        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(FlareClassParseError(s.to_string()));
        }

        Ok(Self { letter, magnitude })
    }
}

impl TryFrom<String> for FlareClass {
    type Error = FlareClassParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FlareClass> for String {
    fn from(value: FlareClass) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FlareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{}", self.letter, self.magnitude)
    }
}

/// A detected FTRT peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FtrtPeak {
    /// Index of the peak sample in the input series
    pub index: usize,

    pub timestamp: DateTime<Utc>,

    pub value: f64,

    /// Height above the detection threshold
    pub prominence: f64,
}

/// How solar records inside a matching window are reduced to one number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Mean,
    Max,
    Count,
}

/// Correlation coefficient to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
}

/// Placement of the matching window relative to each peak
///
/// With Δ = solar time − peak time in days:
/// - `Symmetric`: |Δ| ≤ window
/// - `Forward`: 0 ≤ Δ ≤ window
/// - `Backward`: −window ≤ Δ ≤ 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowAlignment {
    #[default]
    Symmetric,
    Forward,
    Backward,
}

macro_rules! impl_lowercase_enum_str {
    ($ty:ty, $($variant:ident => $name:literal),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown value '{}', expected one of: {}",
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $name),)+
                }
            }
        }
    };
}

impl_lowercase_enum_str!(Aggregation, Sum => "sum", Mean => "mean", Max => "max", Count => "count");
impl_lowercase_enum_str!(CorrelationMethod, Pearson => "pearson", Spearman => "spearman");
impl_lowercase_enum_str!(
    WindowAlignment,
    Symmetric => "symmetric",
    Forward => "forward",
    Backward => "backward",
);
