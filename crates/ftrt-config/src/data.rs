//! Input file and column configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input data configuration
///
/// Column names are matched case-insensitively against CSV headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// FTRT series file (CSV or JSON)
    pub ftrt_path: Option<PathBuf>,

    /// Solar activity file (CSV or JSON)
    pub solar_path: Option<PathBuf>,

    /// CSV field delimiter
    pub delimiter: char,

    /// Timestamp column shared by both files
    pub timestamp_column: String,

    /// FTRT value column
    pub ftrt_value_column: String,

    /// Solar intensity column
    pub solar_intensity_column: String,

    /// Optional GOES flare class column in the solar file
    pub flare_class_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            ftrt_path: None,
            solar_path: None,
            delimiter: ',',
            timestamp_column: "timestamp".to_string(),
            ftrt_value_column: "ftrt".to_string(),
            solar_intensity_column: "intensity".to_string(),
            flare_class_column: "flare_class".to_string(),
        }
    }
}

impl DataConfig {
    /// Delimiter as a single byte, if it is ASCII
    pub fn delimiter_byte(&self) -> Option<u8> {
        if self.delimiter.is_ascii() {
            Some(self.delimiter as u8)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_byte() {
        let mut config = DataConfig::default();
        assert_eq!(config.delimiter_byte(), Some(b','));

        config.delimiter = ';';
        assert_eq!(config.delimiter_byte(), Some(b';'));

        config.delimiter = '→';
        assert_eq!(config.delimiter_byte(), None);
    }
}
