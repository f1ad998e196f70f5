use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Orientation bucket used as the object key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Other,
}

// Width/height ratios rounded to hundredths: 16:9 -> 1.78, 9:16 -> 0.56.
const LANDSCAPE_HUNDREDTHS: i64 = 178;
const PORTRAIT_HUNDREDTHS: i64 = 56;

impl AspectRatio {
    /// Classify by width/height rounded to two decimals. Callers guarantee a
    /// non-zero height.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let ratio = f64::from(width) / f64::from(height);
        match (ratio * 100.0).round() as i64 {
            LANDSCAPE_HUNDREDTHS => AspectRatio::Landscape,
            PORTRAIT_HUNDREDTHS => AspectRatio::Portrait,
            _ => AspectRatio::Other,
        }
    }

    pub fn as_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_prefix())
    }
}
