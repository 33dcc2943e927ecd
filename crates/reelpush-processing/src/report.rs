//! Before/after size comparison for a transcode.

use std::fmt;
use std::path::Path;

use reelpush_core::Result;

const MIB: f64 = (1u64 << 20) as f64;

/// Render a byte count as mebibytes with two decimals, e.g. `9.54 MB`.
pub fn format_bytes(size: u64) -> String {
    format!("{:.2} MB", size as f64 / MIB)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeReport {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl SizeReport {
    pub fn new(original_bytes: u64, compressed_bytes: u64) -> Self {
        Self {
            original_bytes,
            compressed_bytes,
        }
    }

    pub async fn from_paths(original: &Path, compressed: &Path) -> Result<Self> {
        let original_bytes = tokio::fs::metadata(original).await?.len();
        let compressed_bytes = tokio::fs::metadata(compressed).await?.len();
        Ok(Self::new(original_bytes, compressed_bytes))
    }

    /// Percentage saved. Negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        (self.original_bytes as f64 - self.compressed_bytes as f64) / self.original_bytes as f64
            * 100.0
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Size Comparison ---")?;
        writeln!(f, "Original:   {}", format_bytes(self.original_bytes))?;
        writeln!(f, "Compressed: {}", format_bytes(self.compressed_bytes))?;
        write!(f, "Reduction:  {:.1}%", self.reduction_percent())
    }
}
