//! FileSize Type-Safe Wrapper
//!
//! Byte counts with safe arithmetic and human-readable formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe file size in bytes.
///
/// # Examples
/// ```
/// use pdf_shrink::types::FileSize;
///
/// let size = FileSize::from_mb(1);
/// assert_eq!(size.bytes(), 1048576);
/// assert_eq!(size.display(), "1.00 MB");
///
/// // Subtraction never underflows
/// let smaller = FileSize::new(500);
/// assert_eq!(smaller.saturating_sub(size).bytes(), 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSize(u64);

impl FileSize {
    pub const ZERO: FileSize = FileSize(0);

    pub const KB: u64 = 1024;
    pub const MB: u64 = 1024 * 1024;
    pub const GB: u64 = 1024 * 1024 * 1024;

    #[inline]
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn from_kb(kb: u64) -> Self {
        Self(kb * Self::KB)
    }

    #[inline]
    pub const fn from_mb(mb: u64) -> Self {
        Self(mb * Self::MB)
    }

    #[inline]
    pub const fn bytes(&self) -> u64 {
        self.0
    }

    /// Safe subtraction: returns zero when `other > self`.
    #[inline]
    pub fn saturating_sub(&self, other: FileSize) -> FileSize {
        FileSize(self.0.saturating_sub(other.0))
    }

    #[inline]
    pub fn saturating_add(&self, other: FileSize) -> FileSize {
        FileSize(self.0.saturating_add(other.0))
    }

    /// Absolute difference between two sizes.
    #[inline]
    pub fn abs_diff(&self, other: FileSize) -> FileSize {
        FileSize(self.0.abs_diff(other.0))
    }

    /// Whether `self` is within `tolerance` of `target`.
    #[inline]
    pub fn within(&self, target: FileSize, tolerance: FileSize) -> bool {
        self.abs_diff(target) <= tolerance
    }

    /// Compression ratio `self / original`, `None` when `original` is zero.
    pub fn compression_ratio(&self, original: FileSize) -> Option<f64> {
        if original.0 == 0 {
            None
        } else {
            Some(self.0 as f64 / original.0 as f64)
        }
    }

    /// Human-readable formatting with auto-selected unit.
    pub fn display(&self) -> String {
        if self.0 >= Self::GB {
            format!("{:.2} GB", self.0 as f64 / Self::GB as f64)
        } else if self.0 >= Self::MB {
            format!("{:.2} MB", self.0 as f64 / Self::MB as f64)
        } else if self.0 >= Self::KB {
            format!("{:.2} KB", self.0 as f64 / Self::KB as f64)
        } else {
            format!("{} B", self.0)
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileSize({} = {})", self.0, self.display())
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Default for FileSize {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for FileSize {
    fn from(bytes: u64) -> Self {
        Self::new(bytes)
    }
}

impl From<FileSize> for u64 {
    fn from(size: FileSize) -> Self {
        size.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_size_creation() {
        assert_eq!(FileSize::new(1024).bytes(), 1024);
        assert_eq!(FileSize::from_kb(1).bytes(), 1024);
        assert_eq!(FileSize::from_mb(1).bytes(), 1024 * 1024);
    }

    #[test]
    fn test_saturating_sub() {
        let a = FileSize::new(100);
        let b = FileSize::new(30);

        assert_eq!(a.saturating_sub(b).bytes(), 70);
        assert_eq!(b.saturating_sub(a).bytes(), 0);
        assert_eq!(a.saturating_sub(a).bytes(), 0);
    }

    #[test]
    fn test_abs_diff_symmetric() {
        let a = FileSize::new(1000);
        let b = FileSize::new(400);
        assert_eq!(a.abs_diff(b).bytes(), 600);
        assert_eq!(b.abs_diff(a).bytes(), 600);
    }

    #[test]
    fn test_within_tolerance() {
        let target = FileSize::from_mb(1);
        let tol = FileSize::from_kb(100);

        assert!(FileSize::new(1048576).within(target, tol));
        assert!(FileSize::new(1048576 + 102400).within(target, tol));
        assert!(!FileSize::new(1048576 + 102401).within(target, tol));
    }

    #[test]
    fn test_compression_ratio() {
        let output = FileSize::new(500);
        let input = FileSize::new(1000);
        assert_eq!(output.compression_ratio(input), Some(0.5));
        assert_eq!(output.compression_ratio(FileSize::ZERO), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FileSize::new(500).display(), "500 B");
        assert_eq!(FileSize::new(1024).display(), "1.00 KB");
        assert_eq!(FileSize::new(1024 * 1024).display(), "1.00 MB");
        assert_eq!(FileSize::new(1024 * 1024 * 1024).display(), "1.00 GB");
    }
}
