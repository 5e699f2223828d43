//! Quality Type-Safe Wrapper
//!
//! JPEG quality with a hard floor: below 10 the re-rendered pages stop being
//! readable, so the search is never allowed to go there.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityOutOfRange {
    pub value: u8,
}

impl fmt::Display for QualityOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JPEG quality {} out of range [{}, {}]",
            self.value,
            Quality::MIN,
            Quality::MAX
        )
    }
}

impl std::error::Error for QualityOutOfRange {}

/// Type-safe JPEG quality value.
///
/// Valid range is `[10, 100]`. Construction validates; stepping saturates at
/// the bounds instead of wrapping or erroring.
///
/// # Examples
/// ```
/// use pdf_shrink::types::Quality;
///
/// let q = Quality::new(50).unwrap();
/// assert_eq!(q.step_down(5).value(), 45);
/// assert_eq!(Quality::new(12).unwrap().step_down(5).value(), 10);
/// assert!(Quality::new(5).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    /// Lowest quality that still produces readable output.
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 100;
    /// Starting point used by the original compressor.
    pub const DEFAULT: u8 = 50;

    pub fn new(value: u8) -> Result<Self, QualityOutOfRange> {
        if value < Self::MIN || value > Self::MAX {
            return Err(QualityOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Clamp into the valid range instead of erroring.
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn default_value() -> Self {
        Self(Self::DEFAULT)
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Decrease by `step`, saturating at the floor.
    #[inline]
    pub fn step_down(&self, step: u8) -> Self {
        Self(self.0.saturating_sub(step).max(Self::MIN))
    }

    /// Increase by `step`, saturating at the ceiling.
    #[inline]
    pub fn step_up(&self, step: u8) -> Self {
        Self(self.0.saturating_add(step).min(Self::MAX))
    }

    #[inline]
    pub fn at_floor(&self) -> bool {
        self.0 == Self::MIN
    }

    #[inline]
    pub fn at_ceiling(&self) -> bool {
        self.0 == Self::MAX
    }
}

impl fmt::Debug for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quality({})", self.0)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::default_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_valid_range() {
        assert!(Quality::new(10).is_ok());
        assert!(Quality::new(100).is_ok());
        assert!(Quality::new(50).is_ok());

        assert!(Quality::new(9).is_err());
        assert!(Quality::new(101).is_err());
        assert!(Quality::new(0).is_err());
    }

    #[test]
    fn test_quality_step_saturates() {
        let q = Quality::new(12).unwrap();
        assert_eq!(q.step_down(5).value(), 10);
        assert_eq!(q.step_down(200).value(), 10);

        let q = Quality::new(98).unwrap();
        assert_eq!(q.step_up(5).value(), 100);
        assert_eq!(q.step_up(200).value(), 100);
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(Quality::clamped(5).value(), 10);
        assert_eq!(Quality::clamped(200).value(), 100);
        assert_eq!(Quality::clamped(42).value(), 42);
    }

    #[test]
    fn test_quality_floor_ceiling_flags() {
        assert!(Quality::new(10).unwrap().at_floor());
        assert!(Quality::new(100).unwrap().at_ceiling());
        assert!(!Quality::new(55).unwrap().at_floor());
        assert!(!Quality::new(55).unwrap().at_ceiling());
    }
}
