//! Dpi Type-Safe Wrapper
//!
//! Raster resolution for re-rendered pages. Unlike [`Quality`](super::Quality)
//! the bounds are caller-configurable: scanned contracts tolerate a lower
//! floor than dense technical drawings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default floor below which scanned text becomes illegible.
pub const DEFAULT_DPI_FLOOR: u32 = 160;

/// Default ceiling; past this the output grows without visible gain.
pub const DEFAULT_DPI_CEILING: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DpiError {
    OutOfRange { value: u32, floor: u32, ceiling: u32 },
    InvalidBounds { floor: u32, ceiling: u32 },
}

impl fmt::Display for DpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DpiError::OutOfRange {
                value,
                floor,
                ceiling,
            } => write!(f, "DPI {} out of range [{}, {}]", value, floor, ceiling),
            DpiError::InvalidBounds { floor, ceiling } => {
                write!(f, "Invalid DPI bounds: floor {} > ceiling {}", floor, ceiling)
            }
        }
    }
}

impl std::error::Error for DpiError {}

/// Hard floor/ceiling for the resolution knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpiBounds {
    pub floor: u32,
    pub ceiling: u32,
}

impl DpiBounds {
    pub fn new(floor: u32, ceiling: u32) -> Result<Self, DpiError> {
        if floor == 0 || floor > ceiling {
            return Err(DpiError::InvalidBounds { floor, ceiling });
        }
        Ok(Self { floor, ceiling })
    }

    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        (self.floor..=self.ceiling).contains(&value)
    }
}

impl Default for DpiBounds {
    fn default() -> Self {
        Self {
            floor: DEFAULT_DPI_FLOOR,
            ceiling: DEFAULT_DPI_CEILING,
        }
    }
}

/// Type-safe raster resolution in dots per inch.
///
/// A `Dpi` value is always inside the bounds it was created with; stepping
/// takes the bounds again and saturates at them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dpi(u32);

impl Dpi {
    pub fn new(value: u32, bounds: DpiBounds) -> Result<Self, DpiError> {
        if !bounds.contains(value) {
            return Err(DpiError::OutOfRange {
                value,
                floor: bounds.floor,
                ceiling: bounds.ceiling,
            });
        }
        Ok(Self(value))
    }

    /// Clamp into `bounds` instead of erroring.
    pub fn clamped(value: u32, bounds: DpiBounds) -> Self {
        Self(value.clamp(bounds.floor, bounds.ceiling))
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Decrease by `step`, saturating at the floor.
    #[inline]
    pub fn step_down(&self, step: u32, bounds: DpiBounds) -> Self {
        Self(self.0.saturating_sub(step).max(bounds.floor))
    }

    /// Increase by `step`, saturating at the ceiling.
    #[inline]
    pub fn step_up(&self, step: u32, bounds: DpiBounds) -> Self {
        Self(self.0.saturating_add(step).min(bounds.ceiling))
    }

    #[inline]
    pub fn at_floor(&self, bounds: DpiBounds) -> bool {
        self.0 <= bounds.floor
    }

    #[inline]
    pub fn at_ceiling(&self, bounds: DpiBounds) -> bool {
        self.0 >= bounds.ceiling
    }
}

impl fmt::Debug for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dpi({})", self.0)
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dpi_valid_range() {
        let bounds = DpiBounds::default();
        assert!(Dpi::new(160, bounds).is_ok());
        assert!(Dpi::new(300, bounds).is_ok());
        assert!(Dpi::new(200, bounds).is_ok());

        assert!(Dpi::new(159, bounds).is_err());
        assert!(Dpi::new(301, bounds).is_err());
    }

    #[test]
    fn test_dpi_bounds_validation() {
        assert!(DpiBounds::new(160, 300).is_ok());
        assert!(DpiBounds::new(160, 160).is_ok());
        assert!(DpiBounds::new(300, 160).is_err());
        assert!(DpiBounds::new(0, 300).is_err());
    }

    #[test]
    fn test_dpi_step_saturates() {
        let bounds = DpiBounds::default();
        let dpi = Dpi::new(165, bounds).unwrap();
        assert_eq!(dpi.step_down(10, bounds).value(), 160);

        let dpi = Dpi::new(295, bounds).unwrap();
        assert_eq!(dpi.step_up(10, bounds).value(), 300);
    }

    #[test]
    fn test_dpi_clamped() {
        let bounds = DpiBounds::default();
        assert_eq!(Dpi::clamped(100, bounds).value(), 160);
        assert_eq!(Dpi::clamped(400, bounds).value(), 300);
        assert_eq!(Dpi::clamped(220, bounds).value(), 220);
    }

    #[test]
    fn test_custom_bounds() {
        let bounds = DpiBounds::new(72, 600).unwrap();
        assert!(Dpi::new(72, bounds).is_ok());
        assert!(Dpi::new(600, bounds).is_ok());
        assert!(Dpi::new(71, bounds).is_err());
    }
}
