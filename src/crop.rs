//! Crop Region Handling
//!
//! Crop rectangles arrive from an external collaborator (one per page) and are
//! passed through to the renderer untouched apart from validation. Selection
//! UIs persist them as JSON so a re-run can reuse earlier picks.

use crate::errors::{PdfShrinkError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One page's crop rectangle in page coordinates. Whoever produces the
/// regions and the renderer consuming them must agree on the origin; the
/// Ghostscript backend treats them as PDF crop boxes (points, origin
/// bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CropRegion {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        let region = Self {
            left,
            top,
            right,
            bottom,
        };
        region.validate()?;
        Ok(region)
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(PdfShrinkError::InvalidCrop(
                "coordinates must be finite".to_string(),
            ));
        }
        if self.right <= self.left || self.bottom <= self.top {
            return Err(PdfShrinkError::InvalidCrop(format!(
                "empty rectangle ({}, {}, {}, {})",
                self.left, self.top, self.right, self.bottom
            )));
        }
        Ok(())
    }

    /// Clamp the rectangle to a page of the given dimensions.
    pub fn clamp_to_page(&self, width: f64, height: f64) -> Self {
        Self {
            left: self.left.max(0.0),
            top: self.top.max(0.0),
            right: self.right.min(width),
            bottom: self.bottom.min(height),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Load previously saved crop regions, `Ok(None)` when no file exists.
pub fn load_crop_regions(path: &Path) -> Result<Option<Vec<CropRegion>>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let regions: Vec<CropRegion> = serde_json::from_str(&contents)?;
    for region in &regions {
        region.validate()?;
    }
    debug!(path = ?path, count = regions.len(), "Loaded crop regions");
    Ok(Some(regions))
}

/// Persist crop regions so later runs skip re-selection.
pub fn save_crop_regions(path: &Path, regions: &[CropRegion]) -> Result<()> {
    let json = serde_json::to_string_pretty(regions)?;
    fs::write(path, json)?;
    debug!(path = ?path, count = regions.len(), "Saved crop regions");
    Ok(())
}
