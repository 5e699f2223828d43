//! Target-size PDF compression.
//!
//! This crate drives an external renderer (Ghostscript by default) toward a
//! caller-specified output size:
//! - Type-safe knobs and sizes (`Quality`, `Dpi`, `FileSize`)
//! - The renderer boundary and its Ghostscript implementation
//! - The bounded target-size search itself
//! - Crop-region pass-through and persistence
//! - Parallel batch fan-out over independent documents
//! - Common logging setup
//!
//! The heavy lifting (rasterization, recompression) always happens in the
//! external tool; this crate measures, nudges parameters, and retries within
//! a fixed budget.

pub mod batch;
pub mod crop;
pub mod errors;
pub mod logging;
pub mod render;
pub mod search;
pub mod types;

pub use batch::{run_batch, run_batch_with, BatchConfig, BatchSummary, CompressJob, JobStatus};
pub use crop::{load_crop_regions, save_crop_regions, CropRegion};
pub use errors::{PdfShrinkError, Result};
pub use render::{
    is_ghostscript_available, GhostscriptRenderer, RenderParameters, RenderResult, Renderer,
    DEFAULT_RENDER_TIMEOUT,
};
pub use search::{
    find_target_size, SearchConfig, SearchOutcome, TargetSizeSearch, DEFAULT_DPI_STEP,
    DEFAULT_MAX_ITERATIONS, DEFAULT_QUALITY_STEP, DEFAULT_TOLERANCE,
};
pub use types::{Dpi, DpiBounds, FileSize, Quality};
