//! Type-safe wrappers for the compression knobs and sizes.
//!
//! All three newtypes validate on construction and saturate when stepped, so
//! the search loop never has to re-check ranges mid-flight.

pub mod dpi;
pub mod file_size;
pub mod quality;

pub use dpi::{Dpi, DpiBounds, DpiError, DEFAULT_DPI_CEILING, DEFAULT_DPI_FLOOR};
pub use file_size::FileSize;
pub use quality::{Quality, QualityOutOfRange};
