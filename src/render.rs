//! Renderer Boundary
//!
//! The search only needs one capability: turn a document plus a
//! `(quality, dpi)` pair into an output file whose size can be measured. The
//! [`Renderer`] trait is that boundary; [`GhostscriptRenderer`] is the
//! production implementation, shelling out to `gs` the same way the video
//! tools shell out to ffmpeg.

use crate::crop::CropRegion;
use crate::errors::{PdfShrinkError, Result};
use crate::types::{Dpi, FileSize, Quality};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// The two knobs the search is allowed to turn. Immutable per render; the
/// search produces a fresh value each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderParameters {
    pub quality: Quality,
    pub dpi: Dpi,
}

impl fmt::Display for RenderParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quality={} dpi={}", self.quality, self.dpi)
    }
}

/// One render's output: where the artifact landed and how big it is.
/// The artifact at `output` is overwritten by the next render; only the most
/// recent one survives.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub output: PathBuf,
    pub size: FileSize,
}

/// Capability consumed by the target-size search.
///
/// Implementations must be approximately deterministic: the same document and
/// parameters should yield roughly the same output size, or the feedback loop
/// driving them is meaningless.
pub trait Renderer {
    fn render(&mut self, document: &Path, params: RenderParameters) -> Result<RenderResult>;
}

/// Default per-render timeout. Ghostscript on a pathological scan can stall
/// for a long time; the search must not hang with it.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(120);

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Check whether `gs` is on PATH.
pub fn is_ghostscript_available() -> bool {
    which::which("gs").is_ok()
}

/// Renderer backed by the Ghostscript `pdfwrite` device.
///
/// Quality maps to the JPEG encoder (`-dJPEGQ`), resolution to image
/// downsampling (`-dColorImageResolution` and friends). Grayscale conversion
/// is on by default, matching how scanned documents are usually shrunk.
pub struct GhostscriptRenderer {
    gs_path: PathBuf,
    output: PathBuf,
    grayscale: bool,
    crop_regions: Vec<CropRegion>,
    timeout: Duration,
}

impl GhostscriptRenderer {
    /// Create a renderer writing to `output`. Fails fast if `gs` is missing.
    pub fn new(output: impl Into<PathBuf>) -> Result<Self> {
        let gs_path = which::which("gs")
            .map_err(|_| PdfShrinkError::ToolNotFound("gs (Ghostscript)".to_string()))?;
        Ok(Self {
            gs_path,
            output: output.into(),
            grayscale: true,
            crop_regions: Vec::new(),
            timeout: DEFAULT_RENDER_TIMEOUT,
        })
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Crop regions are consumed opaquely; how they were selected is not this
    /// crate's concern. With `pdfwrite` only a single box can be applied per
    /// run, so the first region is used for all pages.
    pub fn with_crop_regions(mut self, regions: Vec<CropRegion>) -> Self {
        self.crop_regions = regions;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    fn build_args(&self, document: &Path, params: RenderParameters) -> Vec<String> {
        let dpi = params.dpi.value();
        let mut args: Vec<String> = vec![
            "-q".into(),
            "-dBATCH".into(),
            "-dNOPAUSE".into(),
            "-dSAFER".into(),
            "-sDEVICE=pdfwrite".into(),
            "-dCompatibilityLevel=1.4".into(),
            format!("-sOutputFile={}", self.output.display()),
            "-dDownsampleColorImages=true".into(),
            "-dDownsampleGrayImages=true".into(),
            "-dDownsampleMonoImages=true".into(),
            format!("-dColorImageResolution={}", dpi),
            format!("-dGrayImageResolution={}", dpi),
            format!("-dMonoImageResolution={}", dpi),
            "-dColorImageDownsampleType=/Bicubic".into(),
            "-dGrayImageDownsampleType=/Bicubic".into(),
            "-dAutoFilterColorImages=false".into(),
            "-dAutoFilterGrayImages=false".into(),
            "-dColorImageFilter=/DCTEncode".into(),
            "-dGrayImageFilter=/DCTEncode".into(),
            format!("-dJPEGQ={}", params.quality.value()),
        ];

        if self.grayscale {
            args.push("-sColorConversionStrategy=Gray".into());
            args.push("-dProcessColorModel=/DeviceGray".into());
        }

        if let Some(region) = self.crop_regions.first() {
            args.push("-c".into());
            args.push(format!(
                "[/CropBox [{} {} {} {}] /PAGES pdfmark",
                region.left, region.top, region.right, region.bottom
            ));
            args.push("-f".into());
        }

        args.push(document.display().to_string());
        args
    }
}

impl Renderer for GhostscriptRenderer {
    fn render(&mut self, document: &Path, params: RenderParameters) -> Result<RenderResult> {
        let args = self.build_args(document, params);
        debug!(document = ?document, %params, "Invoking Ghostscript");

        let mut child = Command::new(&self.gs_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PdfShrinkError::RendererFailure(format!("failed to spawn gs: {}", e)))?;

        // Drain stderr on a separate thread so a chatty gs cannot fill the
        // pipe and deadlock the timeout poll below.
        let mut stderr = child.stderr.take();
        let stderr_thread = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(ref mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut buf);
            }
            buf
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        error!(document = ?document, timeout = ?self.timeout, "Ghostscript timed out");
                        return Err(PdfShrinkError::RendererTimeout(self.timeout));
                    }
                    std::thread::sleep(WAIT_POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(PdfShrinkError::RendererFailure(format!(
                        "failed to wait for gs: {}",
                        e
                    )))
                }
            }
        };

        let stderr_output = stderr_thread.join().unwrap_or_default();

        if !status.success() {
            error!(
                exit_code = status.code(),
                stderr_output = %stderr_output,
                "Ghostscript failed"
            );
            return Err(PdfShrinkError::RendererFailure(format!(
                "gs exited with {:?}: {}",
                status.code(),
                stderr_output.trim()
            )));
        }

        let size = FileSize::new(std::fs::metadata(&self.output)?.len());
        info!(output = ?self.output, size = %size, %params, "Render complete");

        Ok(RenderResult {
            output: self.output.clone(),
            size,
        })
    }
}
