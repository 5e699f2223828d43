//! Target-Size Search
//!
//! The one piece of real control flow in this crate: a bounded hill-climb
//! that nudges `(quality, dpi)` until the rendered output lands within a
//! tolerance of the requested size, or the iteration budget runs out.
//!
//! This is deliberately a step search and not a bisection. For documents with
//! few or no raster images the size-vs-parameter function is flat or noisy,
//! and bisection assumes a monotonicity the renderer does not guarantee.
//! Step-wise nudging degrades gracefully: it just spends its budget and
//! reports the best it saw.

use crate::errors::{PdfShrinkError, Result};
use crate::render::{RenderParameters, Renderer};
use crate::types::{Dpi, DpiBounds, FileSize, Quality};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default convergence window, matching the original 0.1 MB check.
pub const DEFAULT_TOLERANCE: FileSize = FileSize::from_kb(100);

/// Hard cap on renderer invocations per search.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

pub const DEFAULT_QUALITY_STEP: u8 = 5;

pub const DEFAULT_DPI_STEP: u32 = 10;

/// Tunables for one search call. Everything has a sensible default except the
/// target itself.
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub target: FileSize,
    pub tolerance: FileSize,
    pub max_iterations: u32,
    pub quality_step: u8,
    pub dpi_step: u32,
    pub dpi_bounds: DpiBounds,
}

impl SearchConfig {
    pub fn new(target: FileSize) -> Self {
        Self {
            target,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            quality_step: DEFAULT_QUALITY_STEP,
            dpi_step: DEFAULT_DPI_STEP,
            dpi_bounds: DpiBounds::default(),
        }
    }

    pub fn with_tolerance(mut self, tolerance: FileSize) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_steps(mut self, quality_step: u8, dpi_step: u32) -> Self {
        self.quality_step = quality_step;
        self.dpi_step = dpi_step;
        self
    }

    pub fn with_dpi_bounds(mut self, bounds: DpiBounds) -> Self {
        self.dpi_bounds = bounds;
        self
    }
}

/// Final state of a search. `converged == false` is a soft outcome, not an
/// error: the budget ran out and `params`/`achieved` are best-effort.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SearchOutcome {
    pub params: RenderParameters,
    pub achieved: FileSize,
    /// Renderer invocations spent.
    pub iterations: u32,
    pub converged: bool,
}

/// Bounded hill-climb toward a target output size.
#[derive(Debug, Clone)]
pub struct TargetSizeSearch {
    config: SearchConfig,
}

impl TargetSizeSearch {
    /// Validate the configuration eagerly; no renderer invocation happens for
    /// a rejected config.
    pub fn new(config: SearchConfig) -> Result<Self> {
        if config.target.is_zero() {
            return Err(PdfShrinkError::InvalidTarget(
                "target size must be positive".to_string(),
            ));
        }
        if config.max_iterations == 0 {
            return Err(PdfShrinkError::InvalidTarget(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if config.quality_step == 0 || config.dpi_step == 0 {
            return Err(PdfShrinkError::InvalidTarget(
                "step sizes must be positive".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search. Renderer errors abort immediately; exhausting the
    /// budget does not.
    pub fn run<R: Renderer>(
        &self,
        renderer: &mut R,
        document: &Path,
        initial: RenderParameters,
    ) -> Result<SearchOutcome> {
        let cfg = &self.config;
        if !cfg.dpi_bounds.contains(initial.dpi.value()) {
            return Err(PdfShrinkError::InvalidTarget(format!(
                "initial DPI {} outside bounds [{}, {}]",
                initial.dpi, cfg.dpi_bounds.floor, cfg.dpi_bounds.ceiling
            )));
        }

        let mut params = initial;
        let mut iteration = 0u32;

        loop {
            let result = renderer.render(document, params)?;
            let achieved = result.size;
            iteration += 1;

            debug!(
                iteration,
                %params,
                achieved = %achieved,
                target = %cfg.target,
                "Render measured"
            );

            if achieved.within(cfg.target, cfg.tolerance) {
                info!(
                    iteration,
                    %params,
                    achieved = %achieved,
                    "Target size reached"
                );
                return Ok(SearchOutcome {
                    params,
                    achieved,
                    iterations: iteration,
                    converged: true,
                });
            }

            if iteration >= cfg.max_iterations {
                warn!(
                    iterations = iteration,
                    %params,
                    achieved = %achieved,
                    target = %cfg.target,
                    "Iteration budget exhausted, returning best effort"
                );
                return Ok(SearchOutcome {
                    params,
                    achieved,
                    iterations: iteration,
                    converged: false,
                });
            }

            params = if achieved > cfg.target {
                // Too big: pull both knobs down. Moving quality and DPI
                // together converges in fewer renders than one knob alone.
                RenderParameters {
                    quality: params.quality.step_down(cfg.quality_step),
                    dpi: params.dpi.step_down(cfg.dpi_step, cfg.dpi_bounds),
                }
            } else {
                // Too small: there is headroom, climb back up.
                RenderParameters {
                    quality: params.quality.step_up(cfg.quality_step),
                    dpi: params.dpi.step_up(cfg.dpi_step, cfg.dpi_bounds),
                }
            };
        }
    }
}

/// Convenience entry point with all defaults: render `document` toward
/// `target`, starting from `(initial_quality, initial_dpi)`.
pub fn find_target_size<R: Renderer>(
    renderer: &mut R,
    document: &Path,
    target: FileSize,
    initial_quality: Quality,
    initial_dpi: Dpi,
) -> Result<SearchOutcome> {
    let search = TargetSizeSearch::new(SearchConfig::new(target))?;
    search.run(
        renderer,
        document,
        RenderParameters {
            quality: initial_quality,
            dpi: initial_dpi,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderResult;
    use std::path::PathBuf;

    /// Deterministic renderer: size is linear in both knobs.
    struct LinearRenderer {
        calls: u32,
    }

    impl Renderer for LinearRenderer {
        fn render(&mut self, _document: &Path, params: RenderParameters) -> Result<RenderResult> {
            self.calls += 1;
            let size = params.quality.value() as u64 * 10_000 + params.dpi.value() as u64 * 500;
            Ok(RenderResult {
                output: PathBuf::from("/tmp/linear.pdf"),
                size: FileSize::new(size),
            })
        }
    }

    fn initial(quality: u8, dpi: u32) -> RenderParameters {
        RenderParameters {
            quality: Quality::new(quality).unwrap(),
            dpi: Dpi::new(dpi, DpiBounds::default()).unwrap(),
        }
    }

    #[test]
    fn test_rejects_zero_target() {
        let err = TargetSizeSearch::new(SearchConfig::new(FileSize::ZERO));
        assert!(matches!(err, Err(PdfShrinkError::InvalidTarget(_))));
    }

    #[test]
    fn test_rejects_zero_budget_and_steps() {
        let target = FileSize::from_mb(1);
        assert!(TargetSizeSearch::new(SearchConfig::new(target).with_max_iterations(0)).is_err());
        assert!(TargetSizeSearch::new(SearchConfig::new(target).with_steps(0, 10)).is_err());
        assert!(TargetSizeSearch::new(SearchConfig::new(target).with_steps(5, 0)).is_err());
    }

    #[test]
    fn test_rejects_initial_dpi_outside_bounds_without_render() {
        let bounds = DpiBounds::new(200, 300).unwrap();
        let search =
            TargetSizeSearch::new(SearchConfig::new(FileSize::from_mb(1)).with_dpi_bounds(bounds))
                .unwrap();

        let mut renderer = LinearRenderer { calls: 0 };
        // 160 is valid against the default bounds but not against [200, 300]
        let result = search.run(&mut renderer, Path::new("doc.pdf"), initial(50, 160));

        assert!(matches!(result, Err(PdfShrinkError::InvalidTarget(_))));
        assert_eq!(renderer.calls, 0, "no render before validation");
    }

    #[test]
    fn test_converges_on_linear_renderer() {
        let mut renderer = LinearRenderer { calls: 0 };
        let outcome = find_target_size(
            &mut renderer,
            Path::new("doc.pdf"),
            FileSize::new(1_000_000),
            Quality::new(50).unwrap(),
            Dpi::new(160, DpiBounds::default()).unwrap(),
        )
        .unwrap();

        assert!(outcome.converged);
        assert!(outcome.iterations <= DEFAULT_MAX_ITERATIONS);
        assert!(outcome
            .achieved
            .within(FileSize::new(1_000_000), DEFAULT_TOLERANCE));
        assert_eq!(renderer.calls, outcome.iterations);
    }

    #[test]
    fn test_renderer_failure_propagates_immediately() {
        struct BrokenRenderer;
        impl Renderer for BrokenRenderer {
            fn render(&mut self, _: &Path, _: RenderParameters) -> Result<RenderResult> {
                Err(PdfShrinkError::RendererFailure("corrupt source".into()))
            }
        }

        let mut renderer = BrokenRenderer;
        let result = find_target_size(
            &mut renderer,
            Path::new("doc.pdf"),
            FileSize::from_mb(1),
            Quality::default(),
            Dpi::new(160, DpiBounds::default()).unwrap(),
        );
        assert!(matches!(result, Err(PdfShrinkError::RendererFailure(_))));
    }

    #[test]
    fn test_single_iteration_budget_returns_first_render() {
        let mut renderer = LinearRenderer { calls: 0 };
        let search = TargetSizeSearch::new(
            SearchConfig::new(FileSize::from_mb(50)).with_max_iterations(1),
        )
        .unwrap();

        let outcome = search
            .run(&mut renderer, Path::new("doc.pdf"), initial(50, 160))
            .unwrap();

        assert_eq!(outcome.iterations, 1);
        assert!(!outcome.converged);
        assert_eq!(renderer.calls, 1);
        // No adjustment ever happened
        assert_eq!(outcome.params.quality.value(), 50);
        assert_eq!(outcome.params.dpi.value(), 160);
    }

    #[test]
    fn test_dpi_holds_floor_while_quality_descends() {
        // Start at the DPI floor with an oversized output: only quality moves.
        let mut renderer = LinearRenderer { calls: 0 };
        let search = TargetSizeSearch::new(
            SearchConfig::new(FileSize::new(1_000)).with_max_iterations(3),
        )
        .unwrap();

        let outcome = search
            .run(&mut renderer, Path::new("doc.pdf"), initial(50, 160))
            .unwrap();

        assert!(!outcome.converged);
        assert_eq!(outcome.params.dpi.value(), 160);
        assert_eq!(outcome.params.quality.value(), 40); // two downward steps
    }
}
