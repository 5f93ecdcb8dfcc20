//! FILENAME: app/src/surface.rs
// PURPOSE: Seam to the external chart renderer.
// CONTEXT: The renderer draws a series onto a named surface and can later
// snapshot it as PNG. All renders finish before any capture starts; captures
// then run concurrently and a failed one only blanks its own grid slot. A
// snapshot that is not a PNG counts as a failed capture.

use async_trait::async_trait;
use futures::future::join_all;
use persistence::ChartImage;
use report_engine::{ChartKind, SeriesPoint};
use thiserror::Error;

use crate::log_warn;
use crate::logging::CAT_CAPTURE;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("No visualization surface available")]
    SurfaceMissing,

    #[error("Surface '{0}' has not finished rendering")]
    RenderIncomplete(String),

    #[error("Capture of '{surface}' failed: {reason}")]
    Failed { surface: String, reason: String },
}

#[async_trait]
pub trait VisualizationSurface: Send + Sync {
    /// Draws `series` on the surface named `surface_id`.
    async fn render(&self, surface_id: &str, series: &[SeriesPoint]) -> Result<(), CaptureError>;

    /// Snapshots a rendered surface as PNG.
    async fn capture(&self, surface_id: &str) -> Result<ChartImage, CaptureError>;
}

/// Renders every chart, then captures them all concurrently.
///
/// Returns one entry per input chart, in input order. A chart whose render or
/// capture failed, or whose snapshot is not a PNG, is `None`; the error is
/// logged and the rest carry on.
pub async fn capture_charts(
    surface: &dyn VisualizationSurface,
    charts: &[(ChartKind, Vec<SeriesPoint>)],
) -> Vec<Option<ChartImage>> {
    let mut rendered = Vec::with_capacity(charts.len());
    for (kind, series) in charts {
        match surface.render(kind.surface_id(), series).await {
            Ok(()) => rendered.push(true),
            Err(e) => {
                log_warn!(CAT_CAPTURE, "render of {} failed: {}", kind.surface_id(), e);
                rendered.push(false);
            }
        }
    }

    let captures = charts.iter().zip(rendered).map(|((kind, _), ok)| async move {
        if !ok {
            return None;
        }
        match surface.capture(kind.surface_id()).await {
            Ok(image) if image.is_png() => Some(image),
            Ok(image) => {
                log_warn!(
                    CAT_CAPTURE,
                    "{}",
                    CaptureError::Failed {
                        surface: kind.surface_id().to_string(),
                        reason: format!("snapshot is not a PNG ({} bytes)", image.png.len()),
                    }
                );
                None
            }
            Err(e) => {
                log_warn!(CAT_CAPTURE, "{}", e);
                None
            }
        }
    });

    join_all(captures).await
}
