//! Render infrastructure for the 3D viewer.
//!
//! # Pieces (for beginners)
//!
//! - A **surface** ([`RenderSurface`]) is something a frame can be drawn on:
//!   a window, a canvas, an off-screen buffer.  It is created by a
//!   [`SurfaceProvider`] and must be released when the viewer is done with it.
//! - The **render loop** ([`render_loop::RenderLoop`]) is a repeating Tokio
//!   task that redraws the current scene at a fixed rate.  It does not
//!   animate anything; it just keeps the picture current while the user drags.
//! - The **viewer** ([`viewer::CarViewer`]) ties them together.  Every
//!   configuration change tears everything down and builds it again:
//!
//! ```text
//! reconfigure(new config)
//!   ├─ detach pointer listeners   (drag state back to Idle)
//!   ├─ stop render loop           (task aborted and awaited)
//!   ├─ release surface
//!   └─ create surface → build_scene → start render loop
//! ```
//!
//! The [`headless`] provider draws nothing and only counts, which is what the
//! console front end and the tests use.

use carcfg_core::Scene;
use thiserror::Error;

pub mod headless;
pub mod render_loop;
pub mod viewer;

/// Error type for surface and viewer operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The provider could not create a surface.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Drawing a frame failed.
    #[error("failed to draw frame: {0}")]
    Draw(String),

    /// The surface was used after `release`.
    #[error("render surface already released")]
    Released,

    /// The operation needs a mounted viewer.
    #[error("viewer is not mounted")]
    NotMounted,
}

/// Pixel size of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        carcfg_core::viewer::scene::Camera::aspect(self.width, self.height)
    }
}

/// A drawing target owned by one mounted viewer.
pub trait RenderSurface: Send {
    fn viewport(&self) -> Viewport;

    /// Draws one frame of `scene`.
    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError>;

    /// Frees the surface.  Draws after this fail with [`RenderError::Released`].
    /// Calling it again is a no-op.
    fn release(&mut self);
}

/// Creates render surfaces.
pub trait SurfaceProvider: Send + Sync {
    fn create(&self, viewport: Viewport) -> Result<Box<dyn RenderSurface>, RenderError>;
}
