//! Headless surfaces: draw nothing, count everything.
//!
//! Used by the console front end (which has no window to draw into) and by
//! tests that need to observe the render lifecycle.  All surfaces created by
//! one [`HeadlessProvider`] report into the same [`SurfaceStats`].

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use carcfg_core::Scene;
use tracing::trace;

use super::{RenderError, RenderSurface, SurfaceProvider, Viewport};

/// Counters shared by a provider and all its surfaces.
#[derive(Debug, Default)]
pub struct SurfaceStats {
    created: AtomicUsize,
    released: AtomicUsize,
    frames: AtomicU64,
    /// Bits of the body yaw in the most recent frame.
    last_body_yaw: AtomicU32,
    /// Number of upcoming draws that should fail.
    pending_failures: AtomicUsize,
}

impl SurfaceStats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Surfaces created but not yet released.
    pub fn live(&self) -> usize {
        self.created().saturating_sub(self.released())
    }

    /// Frames drawn successfully across all surfaces.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }

    pub fn last_body_yaw(&self) -> f32 {
        f32::from_bits(self.last_body_yaw.load(Ordering::SeqCst))
    }

    fn take_failure(&self) -> bool {
        self.pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Creates [`HeadlessSurface`]s.
#[derive(Debug, Clone, Default)]
pub struct HeadlessProvider {
    stats: Arc<SurfaceStats>,
}

impl HeadlessProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<SurfaceStats> {
        Arc::clone(&self.stats)
    }

    /// Makes the next `count` draws on any surface fail.
    pub fn fail_next_draws(&self, count: usize) {
        self.stats.pending_failures.store(count, Ordering::SeqCst);
    }
}

impl SurfaceProvider for HeadlessProvider {
    fn create(&self, viewport: Viewport) -> Result<Box<dyn RenderSurface>, RenderError> {
        self.stats.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(HeadlessSurface {
            viewport,
            released: false,
            stats: Arc::clone(&self.stats),
        }))
    }
}

/// A surface that records frames instead of drawing them.
#[derive(Debug)]
pub struct HeadlessSurface {
    viewport: Viewport,
    released: bool,
    stats: Arc<SurfaceStats>,
}

impl RenderSurface for HeadlessSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        if self.released {
            return Err(RenderError::Released);
        }
        if self.stats.take_failure() {
            return Err(RenderError::Draw("injected failure".to_string()));
        }
        self.stats
            .last_body_yaw
            .store(scene.body_yaw().to_bits(), Ordering::SeqCst);
        self.stats.frames.fetch_add(1, Ordering::SeqCst);
        trace!(
            "headless frame: {} meshes, aspect {:.3}",
            scene.meshes().len(),
            self.viewport.aspect()
        );
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.stats.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}
