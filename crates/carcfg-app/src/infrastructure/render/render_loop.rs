//! The repeating redraw task.
//!
//! # Cancellation (for beginners)
//!
//! A Tokio task keeps running until it returns or is aborted.  If the viewer
//! simply forgot about the task, it would keep drawing into a surface that
//! has already been released.  [`RenderLoop::stop`] therefore clears the
//! shared `running` flag, aborts the task, and *awaits* it: once `stop`
//! returns, no further draw can happen.
//!
//! Dropping a `RenderLoop` without calling `stop` still aborts the task, but
//! cannot wait for it.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use carcfg_core::Scene;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use super::RenderSurface;

/// The scene and the surface it is drawn on, shared between the viewer and
/// its render loop.
///
/// Dropping the frame releases the surface, so whichever side lets go of the
/// last handle (the viewer or an aborted render task) frees it.
pub struct Frame {
    pub scene: Scene,
    pub surface: Box<dyn RenderSurface>,
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.surface.release();
    }
}

/// Handle to a running redraw task.
pub struct RenderLoop {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    /// Spawns a task that draws `frame` `frame_rate_hz` times per second.
    ///
    /// Must be called from within a Tokio runtime.  A rate of zero is treated
    /// as one frame per second.
    pub fn start(frame: Arc<Mutex<Frame>>, frame_rate_hz: u32) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_task = Arc::clone(&running);
        let period = Duration::from_secs_f64(1.0 / f64::from(frame_rate_hz.max(1)));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if !running_task.load(Ordering::Relaxed) {
                    break;
                }

                let mut guard = frame.lock().await;
                let Frame { scene, surface } = &mut *guard;
                if let Err(e) = surface.draw(scene) {
                    warn!("render loop: {e}");
                }
            }
        });

        debug!("render loop started at {frame_rate_hz} Hz");
        Self {
            running,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancels the task and waits until it has fully stopped.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // Resolves with a cancellation error once the task is gone.
            let _ = handle.await;
        }
        debug!("render loop stopped");
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
