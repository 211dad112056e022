//! The mounted 3D viewer.
//!
//! Owns, for the lifetime of one configuration: a surface, the scene built
//! for that configuration, the drag-rotate interaction, and the render loop.
//! A configuration change throws all of it away and builds it again, so body
//! rotation resets whenever color, accessories or model change.

use std::sync::Arc;

use carcfg_core::{build_scene, CarConfiguration, DragRotate, PointerEvent};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::render_loop::{Frame, RenderLoop};
use super::{RenderError, SurfaceProvider, Viewport};

/// Render settings for a [`CarViewer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerSettings {
    pub viewport: Viewport,
    pub frame_rate_hz: u32,
    pub rotation_sensitivity: f32,
}

struct Mounted {
    config: CarConfiguration,
    frame: Arc<Mutex<Frame>>,
    render_loop: RenderLoop,
}

/// Displays a [`CarConfiguration`] on a render surface.
pub struct CarViewer {
    provider: Arc<dyn SurfaceProvider>,
    settings: ViewerSettings,
    drag: DragRotate,
    mounted: Option<Mounted>,
}

impl CarViewer {
    pub fn new(provider: Arc<dyn SurfaceProvider>, settings: ViewerSettings) -> Self {
        Self {
            provider,
            drag: DragRotate::new(settings.rotation_sensitivity),
            settings,
            mounted: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// The configuration currently on screen.
    pub fn configuration(&self) -> Option<&CarConfiguration> {
        self.mounted.as_ref().map(|m| &m.config)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Creates the surface, builds the scene and starts the render loop.
    ///
    /// Mounting an already-mounted viewer behaves like [`reconfigure`](Self::reconfigure).
    ///
    /// # Errors
    ///
    /// Returns the provider's error if no surface can be created; the viewer
    /// stays unmounted.
    pub async fn mount(&mut self, config: &CarConfiguration) -> Result<(), RenderError> {
        if self.is_mounted() {
            self.reconfigure(config).await?;
            return Ok(());
        }
        self.build(config)?;
        info!("viewer mounted");
        Ok(())
    }

    /// Shows `config`, rebuilding everything if it differs from what is on
    /// screen.  Returns whether a rebuild happened.
    ///
    /// An unmounted viewer is mounted.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the new surface cannot be created; the
    /// viewer is left unmounted in that case.
    pub async fn reconfigure(&mut self, config: &CarConfiguration) -> Result<bool, RenderError> {
        if self.configuration() == Some(config) {
            return Ok(false);
        }
        self.teardown().await;
        self.build(config)?;
        debug!("viewer rebuilt for color {}", config.color);
        Ok(true)
    }

    /// Feeds a pointer event to the drag-rotate interaction.
    ///
    /// Returns the body yaw after the event.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotMounted`] if there is no surface to receive
    /// pointer events.
    pub async fn pointer(&mut self, event: PointerEvent) -> Result<f32, RenderError> {
        let mounted = self.mounted.as_ref().ok_or(RenderError::NotMounted)?;
        let mut frame = mounted.frame.lock().await;
        if let Some(delta) = self.drag.handle(event) {
            frame.scene.rotate_body(delta);
        }
        Ok(frame.scene.body_yaw())
    }

    /// Current body yaw in radians, if mounted.
    pub async fn body_yaw(&self) -> Option<f32> {
        match &self.mounted {
            Some(m) => Some(m.frame.lock().await.scene.body_yaw()),
            None => None,
        }
    }

    /// Stops rendering and releases the surface.  No-op when not mounted.
    pub async fn unmount(&mut self) {
        if self.is_mounted() {
            self.teardown().await;
            info!("viewer unmounted");
        }
    }

    fn build(&mut self, config: &CarConfiguration) -> Result<(), RenderError> {
        let surface = self.provider.create(self.settings.viewport)?;
        let frame = Arc::new(Mutex::new(Frame {
            scene: build_scene(config),
            surface,
        }));
        let render_loop = RenderLoop::start(Arc::clone(&frame), self.settings.frame_rate_hz);
        self.mounted = Some(Mounted {
            config: config.clone(),
            frame,
            render_loop,
        });
        Ok(())
    }

    async fn teardown(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        // Listeners go first so no drag survives into the next scene.
        self.drag.reset();
        mounted.render_loop.stop().await;
        mounted.frame.lock().await.surface.release();
    }
}

impl Drop for CarViewer {
    fn drop(&mut self) {
        // Release right away when the frame is free.  If the render task holds
        // the lock, the frame's own drop releases the surface once the aborted
        // task lets go of it.
        if let Some(mounted) = self.mounted.take() {
            drop(mounted.render_loop);
            if let Ok(mut frame) = mounted.frame.try_lock() {
                frame.surface.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::render::headless::HeadlessProvider;
    use carcfg_core::AccessoryId;

    fn make_viewer() -> (CarViewer, HeadlessProvider) {
        let provider = HeadlessProvider::new();
        let viewer = CarViewer::new(
            Arc::new(provider.clone()),
            ViewerSettings {
                viewport: Viewport::new(640, 360),
                frame_rate_hz: 120,
                rotation_sensitivity: 0.01,
            },
        );
        (viewer, provider)
    }

    #[tokio::test]
    async fn test_mount_creates_one_surface() {
        // Arrange
        let (mut viewer, provider) = make_viewer();

        // Act
        viewer.mount(&CarConfiguration::default()).await.expect("mount");

        // Assert
        assert!(viewer.is_mounted());
        assert_eq!(provider.stats().created(), 1);
        assert_eq!(provider.stats().live(), 1);
        viewer.unmount().await;
    }

    #[tokio::test]
    async fn test_reconfigure_with_same_configuration_is_noop() {
        let (mut viewer, provider) = make_viewer();
        let cfg = CarConfiguration::default();
        viewer.mount(&cfg).await.expect("mount");

        let rebuilt = viewer.reconfigure(&cfg.clone()).await.expect("reconfigure");

        assert!(!rebuilt);
        assert_eq!(provider.stats().created(), 1);
        viewer.unmount().await;
    }

    #[tokio::test]
    async fn test_reconfigure_releases_old_surface_and_resets_rotation() {
        // Arrange
        let (mut viewer, provider) = make_viewer();
        let cfg = CarConfiguration::default();
        viewer.mount(&cfg).await.expect("mount");
        viewer.pointer(PointerEvent::Down { x: 0.0 }).await.expect("down");
        let yaw = viewer.pointer(PointerEvent::Move { x: 50.0 }).await.expect("move");
        assert!((yaw - 0.5).abs() < 1e-6);

        // Act
        let next = cfg.with_accessory_toggled(&AccessoryId::from("spoiler"));
        let rebuilt = viewer.reconfigure(&next).await.expect("reconfigure");

        // Assert
        assert!(rebuilt);
        assert_eq!(provider.stats().created(), 2);
        assert_eq!(provider.stats().released(), 1);
        assert_eq!(viewer.body_yaw().await, Some(0.0));
        assert!(!viewer.is_dragging(), "drag must not survive a rebuild");
        viewer.unmount().await;
    }

    #[tokio::test]
    async fn test_pointer_requires_mounted_viewer() {
        let (mut viewer, _provider) = make_viewer();

        let result = viewer.pointer(PointerEvent::Down { x: 1.0 }).await;

        assert!(matches!(result, Err(RenderError::NotMounted)));
    }

    #[tokio::test]
    async fn test_drop_with_frame_locked_releases_surface_later() {
        // Arrange
        let (mut viewer, provider) = make_viewer();
        viewer.mount(&CarConfiguration::default()).await.expect("mount");
        let frame = Arc::clone(&viewer.mounted.as_ref().expect("mounted").frame);
        let guard = frame.lock().await;

        // Act
        drop(viewer);

        // Assert
        assert_eq!(provider.stats().live(), 1, "a locked frame cannot be released yet");
        drop(guard);
        drop(frame);
        // Let the runtime drop the aborted render task and its handle.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(provider.stats().live(), 0);
    }

    #[tokio::test]
    async fn test_unmount_releases_every_surface() {
        let (mut viewer, provider) = make_viewer();
        viewer.mount(&CarConfiguration::default()).await.expect("mount");

        viewer.unmount().await;

        assert!(!viewer.is_mounted());
        assert_eq!(provider.stats().live(), 0);
        assert_eq!(viewer.body_yaw().await, None);
    }
}
