//! UI command bridge: exposes the configurator to a front end.
//!
//! Every front end (the console in `main.rs`, or a webview shell) talks to
//! the application exclusively through the async command functions in this
//! module.  Each command takes the shared [`AppState`], does its work under
//! the state's locks, and answers with a JSON-serialisable DTO.
//!
//! # Data Transfer Objects (DTOs)
//!
//! The core crate's view models borrow from static catalogs and use newtype
//! ids.  DTOs are flat, owned structs (`ColorChoiceDto`, `PreviewDto`, ...)
//! that:
//!
//! - Contain only JSON-serialisable fields (`String`, `bool`, `f32`, ...)
//! - Are built from the view models with `From` impls, so the projection
//!   logic stays in `carcfg-core`.
//!
//! # `CommandResult<T>` wrapper
//!
//! All commands return `CommandResult<T>` rather than `Result<T, E>`.
//! This ensures every command response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.
//!
//! # Lock order
//!
//! Commands that touch both the controller and the viewer lock the
//! controller first, copy the configuration out, release it, and only then
//! lock the viewer.

use std::sync::Arc;

use carcfg_core::{
    view::{AccessoryChoice, AccessorySelector, ColorChoice, ColorSelector, NavBar, PreviewPanel, PreviewSection},
    PageLocation, PointerEvent, ShareError, ACCESSORIES, COLORS,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::application::configure::{Configurator, ShareOutcome};
use crate::infrastructure::{
    clipboard::ClipboardWriter,
    render::{
        viewer::{CarViewer, ViewerSettings},
        SurfaceProvider, Viewport,
    },
    storage::{config::AppConfig, KeyValueStore},
};

// ── Shared application state ──────────────────────────────────────────────────

/// The adapters the application state is wired to.
pub struct Ports {
    pub store: Arc<dyn KeyValueStore>,
    pub clipboard: Arc<dyn ClipboardWriter>,
    pub surfaces: Arc<dyn SurfaceProvider>,
}

/// Application state shared between commands.
///
/// All fields are `Mutex<...>` (async Tokio mutex) because commands run in
/// an async context, and the viewer lock is held across the awaits that stop
/// and restart the render loop.
pub struct AppState {
    /// The root controller owning the configuration.
    pub configurator: Mutex<Configurator>,
    /// The 3D viewer showing the configuration.
    pub viewer: Mutex<CarViewer>,
}

impl AppState {
    /// Builds the application state from settings and adapters.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::Url`] if `config.app.base_url` is not an absolute URL.
    pub fn new(config: AppConfig, ports: Ports) -> Result<Arc<Self>, ShareError> {
        let location = PageLocation::parse(&config.app.base_url)?;
        let configurator = Configurator::new(
            location,
            config.storage.storage_key.clone(),
            ports.store,
            ports.clipboard,
        );
        let viewer = CarViewer::new(
            ports.surfaces,
            ViewerSettings {
                viewport: Viewport::new(config.viewer.width, config.viewer.height),
                frame_rate_hz: config.viewer.frame_rate_hz,
                rotation_sensitivity: config.viewer.rotation_sensitivity,
            },
        );

        Ok(Arc::new(Self {
            configurator: Mutex::new(configurator),
            viewer: Mutex::new(viewer),
        }))
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavBarDto {
    pub logo: String,
    pub title: String,
    pub user_menu_icon: String,
}

impl From<&NavBar> for NavBarDto {
    fn from(n: &NavBar) -> Self {
        Self {
            logo: n.logo.to_string(),
            title: n.title.to_string(),
            user_menu_icon: n.user_menu_icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorChoiceDto {
    pub id: String,
    pub name: String,
    pub hex: String,
    pub checked: bool,
}

impl From<&ColorChoice> for ColorChoiceDto {
    fn from(c: &ColorChoice) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.to_string(),
            hex: c.hex.to_string(),
            checked: c.checked,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessoryChoiceDto {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub checked: bool,
}

impl From<&AccessoryChoice> for AccessoryChoiceDto {
    fn from(a: &AccessoryChoice) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name.to_string(),
            icon: a.icon.to_string(),
            checked: a.checked,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewSectionDto {
    pub color: String,
    pub accessories: Vec<String>,
    /// Accessory line as displayed, `"None"` when empty.
    pub accessories_label: String,
}

impl From<&PreviewSection> for PreviewSectionDto {
    fn from(s: &PreviewSection) -> Self {
        Self {
            color: s.color.clone(),
            accessories: s.accessories.clone(),
            accessories_label: s.accessories_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewDto {
    pub live: PreviewSectionDto,
    pub saved: Option<PreviewSectionDto>,
    /// The whole panel as plain text.
    pub text: String,
}

impl From<&PreviewPanel> for PreviewDto {
    fn from(p: &PreviewPanel) -> Self {
        Self {
            live: PreviewSectionDto::from(&p.live),
            saved: p.saved.as_ref().map(PreviewSectionDto::from),
            text: p.to_string(),
        }
    }
}

/// Result of a share.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareDto {
    pub url: String,
    pub copied: bool,
}

impl From<&ShareOutcome> for ShareDto {
    fn from(s: &ShareOutcome) -> Self {
        Self {
            url: s.url.clone(),
            copied: s.copied,
        }
    }
}

/// Everything a front end needs to draw the configurator page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfiguratorViewDto {
    pub nav: NavBarDto,
    pub colors: Vec<ColorChoiceDto>,
    pub accessories: Vec<AccessoryChoiceDto>,
    pub preview: PreviewDto,
    pub last_share: Option<ShareDto>,
    /// Body yaw in radians while the viewer is mounted.
    pub body_yaw: Option<f32>,
}

/// A pointer event as sent by a front end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEventDto {
    Down { x: f32 },
    Move { x: f32 },
    Up,
    Leave,
}

impl From<PointerEventDto> for PointerEvent {
    fn from(dto: PointerEventDto) -> Self {
        match dto {
            PointerEventDto::Down { x } => PointerEvent::Down { x },
            PointerEventDto::Move { x } => PointerEvent::Move { x },
            PointerEventDto::Up => PointerEvent::Up,
            PointerEventDto::Leave => PointerEvent::Leave,
        }
    }
}

/// Unified response wrapper used by all commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

async fn build_view(state: &AppState) -> ConfiguratorViewDto {
    let (current, preview, last_share) = {
        let configurator = state.configurator.lock().await;
        let current = configurator.current().clone();
        let preview = PreviewPanel::project(&current, configurator.saved());
        let last_share = configurator.last_share().map(ShareDto::from);
        (current, preview, last_share)
    };
    let body_yaw = state.viewer.lock().await.body_yaw().await;

    ConfiguratorViewDto {
        nav: NavBarDto::from(&NavBar::new()),
        colors: ColorSelector::new(&COLORS)
            .choices(&current.color)
            .iter()
            .map(ColorChoiceDto::from)
            .collect(),
        accessories: AccessorySelector::new(&ACCESSORIES)
            .choices(&current.accessories)
            .iter()
            .map(AccessoryChoiceDto::from)
            .collect(),
        preview: PreviewDto::from(&preview),
        last_share,
        body_yaw,
    }
}

/// Pushes the controller's configuration to the viewer if it is mounted.
async fn sync_viewer(state: &AppState) -> Result<(), String> {
    let current = state.configurator.lock().await.current().clone();
    let mut viewer = state.viewer.lock().await;
    if viewer.is_mounted() {
        viewer.reconfigure(&current).await.map_err(|e| e.to_string())?;
    }
    Ok(())
}

async fn view_after_change(state: &AppState) -> CommandResult<ConfiguratorViewDto> {
    if let Err(e) = sync_viewer(state).await {
        return CommandResult::err(format!("viewer rebuild failed: {e}"));
    }
    CommandResult::ok(build_view(state).await)
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the full page view.
pub async fn get_view(state: Arc<AppState>) -> CommandResult<ConfiguratorViewDto> {
    CommandResult::ok(build_view(&state).await)
}

/// Mounts the viewer on the current configuration.
pub async fn mount_viewer(state: Arc<AppState>) -> CommandResult<()> {
    let current = state.configurator.lock().await.current().clone();
    match state.viewer.lock().await.mount(&current).await {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Stops rendering and releases the viewer's surface.
pub async fn unmount_viewer(state: Arc<AppState>) -> CommandResult<()> {
    state.viewer.lock().await.unmount().await;
    CommandResult::ok(())
}

/// Selects a paint color.
///
/// The id must name a control of the color selector.
pub async fn select_color(state: Arc<AppState>, id: String) -> CommandResult<ConfiguratorViewDto> {
    let Some(event) = ColorSelector::new(&COLORS).activate(id.trim()) else {
        return CommandResult::err(format!("no color '{id}' in the catalog"));
    };
    state.configurator.lock().await.apply(event);
    view_after_change(&state).await
}

/// Adds or removes an accessory.
///
/// The id must name a checkbox of the accessory selector.
pub async fn toggle_accessory(
    state: Arc<AppState>,
    id: String,
) -> CommandResult<ConfiguratorViewDto> {
    let Some(event) = AccessorySelector::new(&ACCESSORIES).activate(id.trim()) else {
        return CommandResult::err(format!("no accessory '{id}' in the catalog"));
    };
    state.configurator.lock().await.apply(event);
    view_after_change(&state).await
}

/// Saves the current configuration to the durable store.
pub async fn save_configuration(state: Arc<AppState>) -> CommandResult<ConfiguratorViewDto> {
    if let Err(e) = state.configurator.lock().await.save() {
        return CommandResult::err(format!("failed to save configuration: {e}"));
    }
    CommandResult::ok(build_view(&state).await)
}

/// Reads the stored configuration into the saved snapshot.
///
/// `data` is `true` if a stored configuration was found.
pub async fn load_saved_configuration(state: Arc<AppState>) -> CommandResult<bool> {
    match state.configurator.lock().await.load_saved() {
        Ok(found) => CommandResult::ok(found),
        Err(e) => CommandResult::err(format!("failed to load configuration: {e}")),
    }
}

/// Creates a share link and tries to copy it to the clipboard.
pub async fn share_configuration(state: Arc<AppState>) -> CommandResult<ShareDto> {
    match state.configurator.lock().await.share().await {
        Ok(outcome) => CommandResult::ok(ShareDto::from(&outcome)),
        Err(e) => CommandResult::err(format!("failed to share configuration: {e}")),
    }
}

/// Feeds a pointer event to the viewer; returns the body yaw in radians.
pub async fn pointer_event(state: Arc<AppState>, event: PointerEventDto) -> CommandResult<f32> {
    match state.viewer.lock().await.pointer(event.into()).await {
        Ok(yaw) => CommandResult::ok(yaw),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Restores the configuration encoded in a share URL.
///
/// `data` is `true` if a configuration was restored.  An unusable URL is not
/// an error; it simply restores nothing.
pub async fn restore_from_url(state: Arc<AppState>, url: String) -> CommandResult<bool> {
    let restored = state.configurator.lock().await.restore_from_url(&url);
    if restored {
        if let Err(e) = sync_viewer(&state).await {
            return CommandResult::err(format!("viewer rebuild failed: {e}"));
        }
    }
    CommandResult::ok(restored)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
