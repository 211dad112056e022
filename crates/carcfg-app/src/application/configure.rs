//! Configurator: the root controller of the car configurator.
//!
//! Owns the current [`CarConfiguration`] and the last saved snapshot, applies
//! selector events to them, and implements the four user goals that reach
//! outside the process:
//!
//! | Operation            | Touches                 | Failure handling              |
//! |----------------------|-------------------------|-------------------------------|
//! | `save`               | key-value store         | returned to the caller        |
//! | `load_saved`         | key-value store         | store errors returned, bad JSON ignored |
//! | `share`              | clipboard               | copy failure logged, URL still returned |
//! | `restore_from_url`   | nothing (URL is input)  | any failure keeps the current configuration |
//!
//! # Architecture
//!
//! This use case depends only on the [`KeyValueStore`] and [`ClipboardWriter`]
//! traits and on `carcfg-core`.  Both ports are injected at construction
//! time, making the controller fully unit-testable.

use std::sync::Arc;

use carcfg_core::{
    decode_token, share_url, token_from_url, view::SelectorEvent, AccessoryId, CarConfiguration,
    ColorId, PageLocation, ShareError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::clipboard::ClipboardWriter;
use crate::infrastructure::storage::{KeyValueStore, StoreError};

/// Key the saved configuration is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "carConfiguratorConfig";

/// Error type for the configure use case.
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("failed to serialise configuration: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to build share link: {0}")]
    Share(#[from] ShareError),
}

/// Result of the most recent share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareOutcome {
    pub url: String,
    /// Whether the URL made it onto the clipboard.
    pub copied: bool,
}

/// The root controller.
pub struct Configurator {
    current: CarConfiguration,
    saved: Option<CarConfiguration>,
    last_share: Option<ShareOutcome>,
    location: PageLocation,
    storage_key: String,
    store: Arc<dyn KeyValueStore>,
    clipboard: Arc<dyn ClipboardWriter>,
}

impl Configurator {
    /// Creates a controller showing the default configuration.
    ///
    /// `location` is the page share links point back to.
    pub fn new(
        location: PageLocation,
        storage_key: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
        clipboard: Arc<dyn ClipboardWriter>,
    ) -> Self {
        Self {
            current: CarConfiguration::default(),
            saved: None,
            last_share: None,
            location,
            storage_key: storage_key.into(),
            store,
            clipboard,
        }
    }

    pub fn current(&self) -> &CarConfiguration {
        &self.current
    }

    /// The last configuration saved or loaded in this session.
    pub fn saved(&self) -> Option<&CarConfiguration> {
        self.saved.as_ref()
    }

    pub fn last_share(&self) -> Option<&ShareOutcome> {
        self.last_share.as_ref()
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    // ── State updates ─────────────────────────────────────────────────────────

    /// Replaces the color.  Ids outside the catalog are accepted.
    pub fn set_color(&mut self, color: ColorId) {
        if color.entry().is_none() {
            debug!("color {color} is not in the catalog");
        }
        self.current = self.current.with_color(color);
    }

    /// Adds `id` if absent, removes it if present.
    pub fn toggle_accessory(&mut self, id: &AccessoryId) {
        self.current = self.current.with_accessory_toggled(id);
    }

    /// Applies an event emitted by one of the selectors.
    pub fn apply(&mut self, event: SelectorEvent) {
        match event {
            SelectorEvent::ColorSelected(color) => self.set_color(color),
            SelectorEvent::AccessoryToggled(id) => self.toggle_accessory(&id),
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Snapshots the current configuration and writes it to the store.
    ///
    /// The in-session snapshot is updated even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigureError::Store`] if the store rejects the write.
    pub fn save(&mut self) -> Result<(), ConfigureError> {
        self.saved = Some(self.current.clone());
        let json = serde_json::to_string(&self.current)?;
        self.store.set(&self.storage_key, &json)?;
        info!("configuration saved under {}", self.storage_key);
        Ok(())
    }

    /// Reads the stored configuration into the saved snapshot.
    ///
    /// Returns `false`, leaving the snapshot untouched, when nothing is stored
    /// or the stored value is not a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigureError::Store`] if the store cannot be read.
    pub fn load_saved(&mut self) -> Result<bool, ConfigureError> {
        let Some(json) = self.store.get(&self.storage_key)? else {
            debug!("nothing stored under {}", self.storage_key);
            return Ok(false);
        };
        match serde_json::from_str::<CarConfiguration>(&json) {
            Ok(config) => {
                warn_unknown_ids(&config);
                self.saved = Some(config);
                Ok(true)
            }
            Err(e) => {
                debug!("ignoring unreadable stored configuration: {e}");
                Ok(false)
            }
        }
    }

    // ── Sharing ───────────────────────────────────────────────────────────────

    /// Builds a share URL for the current configuration and tries to copy it
    /// to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigureError::Share`] if the URL cannot be built.  A
    /// clipboard failure is not an error; it shows up as `copied: false`.
    pub async fn share(&mut self) -> Result<ShareOutcome, ConfigureError> {
        let url = share_url(&self.location, &self.current)?;
        let copied = match self.clipboard.write_text(&url).await {
            Ok(()) => true,
            Err(e) => {
                debug!("share link not copied: {e}");
                false
            }
        };
        let outcome = ShareOutcome { url, copied };
        self.last_share = Some(outcome.clone());
        info!("share link created (copied: {copied})");
        Ok(outcome)
    }

    /// Replaces the current configuration with the one encoded in `url`'s
    /// `config` parameter.
    ///
    /// Returns whether a configuration was restored.  A missing parameter, a
    /// malformed URL or an undecodable token all leave the current
    /// configuration unchanged.
    pub fn restore_from_url(&mut self, url: &str) -> bool {
        let token = match token_from_url(url) {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(e) => {
                debug!("cannot restore from {url}: {e}");
                return false;
            }
        };
        match decode_token(&token) {
            Ok(config) => {
                warn_unknown_ids(&config);
                self.current = config;
                info!("configuration restored from share link");
                true
            }
            Err(e) => {
                debug!("ignoring undecodable share token: {e}");
                false
            }
        }
    }
}

fn warn_unknown_ids(config: &CarConfiguration) {
    let unknown = config.unknown_ids();
    if !unknown.is_empty() {
        warn!("configuration references unknown ids: {}", unknown.join(", "));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
