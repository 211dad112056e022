//! # carcfg-core
//!
//! Shared library for the car configurator containing the configuration
//! model, the static catalogs, the share-token codec, the 3D scene
//! description, and the presentational view models.
//!
//! It has zero dependencies on OS APIs, UI frameworks, clipboards, or
//! storage back ends.
//!
//! # Architecture overview (for beginners)
//!
//! The configurator lets a user pick a paint color and a set of accessories,
//! preview the car in 3D, and save or share the result as a URL.  Everything
//! revolves around one small record, the [`CarConfiguration`].
//!
//! - **`domain`** – The configuration record and the fixed color/accessory
//!   catalogs it draws its identifiers from.
//!
//! - **`share`** – How a configuration travels inside a URL.  The record is
//!   serialised to JSON, made byte-safe, and embedded in a query parameter.
//!
//! - **`viewer`** – What the 3D preview shows (a scene description rebuilt
//!   from scratch for every configuration) and how dragging rotates it.
//!
//! - **`view`** – Read-only projections for the selectors, the live preview
//!   panel, and the navigation bar.

pub mod domain;
pub mod share;
pub mod view;
pub mod viewer;

// Re-export the most-used types at the crate root so callers can write
// `carcfg_core::CarConfiguration` instead of the full module path.
pub use domain::catalog::{AccessoryEntry, ColorEntry, ACCESSORIES, COLORS};
pub use domain::configuration::{AccessoryId, AccessorySet, CarConfiguration, ColorId, ModelId};
pub use share::codec::{decode_token, encode_token, ShareError};
pub use share::url::{share_url, token_from_url, PageLocation, SHARE_QUERY_PARAM};
pub use viewer::interaction::{DragRotate, DragState, PointerEvent};
pub use viewer::scene::{build_scene, Scene};
pub use view::{NavBar, PreviewPanel, SelectorEvent};
