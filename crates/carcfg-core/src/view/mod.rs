//! Presentational view models.
//!
//! Each component here is a pure projection: it takes catalogs and the
//! current configuration by reference and returns plain data describing what
//! to show.  None of them keep state between calls, and none of them mutate
//! the configuration.  User actions come back out as [`selectors::SelectorEvent`]s
//! for the root controller to apply.

pub mod nav;
pub mod preview;
pub mod selectors;

pub use nav::NavBar;
pub use preview::{PreviewPanel, PreviewSection};
pub use selectors::{AccessoryChoice, AccessorySelector, ColorChoice, ColorSelector, SelectorEvent};
