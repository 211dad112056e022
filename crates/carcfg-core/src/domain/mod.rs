//! Domain entities for the car configurator.
//!
//! This module contains pure business data with no infrastructure
//! dependencies: no file system, no clipboard, no rendering back end.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of a Clean Architecture codebase is the **domain**.
//! Domain code describes what the system *is*, not how it talks to the
//! outside world.  Here that is:
//!
//! - the [`configuration::CarConfiguration`] record a user edits, and
//! - the [`catalog`] of colors and accessories the user can pick from.
//!
//! Outer layers (the root controller, the storage adapters, the console
//! front end) depend on these types; the domain never depends on them.

/// Fixed color and accessory catalogs.
pub mod catalog;

/// The configuration record and its identifier types.
///
/// See [`configuration::CarConfiguration`] for the main type.
pub mod configuration;
