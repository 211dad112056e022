//! Application layer use cases for the car configurator.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (the configuration record and catalogs in `carcfg-core`) and the
//! infrastructure (files, clipboard commands, render surfaces).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "save the
//!   current build so it can be read back later").
//! - **Depend on abstractions** (the `KeyValueStore` and `ClipboardWriter`
//!   traits) rather than concrete implementations, so tests can swap in
//!   in-memory doubles.
//! - **Contain no direct file system access or process spawning**.
//!
//! # Sub-modules
//!
//! - **`configure`** – The root controller.  Owns the current configuration
//!   and the saved snapshot, applies selector events, and implements save,
//!   share, restore-from-URL and load.

pub mod configure;
