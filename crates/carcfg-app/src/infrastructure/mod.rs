//! Infrastructure layer for the configurator application.
//!
//! Contains OS-facing adapters: the durable key-value store and settings
//! file, the clipboard command pipe, render surfaces with their render loop,
//! the UI command bridge, and the line-oriented console front end.
//!
//! **Dependency rule**: the `ui_bridge` and `console` modules sit on top of
//! the application layer; the storage, clipboard and render adapters only
//! implement the traits the application layer consumes.

pub mod clipboard;
pub mod console;
pub mod render;
pub mod storage;
pub mod ui_bridge;
