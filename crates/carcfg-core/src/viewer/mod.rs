//! 3D preview: scene description and pointer interaction.
//!
//! Nothing here talks to a GPU.  [`scene::build_scene`] produces a plain
//! description of meshes, lights and camera that a render surface can draw,
//! and [`interaction::DragRotate`] turns pointer events into body rotation.
//! The mounted viewer that owns a surface and a render loop lives in the
//! application crate.

pub mod interaction;
pub mod scene;
