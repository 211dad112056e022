//! Scene description for the 3D car preview.
//!
//! The preview is a placeholder model: a box for the body, four cylinders for
//! wheels, and a few overlays for accessories.  [`build_scene`] rebuilds the
//! whole scene from a configuration every time; there is no incremental
//! update path.  With a handful of static shapes a full rebuild is cheap and
//! leaves no stale overlay behind when an accessory is removed.
//!
//! Coordinates are right-handed, Y up, in scene units.  Rotations are Euler
//! angles in radians applied X, Y, Z.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::domain::configuration::CarConfiguration;

/// Body color used when the configuration names a color the catalog lacks.
const FALLBACK_BODY_HEX: &str = "#fff";

const BODY_SIZE: Vec3 = Vec3::new(4.2, 1.5, 2.0);
const BODY_HEIGHT: f32 = 1.0;

const WHEEL_RADIUS: f32 = 0.45;
const WHEEL_WIDTH: f32 = 0.5;
const WHEEL_SEGMENTS: u32 = 32;
const WHEEL_OFFSETS: [Vec3; 4] = [
    Vec3::new(1.5, 0.25, 0.9),
    Vec3::new(-1.5, 0.25, 0.9),
    Vec3::new(1.5, 0.25, -0.9),
    Vec3::new(-1.5, 0.25, -0.9),
];

// ── Basic value types ─────────────────────────────────────────────────────────

/// Linear RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const WHITE: Rgb = Rgb(Vec3::ONE);

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .map(|v| f32::from(v) / 255.0)
        };
        Some(Rgb(Vec3::new(channel(0)?, channel(2)?, channel(4)?)))
    }

    /// Like [`Rgb::from_hex`] but for compile-time constants that are known to be valid.
    fn constant(hex: &str) -> Rgb {
        Rgb::from_hex(hex).unwrap_or(Rgb::WHITE)
    }
}

/// Shape of a mesh, in local units before transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Box { size: Vec3 },
    Cylinder { radius: f32, height: f32, segments: u32 },
    Plane { width: f32, height: f32 },
}

/// Surface shading model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Clear-coated paint.
    Physical { roughness: f32, metalness: f32, clearcoat: f32 },
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub shading: Shading,
    /// `1.0` is fully opaque.
    pub opacity: f32,
}

impl Material {
    fn standard(color: Rgb) -> Self {
        Self {
            color,
            shading: Shading::Standard,
            opacity: 1.0,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// What a mesh represents in the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRole {
    Body,
    Wheel,
    Spoiler,
    Sunroof,
    RoofBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub role: MeshRole,
    pub geometry: Geometry,
    pub material: Material,
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    fn new(role: MeshRole, geometry: Geometry, material: Material, position: Vec3) -> Self {
        Self {
            role,
            geometry,
            material,
            position,
            rotation: Vec3::ZERO,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Rgb, intensity: f32 },
    Directional { color: Rgb, intensity: f32, position: Vec3, cast_shadow: bool },
}

/// Perspective camera looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_deg: 42.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 4.0, 11.0),
        }
    }
}

impl Camera {
    /// Projection aspect ratio for a surface of the given size in pixels.
    ///
    /// Degenerate sizes fall back to a square aspect.
    pub fn aspect(width: u32, height: u32) -> f32 {
        if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

/// Everything a render surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Rgb,
    pub camera: Camera,
    /// Never empty: the body is always the first mesh.  Only
    /// [`build_scene`] fills it.
    meshes: Vec<Mesh>,
    pub lights: Vec<Light>,
}

impl Scene {
    /// All meshes, body first, then wheels, then accessory overlays.
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn body(&self) -> &Mesh {
        &self.meshes[0]
    }

    /// Current yaw of the car body in radians.
    pub fn body_yaw(&self) -> f32 {
        self.body().rotation.y
    }

    /// Rotates the body about the vertical axis.  Nothing else moves.
    pub fn rotate_body(&mut self, delta_radians: f32) {
        self.meshes[0].rotation.y += delta_radians;
    }

    pub fn meshes_with_role(&self, role: MeshRole) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter().filter(move |m| m.role == role)
    }
}

/// Builds the scene for `config` from scratch.
///
/// Accessory overlays are hard-wired by id: `spoiler`, `sunroof` and
/// `roof_box` each add one mesh; any other id adds nothing.
pub fn build_scene(config: &CarConfiguration) -> Scene {
    let body_hex = config.color.entry().map_or(FALLBACK_BODY_HEX, |c| c.hex);
    let body_color = Rgb::from_hex(body_hex).unwrap_or(Rgb::WHITE);

    let mut body = Mesh::new(
        MeshRole::Body,
        Geometry::Box { size: BODY_SIZE },
        Material {
            color: body_color,
            shading: Shading::Physical {
                roughness: 0.4,
                metalness: 0.6,
                clearcoat: 1.0,
            },
            opacity: 1.0,
        },
        Vec3::new(0.0, BODY_HEIGHT, 0.0),
    );
    body.cast_shadow = true;
    body.receive_shadow = true;

    let mut meshes = vec![body];

    let tyre = Material::standard(Rgb::constant("#333"));
    meshes.extend(WHEEL_OFFSETS.iter().map(|&offset| {
        let mut wheel = Mesh::new(
            MeshRole::Wheel,
            Geometry::Cylinder {
                radius: WHEEL_RADIUS,
                height: WHEEL_WIDTH,
                segments: WHEEL_SEGMENTS,
            },
            tyre,
            offset,
        );
        wheel.rotation.z = FRAC_PI_2;
        wheel
    }));

    for id in config.accessories.iter() {
        if let Some(mesh) = accessory_overlay(id.as_str()) {
            meshes.push(mesh);
        }
    }

    Scene {
        background: Rgb::WHITE,
        camera: Camera::default(),
        meshes,
        lights: vec![
            Light::Ambient {
                color: Rgb::WHITE,
                intensity: 0.7,
            },
            Light::Directional {
                color: Rgb::constant("#eaeaea"),
                intensity: 0.7,
                position: Vec3::new(4.0, 10.0, 4.0),
                cast_shadow: true,
            },
        ],
    }
}

fn accessory_overlay(id: &str) -> Option<Mesh> {
    match id {
        "spoiler" => Some(Mesh::new(
            MeshRole::Spoiler,
            Geometry::Box {
                size: Vec3::new(2.0, 0.1, 0.5),
            },
            Material::standard(Rgb::constant("#666")),
            Vec3::new(0.0, 1.6, -1.1),
        )),
        "sunroof" => {
            let mut glass = Mesh::new(
                MeshRole::Sunroof,
                Geometry::Plane {
                    width: 1.2,
                    height: 0.7,
                },
                Material {
                    opacity: 0.7,
                    ..Material::standard(Rgb::constant("#d1e2ee"))
                },
                Vec3::new(0.0, 1.5, 0.0),
            );
            glass.rotation.x = -FRAC_PI_2;
            Some(glass)
        }
        "roof_box" => Some(Mesh::new(
            MeshRole::RoofBox,
            Geometry::Box {
                size: Vec3::new(1.2, 0.4, 0.7),
            },
            Material::standard(Rgb::constant("#222")),
            Vec3::new(0.0, 2.2, 0.0),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration::AccessoryId;

    fn with_accessories(ids: &[&str]) -> CarConfiguration {
        ids.iter().fold(CarConfiguration::default(), |cfg, id| {
            cfg.with_accessory_toggled(&AccessoryId::from(*id))
        })
    }

    #[test]
    fn test_rgb_from_hex_parses_long_and_short_forms() {
        assert_eq!(Rgb::from_hex("#FFFFFF"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("000000"), Some(Rgb(Vec3::ZERO)));
    }

    #[test]
    fn test_rgb_from_hex_rejects_malformed_input() {
        assert_eq!(Rgb::from_hex("#12"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
    }

    #[test]
    fn test_default_scene_has_body_and_four_wheels_only() {
        // Act
        let scene = build_scene(&CarConfiguration::default());

        // Assert
        assert_eq!(scene.meshes.len(), 5);
        assert_eq!(scene.body().role, MeshRole::Body);
        assert_eq!(scene.meshes_with_role(MeshRole::Wheel).count(), 4);
        assert_eq!(scene.lights.len(), 2);
    }

    #[test]
    fn test_body_color_follows_catalog_hex() {
        // Arrange
        let cfg = CarConfiguration::default().with_color("blue".parse().expect("non-empty"));

        // Act
        let scene = build_scene(&cfg);

        // Assert
        let expected = Rgb::from_hex("#1e88e5").expect("valid hex");
        assert_eq!(scene.body().material.color, expected);
    }

    #[test]
    fn test_unknown_color_falls_back_to_white_body() {
        let cfg = CarConfiguration::default().with_color("chartreuse".parse().expect("non-empty"));
        assert_eq!(build_scene(&cfg).body().material.color, Rgb::WHITE);
    }

    #[test]
    fn test_each_known_accessory_adds_one_overlay() {
        let scene = build_scene(&with_accessories(&["spoiler", "sunroof", "roof_box"]));

        assert_eq!(scene.meshes_with_role(MeshRole::Spoiler).count(), 1);
        assert_eq!(scene.meshes_with_role(MeshRole::Sunroof).count(), 1);
        assert_eq!(scene.meshes_with_role(MeshRole::RoofBox).count(), 1);
        assert_eq!(scene.meshes.len(), 8);
    }

    #[test]
    fn test_alloy_wheels_and_unknown_ids_add_nothing() {
        let scene = build_scene(&with_accessories(&["alloy_wheels", "jetpack"]));
        assert_eq!(scene.meshes.len(), 5);
    }

    #[test]
    fn test_sunroof_is_translucent_and_laid_flat() {
        let scene = build_scene(&with_accessories(&["sunroof"]));
        let sunroof = scene
            .meshes_with_role(MeshRole::Sunroof)
            .next()
            .expect("sunroof overlay");

        assert!(sunroof.material.is_transparent());
        assert!((sunroof.rotation.x + FRAC_PI_2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_meshes_start_with_the_body() {
        let scene = build_scene(&with_accessories(&["roof_box"]));

        let roles: Vec<_> = scene.meshes().iter().map(|m| m.role).collect();

        assert_eq!(roles.first(), Some(&MeshRole::Body));
        assert_eq!(roles.last(), Some(&MeshRole::RoofBox));
        assert_eq!(scene.body(), &scene.meshes()[0]);
    }

    #[test]
    fn test_rotate_body_moves_only_the_body() {
        // Arrange
        let mut scene = build_scene(&with_accessories(&["spoiler"]));
        let before = scene.clone();

        // Act
        scene.rotate_body(0.5);

        // Assert
        assert!((scene.body_yaw() - 0.5).abs() < f32::EPSILON);
        assert_eq!(scene.meshes[1..], before.meshes[1..]);
        assert_eq!(scene.camera, before.camera);
    }

    #[test]
    fn test_camera_aspect_handles_zero_height() {
        assert_eq!(Camera::aspect(800, 0), 1.0);
        assert!((Camera::aspect(1600, 900) - 16.0 / 9.0).abs() < 1e-6);
    }
}
