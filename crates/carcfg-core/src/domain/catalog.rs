//! Static color and accessory catalogs.
//!
//! The catalogs are the fixed menu the configurator offers.  They are plain
//! `const` data: loaded with the binary, never mutated, and shared by the
//! selectors (which list them) and the 3D viewer (which looks up the paint
//! hex value).
//!
//! Identifiers stored in a [`CarConfiguration`](super::configuration::CarConfiguration)
//! are *expected* to come from these tables, but nothing enforces it.  An
//! unknown id simply has no matching entry: no swatch is checked and the
//! viewer falls back to a white body.

/// One selectable paint color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEntry {
    /// Stable identifier stored in configurations and share links.
    pub id: &'static str,
    /// Human-readable label shown next to the swatch.
    pub name: &'static str,
    /// CSS-style hex value, e.g. `"#1e88e5"`.
    pub hex: &'static str,
}

/// One selectable accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessoryEntry {
    /// Stable identifier stored in configurations and share links.
    pub id: &'static str,
    /// Human-readable label shown next to the checkbox.
    pub name: &'static str,
    /// Single glyph displayed as the accessory icon.
    pub icon: &'static str,
}

/// Paint colors, in display order.  The first entry is the default color.
pub const COLORS: [ColorEntry; 5] = [
    ColorEntry { id: "white", name: "White", hex: "#FFFFFF" },
    ColorEntry { id: "blue", name: "Ocean Blue", hex: "#1e88e5" },
    ColorEntry { id: "grey", name: "Steel Grey", hex: "#cfd8dc" },
    ColorEntry { id: "pink", name: "Hot Pink", hex: "#ff4081" },
    ColorEntry { id: "black", name: "Carbon Black", hex: "#282c34" },
];

/// Accessories, in display order.
pub const ACCESSORIES: [AccessoryEntry; 4] = [
    AccessoryEntry { id: "spoiler", name: "Spoiler", icon: "🪶" },
    AccessoryEntry { id: "sunroof", name: "Sunroof", icon: "🌞" },
    AccessoryEntry { id: "alloy_wheels", name: "Alloy Wheels", icon: "⭕" },
    AccessoryEntry { id: "roof_box", name: "Roof Box", icon: "🧳" },
];

/// The only model currently offered.
pub const DEFAULT_MODEL: &str = "sport";

/// Looks up a color entry by id.
pub fn color_entry(id: &str) -> Option<&'static ColorEntry> {
    COLORS.iter().find(|c| c.id == id)
}

/// Looks up an accessory entry by id.
pub fn accessory_entry(id: &str) -> Option<&'static AccessoryEntry> {
    ACCESSORIES.iter().find(|a| a.id == id)
}
