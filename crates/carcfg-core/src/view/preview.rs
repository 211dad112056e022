//! Live preview panel: a read-only text reflection of the configuration.

use std::fmt;

use crate::domain::configuration::CarConfiguration;

/// Label shown when a configuration has no accessories.
pub const NO_ACCESSORIES: &str = "None";

/// Color and accessory lines for one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSection {
    pub color: String,
    /// Accessory ids in selection order.
    pub accessories: Vec<String>,
}

impl PreviewSection {
    fn of(config: &CarConfiguration) -> Self {
        Self {
            color: config.color.to_string(),
            accessories: config.accessories.iter().map(ToString::to_string).collect(),
        }
    }

    /// The accessory line: ids separated by spaces, or `"None"`.
    pub fn accessories_label(&self) -> String {
        if self.accessories.is_empty() {
            NO_ACCESSORIES.to_string()
        } else {
            self.accessories.join(" ")
        }
    }
}

impl fmt::Display for PreviewSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Color: {}", self.color)?;
        writeln!(f, "Accessories: {}", self.accessories_label())
    }
}

/// The live configuration, plus the saved snapshot once one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPanel {
    pub live: PreviewSection,
    pub saved: Option<PreviewSection>,
}

impl PreviewPanel {
    pub fn project(current: &CarConfiguration, saved: Option<&CarConfiguration>) -> Self {
        Self {
            live: PreviewSection::of(current),
            saved: saved.map(PreviewSection::of),
        }
    }
}

impl fmt::Display for PreviewPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Live Preview")?;
        write!(f, "{}", self.live)?;
        if let Some(saved) = &self.saved {
            writeln!(f, "Saved:")?;
            write!(f, "{saved}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::configuration::AccessoryId;

    #[test]
    fn test_empty_accessories_render_as_none() {
        // Act
        let panel = PreviewPanel::project(&CarConfiguration::default(), None);

        // Assert
        assert_eq!(panel.to_string(), "Live Preview\nColor: white\nAccessories: None\n");
    }

    #[test]
    fn test_accessories_listed_in_selection_order() {
        let cfg = CarConfiguration::default()
            .with_accessory_toggled(&AccessoryId::from("sunroof"))
            .with_accessory_toggled(&AccessoryId::from("spoiler"));

        let panel = PreviewPanel::project(&cfg, None);

        assert_eq!(panel.live.accessories_label(), "sunroof spoiler");
    }

    #[test]
    fn test_saved_section_appears_only_when_snapshot_exists() {
        // Arrange
        let saved = CarConfiguration::default();
        let current = saved.with_color("pink".parse().expect("non-empty"));

        // Act
        let without = PreviewPanel::project(&current, None);
        let with = PreviewPanel::project(&current, Some(&saved));

        // Assert
        assert!(!without.to_string().contains("Saved:"));
        assert_eq!(
            with.to_string(),
            "Live Preview\nColor: pink\nAccessories: None\nSaved:\nColor: white\nAccessories: None\n"
        );
    }
}
