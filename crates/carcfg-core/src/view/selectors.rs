//! Color and accessory selectors.
//!
//! Both selectors are fully controlled: the checked state of every control is
//! derived from the configuration passed in, and activating a control only
//! produces a [`SelectorEvent`].  Color choices behave like radio buttons (at
//! most one checked); accessory choices are independent checkboxes.

use crate::domain::catalog::{AccessoryEntry, ColorEntry};
use crate::domain::configuration::{AccessoryId, AccessorySet, ColorId};

/// A change requested by the user through a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    ColorSelected(ColorId),
    AccessoryToggled(AccessoryId),
}

/// One radio control in the color selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorChoice {
    pub id: &'static str,
    pub name: &'static str,
    /// Swatch color.
    pub hex: &'static str,
    pub checked: bool,
}

/// One checkbox in the accessory selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryChoice {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub checked: bool,
}

/// Single-choice selector over a color catalog.
#[derive(Debug, Clone, Copy)]
pub struct ColorSelector<'a> {
    colors: &'a [ColorEntry],
}

impl<'a> ColorSelector<'a> {
    pub fn new(colors: &'a [ColorEntry]) -> Self {
        Self { colors }
    }

    /// One choice per catalog entry; the entry matching `selected` is checked.
    ///
    /// An unknown `selected` id leaves every choice unchecked.
    pub fn choices(&self, selected: &ColorId) -> Vec<ColorChoice> {
        self.colors
            .iter()
            .map(|c| ColorChoice {
                id: c.id,
                name: c.name,
                hex: c.hex,
                checked: c.id == selected.as_str(),
            })
            .collect()
    }

    /// Activates the control for `id`.
    ///
    /// Returns `None` when the selector has no control with that id.
    pub fn activate(&self, id: &str) -> Option<SelectorEvent> {
        self.colors
            .iter()
            .find(|c| c.id == id)
            .map(|c| SelectorEvent::ColorSelected(ColorId::from(c)))
    }
}

/// Multi-choice selector over an accessory catalog.
#[derive(Debug, Clone, Copy)]
pub struct AccessorySelector<'a> {
    accessories: &'a [AccessoryEntry],
}

impl<'a> AccessorySelector<'a> {
    pub fn new(accessories: &'a [AccessoryEntry]) -> Self {
        Self { accessories }
    }

    /// One checkbox per catalog entry, checked when the id is in `selected`.
    pub fn choices(&self, selected: &AccessorySet) -> Vec<AccessoryChoice> {
        self.accessories
            .iter()
            .map(|a| AccessoryChoice {
                id: a.id,
                name: a.name,
                icon: a.icon,
                checked: selected.contains(&AccessoryId::from(a.id)),
            })
            .collect()
    }

    /// Activates the checkbox for `id`.
    ///
    /// Returns `None` when the selector has no control with that id.
    pub fn activate(&self, id: &str) -> Option<SelectorEvent> {
        self.accessories
            .iter()
            .find(|a| a.id == id)
            .map(|a| SelectorEvent::AccessoryToggled(AccessoryId::from(a.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{ACCESSORIES, COLORS};

    #[test]
    fn test_color_choices_check_exactly_the_selected_color() {
        // Arrange
        let selector = ColorSelector::new(&COLORS);
        let selected: ColorId = "grey".parse().expect("non-empty");

        // Act
        let choices = selector.choices(&selected);

        // Assert
        assert_eq!(choices.len(), COLORS.len());
        let checked: Vec<_> = choices.iter().filter(|c| c.checked).map(|c| c.id).collect();
        assert_eq!(checked, vec!["grey"]);
    }

    #[test]
    fn test_unknown_color_checks_nothing() {
        let selector = ColorSelector::new(&COLORS);
        let choices = selector.choices(&"chartreuse".parse().expect("non-empty"));
        assert!(choices.iter().all(|c| !c.checked));
    }

    #[test]
    fn test_color_activate_emits_selected_event() {
        let selector = ColorSelector::new(&COLORS);
        assert_eq!(
            selector.activate("black"),
            Some(SelectorEvent::ColorSelected("black".parse().expect("non-empty")))
        );
        assert_eq!(selector.activate("chartreuse"), None);
    }

    #[test]
    fn test_accessory_choices_reflect_selection() {
        // Arrange
        let selector = AccessorySelector::new(&ACCESSORIES);
        let selected: AccessorySet = ["sunroof", "roof_box"].into_iter().map(AccessoryId::from).collect();

        // Act
        let choices = selector.choices(&selected);

        // Assert
        let checked: Vec<_> = choices.iter().filter(|c| c.checked).map(|c| c.id).collect();
        assert_eq!(checked, vec!["sunroof", "roof_box"]);
    }

    #[test]
    fn test_accessory_activate_emits_toggle_event() {
        let selector = AccessorySelector::new(&ACCESSORIES);
        assert_eq!(
            selector.activate("spoiler"),
            Some(SelectorEvent::AccessoryToggled(AccessoryId::from("spoiler")))
        );
        assert_eq!(selector.activate("jetpack"), None);
    }
}
