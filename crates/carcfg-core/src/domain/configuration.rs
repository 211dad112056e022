//! The car configuration record.
//!
//! A [`CarConfiguration`] is the whole state of one car build: a paint color,
//! a set of accessories, and a model.  It is treated as an immutable value:
//! every edit produces a *new* record via [`CarConfiguration::with_color`] or
//! [`CarConfiguration::with_accessory_toggled`].  That lets the root
//! controller keep an older record as the "last saved" snapshot without the
//! two ever aliasing.
//!
//! # JSON form
//!
//! ```json
//! {"color":"white","accessories":["spoiler","sunroof"],"model":"sport"}
//! ```
//!
//! The same JSON is written to the key-value store on save and embedded in
//! share links, so it must stay compatible with links created by older
//! front ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::catalog::{accessory_entry, color_entry, ColorEntry, AccessoryEntry, COLORS, DEFAULT_MODEL};

/// Error returned when an identifier string is not acceptable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// A color id must contain at least one character.
    #[error("color id must not be empty")]
    EmptyColor,
}

// ── Identifier newtypes ───────────────────────────────────────────────────────

/// Identifier of a paint color.  Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorId(String);

impl ColorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the catalog entry for this id, if the catalog knows it.
    pub fn entry(&self) -> Option<&'static ColorEntry> {
        color_entry(&self.0)
    }
}

impl TryFrom<String> for ColorId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(IdError::EmptyColor)
        } else {
            Ok(Self(value))
        }
    }
}

impl FromStr for ColorId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<&ColorEntry> for ColorId {
    fn from(entry: &ColorEntry) -> Self {
        Self(entry.id.to_string())
    }
}

impl From<ColorId> for String {
    fn from(id: ColorId) -> Self {
        id.0
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an accessory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryId(String);

impl AccessoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the catalog entry for this id, if the catalog knows it.
    pub fn entry(&self) -> Option<&'static AccessoryEntry> {
        accessory_entry(&self.0)
    }
}

impl From<&str> for AccessoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AccessoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the car model.  Reserved for future extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self(DEFAULT_MODEL.to_string())
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── AccessorySet ──────────────────────────────────────────────────────────────

/// A set of accessory ids that remembers insertion order.
///
/// # Why not `HashSet`? (for beginners)
///
/// The preview panel lists accessories in the order the user picked them, so
/// the set keeps a `Vec` internally.  Membership is still enforced: the only
/// way to add an id is [`AccessorySet::toggled`] (or collecting an iterator),
/// and both skip ids that are already present.
///
/// Equality ignores order: `{spoiler, sunroof} == {sunroof, spoiler}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AccessorySet(Vec<AccessoryId>);

impl AccessorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &AccessoryId) -> bool {
        self.0.contains(id)
    }

    /// Returns a new set with `id` removed if present, or appended if absent.
    ///
    /// The relative order of the other ids is unchanged.
    pub fn toggled(&self, id: &AccessoryId) -> Self {
        if self.contains(id) {
            Self(self.0.iter().filter(|a| *a != id).cloned().collect())
        } else {
            let mut ids = self.0.clone();
            ids.push(id.clone());
            Self(ids)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessoryId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for AccessorySet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl Eq for AccessorySet {}

impl FromIterator<AccessoryId> for AccessorySet {
    fn from_iter<I: IntoIterator<Item = AccessoryId>>(iter: I) -> Self {
        let mut ids: Vec<AccessoryId> = Vec::new();
        for id in iter {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self(ids)
    }
}

impl<'de> Deserialize<'de> for AccessorySet {
    /// Accepts any JSON array of strings; repeated ids keep their first position.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = Vec::<AccessoryId>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

// ── CarConfiguration ──────────────────────────────────────────────────────────

/// One complete car build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarConfiguration {
    pub color: ColorId,
    pub accessories: AccessorySet,
    #[serde(default)]
    pub model: ModelId,
}

impl Default for CarConfiguration {
    /// `{color: "white", accessories: [], model: "sport"}`.
    fn default() -> Self {
        Self {
            color: ColorId::from(&COLORS[0]),
            accessories: AccessorySet::new(),
            model: ModelId::default(),
        }
    }
}

impl CarConfiguration {
    /// Returns a copy of this configuration painted `color`.
    pub fn with_color(&self, color: ColorId) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    /// Returns a copy of this configuration with `id` toggled in the accessory set.
    pub fn with_accessory_toggled(&self, id: &AccessoryId) -> Self {
        Self {
            accessories: self.accessories.toggled(id),
            ..self.clone()
        }
    }

    /// Lists ids that the catalogs do not know about.
    ///
    /// Unknown ids are tolerated everywhere; this exists so callers can log
    /// them when a configuration arrives from an untrusted source.
    pub fn unknown_ids(&self) -> Vec<String> {
        let mut unknown = Vec::new();
        if self.color.entry().is_none() {
            unknown.push(self.color.to_string());
        }
        unknown.extend(
            self.accessories
                .iter()
                .filter(|a| a.entry().is_none())
                .map(ToString::to_string),
        );
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(id: &str) -> ColorId {
        id.parse().expect("non-empty color id")
    }

    #[test]
    fn test_default_configuration_is_white_sport_without_accessories() {
        let cfg = CarConfiguration::default();
        assert_eq!(cfg.color.as_str(), "white");
        assert!(cfg.accessories.is_empty());
        assert_eq!(cfg.model.as_str(), "sport");
    }

    #[test]
    fn test_color_id_rejects_empty_string() {
        assert_eq!("".parse::<ColorId>(), Err(IdError::EmptyColor));
    }

    #[test]
    fn test_with_color_replaces_only_the_color() {
        // Arrange
        let original = CarConfiguration::default()
            .with_accessory_toggled(&AccessoryId::from("spoiler"));

        // Act
        let updated = original.with_color(color("blue"));

        // Assert
        assert_eq!(updated.color.as_str(), "blue");
        assert_eq!(updated.accessories, original.accessories);
        assert_eq!(original.color.as_str(), "white", "original must be untouched");
    }

    #[test]
    fn test_selecting_blue_then_black_leaves_black() {
        let cfg = CarConfiguration::default()
            .with_color(color("blue"))
            .with_color(color("black"));
        assert_eq!(cfg.color.as_str(), "black");
    }

    #[test]
    fn test_reselecting_current_color_is_a_no_op() {
        let cfg = CarConfiguration::default();
        assert_eq!(cfg.with_color(color("white")), cfg);
    }

    #[test]
    fn test_toggle_twice_restores_original_set() {
        // Arrange
        let spoiler = AccessoryId::from("spoiler");
        let original = CarConfiguration::default()
            .with_accessory_toggled(&AccessoryId::from("roof_box"));

        // Act
        let round_trip = original
            .with_accessory_toggled(&spoiler)
            .with_accessory_toggled(&spoiler);

        // Assert
        assert_eq!(round_trip.accessories, original.accessories);
    }

    #[test]
    fn test_toggle_scenario_spoiler_sunroof_spoiler() {
        // Arrange
        let spoiler = AccessoryId::from("spoiler");
        let sunroof = AccessoryId::from("sunroof");

        // Act
        let both = CarConfiguration::default()
            .with_accessory_toggled(&spoiler)
            .with_accessory_toggled(&sunroof);
        let only_sunroof = both.with_accessory_toggled(&spoiler);

        // Assert
        let expected: AccessorySet = [sunroof.clone(), spoiler.clone()].into_iter().collect();
        assert_eq!(both.accessories, expected);
        let expected: AccessorySet = [sunroof].into_iter().collect();
        assert_eq!(only_sunroof.accessories, expected);
    }

    #[test]
    fn test_toggle_removal_preserves_order_of_remaining_ids() {
        let set: AccessorySet = ["spoiler", "sunroof", "roof_box"]
            .into_iter()
            .map(AccessoryId::from)
            .collect();

        let removed = set.toggled(&AccessoryId::from("sunroof"));

        let order: Vec<&str> = removed.iter().map(AccessoryId::as_str).collect();
        assert_eq!(order, vec!["spoiler", "roof_box"]);
    }

    #[test]
    fn test_accessory_set_equality_ignores_order() {
        let a: AccessorySet = ["spoiler", "sunroof"].into_iter().map(AccessoryId::from).collect();
        let b: AccessorySet = ["sunroof", "spoiler"].into_iter().map(AccessoryId::from).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deserialize_drops_duplicate_accessories() {
        // Arrange
        let json = r#"{"color":"grey","accessories":["spoiler","spoiler","sunroof"],"model":"sport"}"#;

        // Act
        let cfg: CarConfiguration = serde_json::from_str(json).expect("valid json");

        // Assert
        assert_eq!(cfg.accessories.len(), 2);
    }

    #[test]
    fn test_deserialize_missing_model_defaults_to_sport() {
        let cfg: CarConfiguration =
            serde_json::from_str(r#"{"color":"pink","accessories":[]}"#).expect("valid json");
        assert_eq!(cfg.model.as_str(), "sport");
    }

    #[test]
    fn test_deserialize_rejects_empty_color() {
        let result: Result<CarConfiguration, _> =
            serde_json::from_str(r#"{"color":"","accessories":[],"model":"sport"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_matches_browser_json_shape() {
        let cfg = CarConfiguration::default().with_accessory_toggled(&AccessoryId::from("spoiler"));
        let json = serde_json::to_string(&cfg).expect("serialize");
        assert_eq!(json, r#"{"color":"white","accessories":["spoiler"],"model":"sport"}"#);
    }

    #[test]
    fn test_unknown_ids_lists_unrecognised_color_and_accessories() {
        let cfg = CarConfiguration::default()
            .with_color(color("chartreuse"))
            .with_accessory_toggled(&AccessoryId::from("spoiler"))
            .with_accessory_toggled(&AccessoryId::from("jetpack"));

        assert_eq!(cfg.unknown_ids(), vec!["chartreuse".to_string(), "jetpack".to_string()]);
    }
}
