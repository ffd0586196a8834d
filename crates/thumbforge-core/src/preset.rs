//! Named slider presets and the active-preset identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UnknownName;
use crate::Settings;

/// A named, fixed assignment of all five settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Subtle,
    Balanced,
    Extreme,
}

impl Preset {
    /// All presets, in the order their buttons appear
    pub const ALL: [Preset; 3] = [Preset::Subtle, Preset::Balanced, Preset::Extreme];

    /// The name used in `data-preset` attributes and submission records
    pub fn name(self) -> &'static str {
        match self {
            Preset::Subtle => "subtle",
            Preset::Balanced => "balanced",
            Preset::Extreme => "extreme",
        }
    }

    /// The slider values this preset assigns
    pub fn settings(self) -> Settings {
        match self {
            Preset::Subtle => Settings {
                exaggeration: 20,
                color_intensity: 30,
                face_emphasis: 40,
                object_scaling: 30,
                text_size: 40,
            },
            Preset::Balanced => Settings {
                exaggeration: 50,
                color_intensity: 50,
                face_emphasis: 50,
                object_scaling: 50,
                text_size: 50,
            },
            Preset::Extreme => Settings {
                exaggeration: 100,
                color_intensity: 90,
                face_emphasis: 95,
                object_scaling: 85,
                text_size: 90,
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| UnknownName::Preset(s.to_string()))
    }
}

/// The preset currently shown as active.
///
/// `Custom` means a slider was moved by hand since the last preset was
/// applied. `Unrecognized` holds a name that was applied without matching any
/// preset; it becomes active even though no values changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivePreset {
    Named(Preset),
    Custom,
    Unrecognized(String),
}

impl Default for ActivePreset {
    fn default() -> Self {
        ActivePreset::Named(Preset::Balanced)
    }
}

impl ActivePreset {
    pub const CUSTOM: &'static str = "custom";

    /// Resolve an applied name. Never fails.
    pub fn from_name(name: &str) -> Self {
        match name.parse::<Preset>() {
            Ok(preset) => ActivePreset::Named(preset),
            Err(_) if name == Self::CUSTOM => ActivePreset::Custom,
            Err(_) => ActivePreset::Unrecognized(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActivePreset::Named(preset) => preset.name(),
            ActivePreset::Custom => Self::CUSTOM,
            ActivePreset::Unrecognized(name) => name,
        }
    }

    /// The preset whose values are in effect, if any
    pub fn preset(&self) -> Option<Preset> {
        match self {
            ActivePreset::Named(preset) => Some(*preset),
            _ => None,
        }
    }
}

impl fmt::Display for ActivePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Preset> for ActivePreset {
    fn from(preset: Preset) -> Self {
        ActivePreset::Named(preset)
    }
}

impl Serialize for ActivePreset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivePreset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ActivePreset::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_table() {
        let subtle = Preset::Subtle.settings();
        assert_eq!(
            (
                subtle.exaggeration,
                subtle.color_intensity,
                subtle.face_emphasis,
                subtle.object_scaling,
                subtle.text_size
            ),
            (20, 30, 40, 30, 40)
        );

        assert_eq!(Preset::Balanced.settings(), Settings::default());

        let extreme = Preset::Extreme.settings();
        assert_eq!(
            (
                extreme.exaggeration,
                extreme.color_intensity,
                extreme.face_emphasis,
                extreme.object_scaling,
                extreme.text_size
            ),
            (100, 90, 95, 85, 90)
        );
    }

    #[test]
    fn test_preset_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!(
            "Extreme".parse::<Preset>(),
            Err(UnknownName::Preset("Extreme".to_string()))
        );
        assert!("custom".parse::<Preset>().is_err());
    }

    #[test]
    fn test_active_preset_from_name() {
        assert_eq!(
            ActivePreset::from_name("subtle"),
            ActivePreset::Named(Preset::Subtle)
        );
        assert_eq!(ActivePreset::from_name("custom"), ActivePreset::Custom);
        assert_eq!(
            ActivePreset::from_name("wild"),
            ActivePreset::Unrecognized("wild".to_string())
        );
        assert_eq!(ActivePreset::default().as_str(), "balanced");
    }

    #[test]
    fn test_active_preset_serializes_as_string() {
        let json = serde_json::to_string(&ActivePreset::Custom).unwrap();
        assert_eq!(json, "\"custom\"");

        let parsed: ActivePreset = serde_json::from_str("\"extreme\"").unwrap();
        assert_eq!(parsed, ActivePreset::Named(Preset::Extreme));

        let odd: ActivePreset = serde_json::from_str("\"neon\"").unwrap();
        assert_eq!(odd.as_str(), "neon");
        assert_eq!(odd.preset(), None);
    }
}
