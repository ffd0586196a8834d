//! Thumbforge Core - Thumbnail generation controller
//!
//! This crate provides the target-independent half of Thumbforge: the slider
//! settings and presets, the derivation of workflow parameters sent to the
//! generation backend, the form controller that keeps both in sync with the
//! on-screen controls, and the client for the generation API.

pub mod api;
pub mod comfy;
pub mod controller;
pub mod error;
pub mod preset;
pub mod view;
pub mod workflow;

use std::fmt;
use std::str::FromStr;

pub use api::{
    dispatch_and_report, ApiConfig, ApiTarget, GenerationApi, GenerationOutcome, HttpGenerationApi,
};
pub use controller::{FormEvent, GenerationRecord, Submission, ThumbnailController};
pub use error::{DispatchError, OutOfRange, UnknownName, ValidationError};
pub use preset::{ActivePreset, Preset};
pub use view::{Dispatcher, FormView, Notifier};
pub use workflow::{convert_settings_to_workflow, WorkflowParams};

/// Lowest value a slider can hold.
pub const SETTING_MIN: u8 = 0;
/// Highest value a slider can hold.
pub const SETTING_MAX: u8 = 100;
/// Value every slider starts at.
pub const SETTING_DEFAULT: u8 = 50;

/// The five slider-backed settings of a thumbnail request.
///
/// Every field is an integer in `0..=100`. Serialized with the camelCase keys
/// used by the page and the relay backend; deserializing rejects values
/// above 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSettings")]
pub struct Settings {
    /// Overall stylistic exaggeration (0 to 100)
    pub exaggeration: u8,
    /// Color saturation/contrast boost (0 to 100)
    pub color_intensity: u8,
    /// Emphasis on faces (0 to 100)
    pub face_emphasis: u8,
    /// Scaling of foreground objects (0 to 100)
    pub object_scaling: u8,
    /// Size of overlaid text (0 to 100)
    pub text_size: u8,
}

/// Unchecked wire form of [`Settings`].
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    exaggeration: u8,
    color_intensity: u8,
    face_emphasis: u8,
    object_scaling: u8,
    text_size: u8,
}

impl TryFrom<RawSettings> for Settings {
    type Error = OutOfRange;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let settings = Settings {
            exaggeration: raw.exaggeration,
            color_intensity: raw.color_intensity,
            face_emphasis: raw.face_emphasis,
            object_scaling: raw.object_scaling,
            text_size: raw.text_size,
        };
        let out_of_range = settings.iter().find(|&(_, value)| value > SETTING_MAX);
        match out_of_range {
            Some((field, value)) => Err(OutOfRange { field, value }),
            None => Ok(settings),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::uniform(SETTING_DEFAULT)
    }
}

impl Settings {
    /// Create settings with the default value on every slider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create settings with the same value on every slider (clamped to 0..=100)
    pub fn uniform(value: u8) -> Self {
        let value = value.min(SETTING_MAX);
        Self {
            exaggeration: value,
            color_intensity: value,
            face_emphasis: value,
            object_scaling: value,
            text_size: value,
        }
    }

    /// Read a single field
    pub fn get(&self, field: SettingField) -> u8 {
        match field {
            SettingField::Exaggeration => self.exaggeration,
            SettingField::ColorIntensity => self.color_intensity,
            SettingField::FaceEmphasis => self.face_emphasis,
            SettingField::ObjectScaling => self.object_scaling,
            SettingField::TextSize => self.text_size,
        }
    }

    /// Write a single field, clamping to the slider range
    pub fn set(&mut self, field: SettingField, value: u8) {
        let value = value.min(SETTING_MAX);
        match field {
            SettingField::Exaggeration => self.exaggeration = value,
            SettingField::ColorIntensity => self.color_intensity = value,
            SettingField::FaceEmphasis => self.face_emphasis = value,
            SettingField::ObjectScaling => self.object_scaling = value,
            SettingField::TextSize => self.text_size = value,
        }
    }

    /// Iterate over `(field, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (SettingField, u8)> + '_ {
        SettingField::ALL.iter().map(move |&field| (field, self.get(field)))
    }

    /// Merge a partial update, returning the fields that were written
    pub fn merge(&mut self, patch: &SettingsPatch) -> Vec<SettingField> {
        let mut written = Vec::new();
        for field in SettingField::ALL {
            if let Some(value) = patch.get(field) {
                self.set(field, value);
                written.push(field);
            }
        }
        written
    }
}

/// A partial set of setting values, merged over existing [`Settings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub exaggeration: Option<u8>,
    pub color_intensity: Option<u8>,
    pub face_emphasis: Option<u8>,
    pub object_scaling: Option<u8>,
    pub text_size: Option<u8>,
}

impl SettingsPatch {
    /// Read a single field of the patch
    pub fn get(&self, field: SettingField) -> Option<u8> {
        match field {
            SettingField::Exaggeration => self.exaggeration,
            SettingField::ColorIntensity => self.color_intensity,
            SettingField::FaceEmphasis => self.face_emphasis,
            SettingField::ObjectScaling => self.object_scaling,
            SettingField::TextSize => self.text_size,
        }
    }

    /// Builder-style setter for a single field
    pub fn with(mut self, field: SettingField, value: u8) -> Self {
        let slot = match field {
            SettingField::Exaggeration => &mut self.exaggeration,
            SettingField::ColorIntensity => &mut self.color_intensity,
            SettingField::FaceEmphasis => &mut self.face_emphasis,
            SettingField::ObjectScaling => &mut self.object_scaling,
            SettingField::TextSize => &mut self.text_size,
        };
        *slot = Some(value);
        self
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            exaggeration: Some(settings.exaggeration),
            color_intensity: Some(settings.color_intensity),
            face_emphasis: Some(settings.face_emphasis),
            object_scaling: Some(settings.object_scaling),
            text_size: Some(settings.text_size),
        }
    }
}

/// Identifies one of the five sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingField {
    Exaggeration,
    ColorIntensity,
    FaceEmphasis,
    ObjectScaling,
    TextSize,
}

impl SettingField {
    /// All fields, in the order they appear on the page
    pub const ALL: [SettingField; 5] = [
        SettingField::Exaggeration,
        SettingField::ColorIntensity,
        SettingField::FaceEmphasis,
        SettingField::ObjectScaling,
        SettingField::TextSize,
    ];

    /// The camelCase key of this field (also the default slider element id)
    pub fn key(self) -> &'static str {
        match self {
            SettingField::Exaggeration => "exaggeration",
            SettingField::ColorIntensity => "colorIntensity",
            SettingField::FaceEmphasis => "faceEmphasis",
            SettingField::ObjectScaling => "objectScaling",
            SettingField::TextSize => "textSize",
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SettingField {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownName::SettingField(s.to_string()))
    }
}

/// Parse a raw slider value the way `parseInt` reads it.
///
/// Leading whitespace and an optional sign are accepted, digits are read up
/// to the first non-digit, and the result is clamped to `0..=100`. Returns
/// `None` if no digits are present.
pub fn parse_slider_value(raw: &str) -> Option<u8> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(SETTING_MIN);
    }
    // Anything too long for u64 is far above the maximum anyway
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    Some(value.min(SETTING_MAX as u64) as u8)
}
