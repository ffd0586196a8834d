//! Workflow parameter derivation
//!
//! Maps the 0-100 slider settings onto the multipliers consumed by the
//! generation backend.
//!
//! ## Mapping
//! | output | formula |
//! |---|---|
//! | `color_adjustment.saturation` | `1 + c * 0.5` |
//! | `color_adjustment.contrast` | `1 + c * 0.3` |
//! | `color_adjustment.vibrance` | `1 + c * 0.4` |
//! | `face_enhancement.scale` | `1 + f * 0.3` |
//! | `face_enhancement.detail_strength` | `f` |
//! | `object_scaling.scale_factor` | `1 + o * 0.5` |
//! | `text_params.size_multiplier` | `1 + t * 0.5` |
//!
//! where each input is the slider value divided by 100. `exaggeration` has no
//! output here.

use serde::{Deserialize, Serialize};

use crate::Settings;

/// Parameters sent to the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkflowParams {
    pub color_adjustment: ColorAdjustment,
    pub face_enhancement: FaceEnhancement,
    pub object_scaling: ObjectScaling,
    pub text_params: TextParams,
}

/// Color multipliers, each in `[1.0, 1.0 + gain]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorAdjustment {
    pub saturation: f64,
    pub contrast: f64,
    pub vibrance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceEnhancement {
    /// Face scale multiplier in `[1.0, 1.3]`
    pub scale: f64,
    /// Detail strength in `[0.0, 1.0]`
    pub detail_strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectScaling {
    /// Object scale multiplier in `[1.0, 1.5]`
    pub scale_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextParams {
    /// Text size multiplier in `[1.0, 1.5]`
    pub size_multiplier: f64,
}

const SATURATION_GAIN: f64 = 0.5;
const CONTRAST_GAIN: f64 = 0.3;
const VIBRANCE_GAIN: f64 = 0.4;
const FACE_SCALE_GAIN: f64 = 0.3;
const OBJECT_SCALE_GAIN: f64 = 0.5;
const TEXT_SIZE_GAIN: f64 = 0.5;

/// Slider value as a fraction of its range.
#[inline]
fn fraction(value: u8) -> f64 {
    value as f64 / 100.0
}

/// `1 + fraction * gain`
#[inline]
fn boost(value: u8, gain: f64) -> f64 {
    1.0 + fraction(value) * gain
}

/// Convert slider settings to workflow parameters.
///
/// Pure: the output depends only on `settings`.
pub fn convert_settings_to_workflow(settings: &Settings) -> WorkflowParams {
    WorkflowParams {
        color_adjustment: ColorAdjustment {
            saturation: boost(settings.color_intensity, SATURATION_GAIN),
            contrast: boost(settings.color_intensity, CONTRAST_GAIN),
            vibrance: boost(settings.color_intensity, VIBRANCE_GAIN),
        },
        face_enhancement: FaceEnhancement {
            scale: boost(settings.face_emphasis, FACE_SCALE_GAIN),
            detail_strength: fraction(settings.face_emphasis),
        },
        object_scaling: ObjectScaling {
            scale_factor: boost(settings.object_scaling, OBJECT_SCALE_GAIN),
        },
        text_params: TextParams {
            size_multiplier: boost(settings.text_size, TEXT_SIZE_GAIN),
        },
    }
}

impl From<&Settings> for WorkflowParams {
    fn from(settings: &Settings) -> Self {
        convert_settings_to_workflow(settings)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
