//! Mount configuration passed from JavaScript.
//!
//! Every field has a default, so `mount()` with no argument binds to the
//! standard page layout and talks to a relay on `127.0.0.1:5000`.
//!
//! ```typescript
//! const app = mount({
//!   api: { endpoint: 'http://127.0.0.1:8188', target: 'comfyui' },
//!   logLevel: 'debug',
//! });
//! ```

use serde::{Deserialize, Serialize};
use thumbforge_core::{ApiConfig, SettingField};
use log::Level;
use wasm_bindgen::JsValue;

/// Ids and selectors of the bound page elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub reference_url: String,
    pub user_prompt: String,
    pub sliders: SliderIds,
    /// CSS selector matching every preset button
    pub preset_selector: String,
    /// `data-*` key holding a button's preset name
    pub preset_attribute: String,
    /// Class toggled on the active preset button
    pub active_class: String,
    pub generate_button: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            reference_url: "referenceUrl".to_string(),
            user_prompt: "userPrompt".to_string(),
            sliders: SliderIds::default(),
            preset_selector: ".preset-btn".to_string(),
            preset_attribute: "preset".to_string(),
            active_class: "active".to_string(),
            generate_button: "generateBtn".to_string(),
        }
    }
}

/// Element id of each slider. Defaults to the setting's camelCase key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliderIds {
    pub exaggeration: String,
    pub color_intensity: String,
    pub face_emphasis: String,
    pub object_scaling: String,
    pub text_size: String,
}

impl Default for SliderIds {
    fn default() -> Self {
        Self {
            exaggeration: SettingField::Exaggeration.key().to_string(),
            color_intensity: SettingField::ColorIntensity.key().to_string(),
            face_emphasis: SettingField::FaceEmphasis.key().to_string(),
            object_scaling: SettingField::ObjectScaling.key().to_string(),
            text_size: SettingField::TextSize.key().to_string(),
        }
    }
}

impl SliderIds {
    pub fn id(&self, field: SettingField) -> &str {
        match field {
            SettingField::Exaggeration => &self.exaggeration,
            SettingField::ColorIntensity => &self.color_intensity,
            SettingField::FaceEmphasis => &self.face_emphasis,
            SettingField::ObjectScaling => &self.object_scaling,
            SettingField::TextSize => &self.text_size,
        }
    }
}

/// Everything `mount()` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MountConfig {
    pub elements: ElementIds,
    pub api: ApiConfig,
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub log_level: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            elements: ElementIds::default(),
            api: ApiConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl MountConfig {
    /// Read a config object from JavaScript; `undefined` or `null` give the
    /// defaults.
    pub fn from_js(value: JsValue) -> Result<Self, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Parsed log level; unknown names fall back to `info`.
    pub fn max_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::Info)
    }
}
