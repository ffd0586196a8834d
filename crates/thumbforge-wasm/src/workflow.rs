//! Workflow derivation WASM bindings.
//!
//! Exposes the pure parts of the core crate so a page can preview the
//! parameters a submission would send without mounting the form.

use serde::Serialize;
use thumbforge_core::{comfy, convert_settings_to_workflow as derive, Preset, Settings};
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn settings_from_js(value: JsValue) -> Result<Settings, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Slider values of a named preset.
fn preset_table(name: &str) -> Result<Settings, String> {
    name.parse::<Preset>()
        .map(Preset::settings)
        .map_err(|e| e.to_string())
}

/// Convert slider settings to workflow parameters.
///
/// # Example (TypeScript)
/// ```typescript
/// const params = convert_settings_to_workflow({
///   exaggeration: 50, colorIntensity: 100, faceEmphasis: 50,
///   objectScaling: 50, textSize: 50,
/// });
/// params.color_adjustment.saturation; // 1.5
/// ```
#[wasm_bindgen]
pub fn convert_settings_to_workflow(settings: JsValue) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    to_js(&derive(&settings))
}

/// Slider values assigned by a preset (`subtle`, `balanced` or `extreme`).
#[wasm_bindgen]
pub fn preset_settings(name: &str) -> Result<JsValue, JsValue> {
    let settings = preset_table(name).map_err(|e| JsValue::from_str(&e))?;
    to_js(&settings)
}

/// ComfyUI prompt graph for the given settings and prompt text.
#[wasm_bindgen]
pub fn build_workflow_graph(settings: JsValue, prompt: &str) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    to_js(&comfy::build_workflow_graph(&settings, prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_table() {
        assert_eq!(preset_table("extreme").unwrap().exaggeration, 100);
        assert_eq!(preset_table("subtle").unwrap().text_size, 40);
        assert_eq!(preset_table("loud").unwrap_err(), "Unknown preset: loud");
    }
}
